use crate::hub::{Hub, HubEvent};
use crate::types::Jid;
use crate::Error;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// Events a dashboard may send.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub(crate) enum ClientEvent {
    /// Send `text` to `to`.
    Send { to: String, text: String },
    /// Relay a command line (e.g. `.ginfo`) as a text to `to`.
    Command {
        command: String,
        #[serde(default)]
        to: Option<String>,
    },
}

pub(super) async fn handle_upgrade(
    State(hub): State<Arc<Hub>>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| client_session(socket, hub))
}

async fn client_session(socket: WebSocket, hub: Arc<Hub>) {
    let client = uuid::Uuid::new_v4();
    tracing::debug!(%client, "dashboard connected");
    // subscribe before greeting so nothing published meanwhile is missed
    let mut events = hub.subscribe();
    let (mut sink, mut stream) = socket.split();

    let mut greeting = vec![HubEvent::Hello {
        msg: "welcome".into(),
    }];
    if hub.is_connected() {
        greeting.push(hub.connected_event());
    }
    for event in greeting {
        if send_event(&mut sink, &event).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            published = events.recv() => match published {
                Ok(event) => {
                    if send_event(&mut sink, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%client, skipped, "dashboard lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let reply = handle_client_event(&hub, text.as_str()).await;
                    if send_event(&mut sink, &reply).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(%client, error = %e, "dashboard socket error");
                    break;
                }
            },
        }
    }
    tracing::debug!(%client, "dashboard disconnected");
}

async fn send_event<S>(sink: &mut S, event: &HubEvent) -> Result<(), ()>
where
    S: futures::Sink<Message> + Unpin,
{
    let json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode hub event");
            return Ok(());
        }
    };
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

pub(crate) async fn handle_client_event(hub: &Hub, raw: &str) -> HubEvent {
    let event: ClientEvent = match serde_json::from_str(raw) {
        Ok(event) => event,
        Err(e) => return HubEvent::error(format!("invalid event: {e}")),
    };
    match event {
        ClientEvent::Send { to, text } => match hub.send_text(&to, &text).await {
            Ok(()) => HubEvent::Sent { ok: true },
            Err(e) => HubEvent::error(e.to_string()),
        },
        ClientEvent::Command { command, to } => {
            if hub.messenger().is_none() {
                return HubEvent::error(Error::NotConnected.to_string());
            }
            let Some(to) = to.filter(|t| !t.trim().is_empty()) else {
                return HubEvent::error("target required");
            };
            if let Err(e) = Jid::user_or_jid(&to) {
                return HubEvent::error(e.to_string());
            }
            match hub.send_text(&to, &command).await {
                Ok(()) => HubEvent::Ok { sent: true },
                Err(e) => HubEvent::error(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messenger::MemoryMessenger;
    use crate::types::UserInfo;

    fn hub_with_messenger() -> (Hub, Arc<MemoryMessenger>) {
        let hub = Hub::new("bot");
        let m = Arc::new(MemoryMessenger::new(Some(UserInfo {
            id: Jid::user("1"),
            name: None,
        })));
        hub.set_messenger(Some(m.clone()));
        (hub, m)
    }

    #[test]
    fn client_events_parse() {
        let e: ClientEvent =
            serde_json::from_str(r#"{"event":"command","data":{"command":".menu"}}"#).unwrap();
        assert_eq!(
            e,
            ClientEvent::Command {
                command: ".menu".into(),
                to: None
            }
        );
    }

    #[tokio::test]
    async fn command_requires_connection_then_target() {
        let hub = Hub::new("bot");
        let raw = r#"{"event":"command","data":{"command":".menu","to":"9477"}}"#;
        assert_eq!(
            handle_client_event(&hub, raw).await,
            HubEvent::error("not connected")
        );

        let (hub, m) = hub_with_messenger();
        let raw = r#"{"event":"command","data":{"command":".menu"}}"#;
        assert_eq!(
            handle_client_event(&hub, raw).await,
            HubEvent::error("target required")
        );

        let raw = r#"{"event":"command","data":{"command":".menu","to":"9477"}}"#;
        assert_eq!(
            handle_client_event(&hub, raw).await,
            HubEvent::Ok { sent: true }
        );
        assert_eq!(m.sent()[0].to, Jid::user("9477"));
        assert_eq!(m.sent_texts(), vec![".menu"]);
    }

    #[tokio::test]
    async fn send_event_replies_sent_or_error() {
        let (hub, _) = hub_with_messenger();
        let raw = r#"{"event":"send","data":{"to":"9477","text":"hey"}}"#;
        assert_eq!(
            handle_client_event(&hub, raw).await,
            HubEvent::Sent { ok: true }
        );

        let idle = Hub::new("bot");
        assert_eq!(
            handle_client_event(&idle, raw).await,
            HubEvent::error("not connected")
        );
    }

    #[tokio::test]
    async fn garbage_is_an_error_event() {
        let hub = Hub::new("bot");
        let reply = handle_client_event(&hub, "not json").await;
        assert!(matches!(reply, HubEvent::Error { message } if message.starts_with("invalid event")));
    }
}
