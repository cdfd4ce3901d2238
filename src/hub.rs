//! Live connection state shared by the supervisor and the control bridge.

use crate::events::DisconnectReason;
use crate::messenger::SharedMessenger;
use crate::types::{Jid, OutgoingContent, UserInfo};
use crate::{Error, Result};
use serde::Serialize;
use std::sync::RwLock;
use tokio::sync::broadcast;

const EVENT_BUFFER: usize = 64;

/// Events pushed to realtime clients, framed as `{"event": ..., "data": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum HubEvent {
    Hello {
        msg: String,
    },
    Qr {
        qr: String,
        #[serde(rename = "dataUrl", skip_serializing_if = "Option::is_none")]
        data_url: Option<String>,
    },
    Connected {
        status: &'static str,
        name: String,
        user: Option<UserInfo>,
    },
    Disconnected {
        status: &'static str,
        /// Numeric status code when the library gave one.
        reason: DisconnectReason,
    },
    Sent {
        ok: bool,
    },
    Ok {
        sent: bool,
    },
    Error {
        message: String,
    },
}

impl HubEvent {
    pub fn connected(name: &str, user: Option<UserInfo>) -> Self {
        Self::Connected {
            status: "connected",
            name: name.to_string(),
            user,
        }
    }

    pub fn disconnected(reason: DisconnectReason) -> Self {
        Self::Disconnected {
            status: "disconnected",
            reason,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

pub struct Hub {
    bot_name: String,
    messenger: RwLock<Option<SharedMessenger>>,
    events: broadcast::Sender<HubEvent>,
}

impl Hub {
    pub fn new(bot_name: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            bot_name: bot_name.into(),
            messenger: RwLock::new(None),
            events,
        }
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    pub fn set_messenger(&self, messenger: Option<SharedMessenger>) {
        match self.messenger.write() {
            Ok(mut slot) => *slot = messenger,
            Err(e) => *e.into_inner() = messenger,
        }
    }

    pub fn messenger(&self) -> Option<SharedMessenger> {
        match self.messenger.read() {
            Ok(slot) => slot.clone(),
            Err(e) => e.into_inner().clone(),
        }
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.messenger().and_then(|m| m.own_user())
    }

    /// Connected means a live messenger that knows who it is logged in as.
    pub fn is_connected(&self) -> bool {
        self.user().is_some()
    }

    pub fn connected_event(&self) -> HubEvent {
        HubEvent::connected(&self.bot_name, self.user())
    }

    /// Broadcast to every subscriber. Having none is fine.
    pub fn publish(&self, event: HubEvent) {
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.events.subscribe()
    }

    /// Send a plain text message to a phone number or JID.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        let messenger = self.messenger().ok_or(Error::NotConnected)?;
        let jid = Jid::user_or_jid(to)?;
        messenger
            .send(&jid, OutgoingContent::text(text), None)
            .await?;
        tracing::info!(to = %jid, "bridge message sent");
        Ok(())
    }
}
