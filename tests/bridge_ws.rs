use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use yehazz_bot::events::DisconnectReason;
use yehazz_bot::types::UserInfo;
use yehazz_bot::{bridge, Hub, HubEvent, Jid, MemoryMessenger};

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn start(hub: Arc<Hub>) -> Client {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(bridge::serve(listener, hub));
    let (ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    ws
}

async fn next_frame(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .unwrap();
        if msg.is_text() {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

fn connected_hub() -> (Arc<Hub>, Arc<MemoryMessenger>) {
    let hub = Arc::new(Hub::new("yehazz md"));
    let m = Arc::new(MemoryMessenger::new(Some(UserInfo {
        id: Jid::user("19990000000"),
        name: None,
    })));
    hub.set_messenger(Some(m.clone()));
    (hub, m)
}

#[tokio::test]
async fn greets_with_status_then_forwards_broadcasts() {
    let (hub, _) = connected_hub();
    let mut ws = start(Arc::clone(&hub)).await;

    assert_eq!(
        next_frame(&mut ws).await,
        json!({"event": "hello", "data": {"msg": "welcome"}})
    );
    assert_eq!(
        next_frame(&mut ws).await,
        json!({"event": "connected", "data": {
            "status": "connected",
            "name": "yehazz md",
            "user": {"id": "19990000000@s.whatsapp.net", "name": null}
        }})
    );

    hub.publish(HubEvent::disconnected(DisconnectReason::from_code(428)));
    assert_eq!(
        next_frame(&mut ws).await,
        json!({"event": "disconnected", "data": {"status": "disconnected", "reason": 428}})
    );
}

#[tokio::test]
async fn idle_session_only_says_hello() {
    let hub = Arc::new(Hub::new("yehazz md"));
    let mut ws = start(Arc::clone(&hub)).await;

    assert_eq!(next_frame(&mut ws).await["event"], "hello");
    hub.publish(HubEvent::Qr {
        qr: "2@abc".into(),
        data_url: None,
    });
    assert_eq!(
        next_frame(&mut ws).await,
        json!({"event": "qr", "data": {"qr": "2@abc"}})
    );
}

#[tokio::test]
async fn client_send_event_delivers_and_acks() {
    let (hub, m) = connected_hub();
    let mut ws = start(hub).await;
    next_frame(&mut ws).await;
    next_frame(&mut ws).await;

    let request = json!({"event": "send", "data": {"to": "94770000002", "text": "hi"}});
    ws.send(Message::Text(request.to_string().into()))
        .await
        .unwrap();
    assert_eq!(
        next_frame(&mut ws).await,
        json!({"event": "sent", "data": {"ok": true}})
    );
    assert_eq!(m.sent()[0].to, Jid::user("94770000002"));
    assert_eq!(m.sent_texts(), vec!["hi"]);
}
