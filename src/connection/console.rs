//! Offline connector: chat lines come from stdin, replies go to the log.

use super::{Connection, Connector};
use crate::events::Event;
use crate::messenger::{generate_message_id, MemoryMessenger};
use crate::types::{
    ContextInfo, ExtendedText, IncomingMessage, Jid, MessageContent, MessageKey, UserInfo,
};
use crate::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const EVENT_BUFFER: usize = 32;
/// Replies are only logged; keep a handful for inspection.
const OUTBOX_LIMIT: usize = 16;

pub struct ConsoleConnector {
    chat: Jid,
    sender: Jid,
    own: UserInfo,
}

impl ConsoleConnector {
    /// Lines typed on stdin arrive in `chat` as if sent by `sender`.
    pub fn new(chat: Jid, sender: Jid, own: UserInfo) -> Self {
        Self { chat, sender, own }
    }

    /// Build the message a console line stands for. `@<number>` tokens become
    /// mentions, as a phone client would encode them.
    pub fn message_for_line(&self, line: &str) -> IncomingMessage {
        let mentioned_jid: Vec<Jid> = line
            .split_whitespace()
            .filter_map(|t| t.strip_prefix('@'))
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .map(Jid::user)
            .collect();
        let content = if mentioned_jid.is_empty() {
            MessageContent::text(line)
        } else {
            MessageContent {
                extended_text: Some(ExtendedText {
                    text: line.to_string(),
                    context_info: Some(ContextInfo {
                        mentioned_jid,
                        quoted_message: None,
                    }),
                }),
                ..MessageContent::default()
            }
        };
        IncomingMessage {
            key: MessageKey {
                remote_jid: self.chat.clone(),
                from_me: false,
                participant: self.chat.is_group().then(|| self.sender.clone()),
                id: generate_message_id(),
            },
            content: Some(content),
        }
    }

    /// Feed lines from `input` as events until it is exhausted.
    pub fn spawn_reader<R>(self: Arc<Self>, input: R, tx: mpsc::Sender<Event>)
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut lines = input.lines();
            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "console read failed");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                let messages = vec![self.message_for_line(&line)];
                if tx.send(Event::MessagesUpsert { messages }).await.is_err() {
                    break;
                }
            }
            tracing::info!("console input closed");
        });
    }
}

#[async_trait]
impl Connector for ConsoleConnector {
    async fn connect(&self, auth_dir: &Path) -> Result<Connection> {
        tracing::info!(auth_dir = %auth_dir.display(), chat = %self.chat, "console session");
        let messenger =
            Arc::new(MemoryMessenger::new(Some(self.own.clone())).with_outbox_limit(OUTBOX_LIMIT));
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        tx.send(Event::ConnectionOpen {
            user: Some(self.own.clone()),
        })
        .await
        .map_err(|_| crate::error::MessengerError::Closed)?;

        let reader = Arc::new(Self::new(
            self.chat.clone(),
            self.sender.clone(),
            self.own.clone(),
        ));
        reader.spawn_reader(BufReader::new(tokio::io::stdin()), tx);
        Ok(Connection {
            messenger,
            events: rx,
        })
    }
}
