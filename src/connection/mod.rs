//! Connection supervisor.
//!
//! Drives one [`Connector`] for the lifetime of the process: connects,
//! reacts to connection events, routes messages to the [`Bot`] and
//! reconnects after a close.

mod console;

pub use console::ConsoleConnector;

use crate::bot::Bot;
use crate::events::{DisconnectReason, Event};
use crate::hub::{Hub, HubEvent};
use crate::media::qr::qr_data_url;
use crate::messenger::SharedMessenger;
use crate::session::SessionDir;
use crate::types::{Jid, OutgoingContent, UserInfo};
use crate::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// A live (or connecting) session handed out by a [`Connector`].
pub struct Connection {
    pub messenger: SharedMessenger,
    pub events: mpsc::Receiver<Event>,
}

/// Opens sessions through the protocol library.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Start a session whose credentials live in `auth_dir`.
    async fn connect(&self, auth_dir: &Path) -> Result<Connection>;
}

/// What to do after the event stream of one connection is done.
#[derive(Debug, PartialEq, Eq)]
enum Next {
    Reconnect,
    Stop,
}

pub struct Supervisor {
    connector: Arc<dyn Connector>,
    session: SessionDir,
    bot: Arc<Bot>,
    hub: Arc<Hub>,
    welcome_target: Option<Jid>,
    reconnect_delay: Duration,
}

impl Supervisor {
    pub fn new(
        connector: Arc<dyn Connector>,
        session: SessionDir,
        bot: Arc<Bot>,
        hub: Arc<Hub>,
    ) -> Self {
        Self {
            connector,
            session,
            bot,
            hub,
            welcome_target: None,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }

    /// Chat that gets a greeting each time the connection opens.
    pub fn welcome_target(mut self, target: Option<Jid>) -> Self {
        self.welcome_target = target;
        self
    }

    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Run until a connection's event stream ends without a close.
    ///
    /// Failed connection attempts are retried after the reconnect delay.
    pub async fn run(&self) -> Result<()> {
        loop {
            let auth_dir = self.session.ensure().await?;
            let connection = match self.connector.connect(&auth_dir).await {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(error = %e, "connect failed");
                    tokio::time::sleep(self.reconnect_delay).await;
                    continue;
                }
            };
            match self.drive(connection).await {
                Next::Reconnect => {
                    tracing::info!(delay = ?self.reconnect_delay, "reconnecting");
                    tokio::time::sleep(self.reconnect_delay).await;
                }
                Next::Stop => {
                    self.hub.set_messenger(None);
                    tracing::info!("event stream ended, supervisor stopping");
                    return Ok(());
                }
            }
        }
    }

    async fn drive(&self, connection: Connection) -> Next {
        let Connection {
            messenger,
            mut events,
        } = connection;
        let mut handlers = JoinSet::new();
        let mut next = Next::Stop;

        while let Some(event) = events.recv().await {
            match event {
                Event::Qr { code } => self.on_qr(code),
                Event::ConnectionOpen { user } => self.on_open(&messenger, user).await,
                Event::ConnectionClosed { reason } => {
                    self.on_close(&reason).await;
                    next = Next::Reconnect;
                    break;
                }
                Event::CredsUpdate => tracing::debug!("credentials updated"),
                Event::MessagesUpsert { messages } => {
                    let bot = Arc::clone(&self.bot);
                    let messenger = Arc::clone(&messenger);
                    handlers.spawn(async move {
                        bot.handle_upsert(messenger.as_ref(), &messages).await;
                    });
                }
            }
            // reap finished handlers so the set does not grow unbounded
            while let Some(res) = handlers.try_join_next() {
                if let Err(e) = res {
                    tracing::error!(error = %e, "message handler panicked");
                }
            }
        }

        if next == Next::Reconnect && !handlers.is_empty() {
            // replies to the closed connection must not hold up the reconnect
            tracing::debug!(pending = handlers.len(), "leaving handlers to finish");
            tokio::spawn(reap(handlers));
        } else {
            reap(handlers).await;
        }
        next
    }

    fn on_qr(&self, code: String) {
        let data_url = qr_data_url(&code)
            .map_err(|e| tracing::warn!(error = %e, "failed to render QR"))
            .ok();
        tracing::info!("pairing QR received");
        self.hub.publish(HubEvent::Qr {
            qr: code,
            data_url,
        });
    }

    async fn on_open(&self, messenger: &SharedMessenger, user: Option<UserInfo>) {
        let user = user.or_else(|| messenger.own_user());
        tracing::info!(user = ?user.as_ref().map(|u| u.id.to_string()), "connected");
        self.hub.set_messenger(Some(Arc::clone(messenger)));

        let name = self.hub.bot_name();
        if let Err(e) = messenger.update_profile_name(name).await {
            tracing::debug!(error = %e, "profile name update failed");
        }
        if let Some(target) = &self.welcome_target {
            let greeting = format!("{name} WhatsApp Bot Connected Successfully!");
            if let Err(e) = messenger
                .send(target, OutgoingContent::Text(greeting), None)
                .await
            {
                tracing::warn!(chat = %target, error = %e, "welcome message failed");
            }
        }
        self.hub.publish(HubEvent::connected(name, user));
    }

    async fn on_close(&self, reason: &DisconnectReason) {
        tracing::warn!(%reason, "connection closed");
        self.hub.set_messenger(None);
        self.hub.publish(HubEvent::disconnected(reason.clone()));
        if reason.is_logged_out() {
            if let Err(e) = self.session.remove().await {
                tracing::warn!(error = %e, "could not clear logged-out session");
            }
        }
    }
}

async fn reap(mut handlers: JoinSet<()>) {
    while let Some(res) = handlers.join_next().await {
        if let Err(e) = res {
            tracing::error!(error = %e, "message handler panicked");
        }
    }
}
