//! # yehazz-bot
//!
//! WhatsApp command bot built on top of a protocol library.
//!
//! ## Features
//!
//! - Dot-prefixed chat commands (`.menu`, `.sticker`, `.yt`, `.kick`, ...)
//! - Image to WebP sticker conversion
//! - URL relay as document, image or video
//! - YouTube audio through `yt-dlp`
//! - Group administration (add, kick, promote, demote, info)
//! - Reconnecting connection supervisor with session cleanup on logout
//! - HTTP and WebSocket control bridge for a web dashboard
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use yehazz_bot::{Bot, BotProfile, Hub, Supervisor, SessionDir};
//! use yehazz_bot::media::{HttpFetcher, YtDlp};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let profile = BotProfile { name: "yehazz md".into(), website: "https://example.com".into() };
//!     let bot = Arc::new(Bot::new(profile, Arc::new(HttpFetcher::new()?), Arc::new(YtDlp::default())));
//!     let hub = Arc::new(Hub::new("yehazz md"));
//!     let session = SessionDir::new("auth", "default")?;
//!     Supervisor::new(my_connector(), session, bot, hub).run().await?;
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod bridge;
pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod events;
pub mod hub;
pub mod media;
pub mod messenger;
pub mod session;
pub mod types;

pub use bot::{Bot, BotProfile};
pub use commands::Command;
pub use config::{Args, Settings};
pub use connection::{Connection, Connector, ConsoleConnector, Supervisor};
pub use error::{Error, Result};
pub use events::{DisconnectReason, Event};
pub use hub::{Hub, HubEvent};
pub use messenger::{MemoryMessenger, Messenger, SendResponse, SharedMessenger};
pub use session::SessionDir;
pub use types::{IncomingMessage, Jid, MessageId, OutgoingContent};
