//! The seam to the protocol library.
//!
//! Everything the bot does on the network goes through [`Messenger`]. The
//! library owns sessions, encryption and transport; implementations only
//! translate these calls into its API.

mod memory;

pub use memory::{MemoryMessenger, ParticipantUpdate, SentMessage};

use crate::types::{
    GroupMetadata, IncomingMessage, Jid, MessageId, OutgoingContent, ParticipantAction, UserInfo,
};
use async_trait::async_trait;
use bytes::Bytes;
use sha2::Digest;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Response from sending a message.
#[derive(Clone, Debug)]
pub struct SendResponse {
    pub timestamp: SystemTime,
    pub id: MessageId,
    pub sender: Option<Jid>,
}

/// Operations the bot needs from a live connection.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send `content` to `to`, optionally as a reply quoting `quoted`.
    async fn send(
        &self,
        to: &Jid,
        content: OutgoingContent,
        quoted: Option<&IncomingMessage>,
    ) -> crate::Result<SendResponse>;

    /// Download the media attached to (or quoted by) `msg`.
    async fn download_media(&self, msg: &IncomingMessage) -> crate::Result<Bytes>;

    async fn group_participants_update(
        &self,
        group: &Jid,
        participants: &[Jid],
        action: ParticipantAction,
    ) -> crate::Result<()>;

    async fn group_metadata(&self, group: &Jid) -> crate::Result<GroupMetadata>;

    async fn update_profile_name(&self, name: &str) -> crate::Result<()>;

    /// Account we are logged in as, once the connection is open.
    fn own_user(&self) -> Option<UserInfo>;
}

/// Shared handle used by the bot, the supervisor and the bridge.
pub type SharedMessenger = Arc<dyn Messenger>;

/// Generate a message ID (3EB0 + hex of hash).
pub fn generate_message_id() -> MessageId {
    let mut data = Vec::with_capacity(8 + 5 + 16);
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    data.extend_from_slice(&t.to_be_bytes());
    data.extend_from_slice(b"@c.us");
    data.extend_from_slice(&rand::random::<[u8; 16]>());
    let hash = sha2::Sha256::digest(&data);
    format!("3EB0{}", hex::encode(&hash[..9]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_message_id_format() {
        let id = generate_message_id();
        assert!(id.starts_with("3EB0"));
        assert_eq!(id.len(), 4 + 18);
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_message_id());
    }
}
