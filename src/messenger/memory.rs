use super::{generate_message_id, Messenger, SendResponse};
use crate::error::MessengerError;
use crate::types::{
    GroupMetadata, IncomingMessage, Jid, MessageId, OutgoingContent, ParticipantAction, UserInfo,
};
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::SystemTime;

/// A message recorded by [`MemoryMessenger::send`].
#[derive(Clone, Debug)]
pub struct SentMessage {
    pub to: Jid,
    pub content: OutgoingContent,
    /// ID of the quoted message, when sent as a reply.
    pub quoted: Option<MessageId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantUpdate {
    pub group: Jid,
    pub participants: Vec<Jid>,
    pub action: ParticipantAction,
}

/// In-process messenger that records calls (for tests and console runs; nothing
/// reaches a network).
pub struct MemoryMessenger {
    own: Option<UserInfo>,
    outbox: Mutex<VecDeque<SentMessage>>,
    /// Oldest sends are dropped past this many.
    outbox_limit: Option<usize>,
    participant_updates: Mutex<Vec<ParticipantUpdate>>,
    profile_name: Mutex<Option<String>>,
    groups: RwLock<HashMap<Jid, GroupMetadata>>,
    media: RwLock<HashMap<MessageId, Bytes>>,
    failing: AtomicBool,
}

impl MemoryMessenger {
    pub fn new(own: Option<UserInfo>) -> Self {
        Self {
            own,
            outbox: Mutex::new(VecDeque::new()),
            outbox_limit: None,
            participant_updates: Mutex::new(Vec::new()),
            profile_name: Mutex::new(None),
            groups: RwLock::new(HashMap::new()),
            media: RwLock::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Keep only the `limit` most recent sends.
    pub fn with_outbox_limit(mut self, limit: usize) -> Self {
        self.outbox_limit = Some(limit);
        self
    }

    /// Register group metadata served by `group_metadata`.
    pub fn with_group(self, meta: GroupMetadata) -> Self {
        if let Ok(mut groups) = self.groups.write() {
            groups.insert(meta.id.clone(), meta);
        }
        self
    }

    /// Attach media bytes to the message with the given ID.
    pub fn put_media(&self, id: impl Into<MessageId>, data: impl Into<Bytes>) {
        if let Ok(mut media) = self.media.write() {
            media.insert(id.into(), data.into());
        }
    }

    /// Make every subsequent call fail (simulates a dropped connection).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.outbox
            .lock()
            .map(|o| o.iter().cloned().collect())
            .unwrap_or_else(|e| e.into_inner().iter().cloned().collect())
    }

    /// Text of every sent message that has one, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent()
            .iter()
            .filter_map(|m| m.content.as_text().map(str::to_string))
            .collect()
    }

    pub fn participant_updates(&self) -> Vec<ParticipantUpdate> {
        self.participant_updates
            .lock()
            .map(|u| u.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    pub fn profile_name(&self) -> Option<String> {
        self.profile_name
            .lock()
            .map(|n| n.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MessengerError::Closed.into());
        }
        Ok(())
    }
}

impl Default for MemoryMessenger {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Messenger for MemoryMessenger {
    async fn send(
        &self,
        to: &Jid,
        content: OutgoingContent,
        quoted: Option<&IncomingMessage>,
    ) -> Result<SendResponse> {
        self.check()?;
        tracing::info!(
            to = %to,
            kind = content.kind(),
            text = content.as_text().unwrap_or(""),
            "outgoing message"
        );
        {
            let mut outbox = self
                .outbox
                .lock()
                .map_err(|e| MessengerError::Send(e.to_string()))?;
            outbox.push_back(SentMessage {
                to: to.clone(),
                content,
                quoted: quoted.map(|q| q.key.id.clone()),
            });
            if let Some(limit) = self.outbox_limit {
                while outbox.len() > limit {
                    outbox.pop_front();
                }
            }
        }
        Ok(SendResponse {
            timestamp: SystemTime::now(),
            id: generate_message_id(),
            sender: self.own.as_ref().map(|u| u.id.clone()),
        })
    }

    async fn download_media(&self, msg: &IncomingMessage) -> Result<Bytes> {
        self.check()?;
        let media = self
            .media
            .read()
            .map_err(|e| MessengerError::Download(e.to_string()))?;
        media
            .get(&msg.key.id)
            .cloned()
            .ok_or_else(|| MessengerError::Download(format!("no media for {}", msg.key.id)).into())
    }

    async fn group_participants_update(
        &self,
        group: &Jid,
        participants: &[Jid],
        action: ParticipantAction,
    ) -> Result<()> {
        self.check()?;
        tracing::info!(group = %group, action = action.as_str(), count = participants.len(), "participants update");
        self.participant_updates
            .lock()
            .map_err(|e| MessengerError::Group(e.to_string()))?
            .push(ParticipantUpdate {
                group: group.clone(),
                participants: participants.to_vec(),
                action,
            });
        Ok(())
    }

    async fn group_metadata(&self, group: &Jid) -> Result<GroupMetadata> {
        self.check()?;
        let groups = self
            .groups
            .read()
            .map_err(|e| MessengerError::Group(e.to_string()))?;
        groups
            .get(group)
            .cloned()
            .ok_or_else(|| MessengerError::Group(format!("unknown group {group}")).into())
    }

    async fn update_profile_name(&self, name: &str) -> Result<()> {
        self.check()?;
        *self
            .profile_name
            .lock()
            .map_err(|e| MessengerError::Send(e.to_string()))? = Some(name.to_string());
        Ok(())
    }

    fn own_user(&self) -> Option<UserInfo> {
        self.own.clone()
    }
}
