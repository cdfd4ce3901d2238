//! Incoming and outgoing message shapes the bot reads and writes.

use super::{Jid, MessageId};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Identifies a message inside a chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageKey {
    pub remote_jid: Jid,
    #[serde(default)]
    pub from_me: bool,
    /// Sender inside a group chat.
    #[serde(default)]
    pub participant: Option<Jid>,
    pub id: MessageId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextInfo {
    #[serde(default)]
    pub mentioned_jid: Vec<Jid>,
    #[serde(default)]
    pub quoted_message: Option<Box<MessageContent>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedText {
    pub text: String,
    #[serde(default)]
    pub context_info: Option<ContextInfo>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMessage {
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
}

/// The parts of a message payload the bot cares about.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(default)]
    pub conversation: Option<String>,
    #[serde(default)]
    pub extended_text: Option<ExtendedText>,
    #[serde(default)]
    pub image: Option<MediaMessage>,
    #[serde(default)]
    pub video: Option<MediaMessage>,
}

impl MessageContent {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            conversation: Some(body.into()),
            ..Self::default()
        }
    }

    fn context_info(&self) -> Option<&ContextInfo> {
        self.extended_text
            .as_ref()
            .and_then(|e| e.context_info.as_ref())
    }
}

/// A message delivered by the protocol library.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub key: MessageKey,
    #[serde(default)]
    pub content: Option<MessageContent>,
}

impl IncomingMessage {
    pub fn chat(&self) -> &Jid {
        &self.key.remote_jid
    }

    /// Text of the message: conversation, extended text, then image or video
    /// caption, trimmed. Empty when there is none.
    pub fn body(&self) -> &str {
        let Some(content) = self.content.as_ref() else {
            return "";
        };
        [
            content.conversation.as_deref(),
            content.extended_text.as_ref().map(|e| e.text.as_str()),
            content.image.as_ref().and_then(|m| m.caption.as_deref()),
            content.video.as_ref().and_then(|m| m.caption.as_deref()),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .trim()
    }

    /// Who sent the message, without the device suffix.
    pub fn sender(&self) -> Jid {
        self.key
            .participant
            .as_ref()
            .unwrap_or(&self.key.remote_jid)
            .to_non_ad()
    }

    /// JIDs tagged in the message text.
    pub fn mentioned(&self) -> &[Jid] {
        self.content
            .as_ref()
            .and_then(MessageContent::context_info)
            .map(|c| c.mentioned_jid.as_slice())
            .unwrap_or(&[])
    }

    /// Quoted image if the message replies to one, else the message's own image.
    pub fn image_for_sticker(&self) -> Option<&MediaMessage> {
        let content = self.content.as_ref()?;
        content
            .context_info()
            .and_then(|c| c.quoted_message.as_deref())
            .and_then(|q| q.image.as_ref())
            .or(content.image.as_ref())
    }
}

/// Button attached to a [`OutgoingContent::Template`] message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateButton {
    Url { display_text: String, url: String },
    QuickReply { display_text: String, id: String },
}

/// What the bot sends back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutgoingContent {
    Text(String),
    Template {
        text: String,
        footer: String,
        /// Rendered with 1-based indices in order.
        buttons: Vec<TemplateButton>,
    },
    Sticker(Bytes),
    Image {
        data: Bytes,
        caption: Option<String>,
    },
    Video {
        data: Bytes,
        caption: Option<String>,
    },
    Document {
        data: Bytes,
        file_name: String,
        mimetype: String,
    },
    Audio {
        data: Bytes,
        mimetype: String,
        file_name: String,
    },
}

impl OutgoingContent {
    pub fn text(body: impl Into<String>) -> Self {
        Self::Text(body.into())
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Template { .. } => "template",
            Self::Sticker(_) => "sticker",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Document { .. } => "document",
            Self::Audio { .. } => "audio",
        }
    }

    /// Text part, if any (text body, template text or media caption).
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Template { text, .. } => Some(text),
            Self::Image { caption, .. } | Self::Video { caption, .. } => caption.as_deref(),
            _ => None,
        }
    }
}

/// Group details returned by the protocol library.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMetadata {
    pub id: Jid,
    pub subject: String,
    pub participants: Vec<Jid>,
}

/// Membership change applied to group participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantAction {
    Add,
    Remove,
    Promote,
    Demote,
}

impl ParticipantAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Promote => "promote",
            Self::Demote => "demote",
        }
    }
}

/// Account the bot is logged in as.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Jid,
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(chat: &str, participant: Option<&str>) -> MessageKey {
        MessageKey {
            remote_jid: chat.parse().unwrap(),
            from_me: false,
            participant: participant.map(|p| p.parse().unwrap()),
            id: "ABC".into(),
        }
    }

    #[test]
    fn body_prefers_conversation_then_extended_then_captions() {
        let mut content = MessageContent {
            image: Some(MediaMessage {
                caption: Some(" .sticker ".into()),
                mimetype: None,
            }),
            ..Default::default()
        };
        let mut msg = IncomingMessage {
            key: key("1@s.whatsapp.net", None),
            content: Some(content.clone()),
        };
        assert_eq!(msg.body(), ".sticker");

        content.extended_text = Some(ExtendedText {
            text: ".menu".into(),
            context_info: None,
        });
        msg.content = Some(content.clone());
        assert_eq!(msg.body(), ".menu");

        content.conversation = Some(String::new());
        msg.content = Some(content);
        assert_eq!(msg.body(), ".menu");

        msg.content = None;
        assert_eq!(msg.body(), "");
    }

    #[test]
    fn sender_uses_participant_in_groups() {
        let msg = IncomingMessage {
            key: key("123@g.us", Some("9477:4@s.whatsapp.net")),
            content: None,
        };
        assert_eq!(msg.sender().to_string(), "9477@s.whatsapp.net");

        let dm = IncomingMessage {
            key: key("9478@s.whatsapp.net", None),
            content: None,
        };
        assert_eq!(dm.sender().to_string(), "9478@s.whatsapp.net");
    }

    #[test]
    fn sticker_source_prefers_quoted_image() {
        let quoted = MessageContent {
            image: Some(MediaMessage {
                caption: Some("quoted".into()),
                mimetype: Some("image/jpeg".into()),
            }),
            ..Default::default()
        };
        let msg = IncomingMessage {
            key: key("1@s.whatsapp.net", None),
            content: Some(MessageContent {
                extended_text: Some(ExtendedText {
                    text: ".sticker".into(),
                    context_info: Some(ContextInfo {
                        mentioned_jid: vec![],
                        quoted_message: Some(Box::new(quoted)),
                    }),
                }),
                ..Default::default()
            }),
        };
        let img = msg.image_for_sticker().unwrap();
        assert_eq!(img.caption.as_deref(), Some("quoted"));

        let plain = IncomingMessage {
            key: key("1@s.whatsapp.net", None),
            content: Some(MessageContent::text(".sticker")),
        };
        assert!(plain.image_for_sticker().is_none());
    }

    #[test]
    fn mentions_come_from_extended_text() {
        let msg = IncomingMessage {
            key: key("1@g.us", Some("2@s.whatsapp.net")),
            content: Some(MessageContent {
                extended_text: Some(ExtendedText {
                    text: ".kick @3".into(),
                    context_info: Some(ContextInfo {
                        mentioned_jid: vec![Jid::user("3")],
                        quoted_message: None,
                    }),
                }),
                ..Default::default()
            }),
        };
        assert_eq!(msg.mentioned(), &[Jid::user("3")]);
    }
}
