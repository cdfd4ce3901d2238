mod jid;
mod message;

pub use jid::{
    Jid, JidParseError, BROADCAST_SERVER, DEFAULT_USER_SERVER, GROUP_SERVER, HIDDEN_USER_SERVER,
    LEGACY_USER_SERVER, NEWSLETTER_SERVER,
};
pub use message::{
    ContextInfo, ExtendedText, GroupMetadata, IncomingMessage, MediaMessage, MessageContent,
    MessageKey, OutgoingContent, ParticipantAction, TemplateButton, UserInfo,
};

/// Message ID type (protocol-assigned ID string).
pub type MessageId = String;
