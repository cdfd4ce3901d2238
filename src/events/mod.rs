//! Event types reported by the protocol library.

use crate::types::{IncomingMessage, UserInfo};
use std::fmt;

/// Events delivered by a [`Connection`](crate::connection::Connection).
#[derive(Clone, Debug)]
pub enum Event {
    /// Pairing QR payload; a new one arrives each time the previous expires.
    Qr { code: String },

    /// Connected and authenticated.
    ConnectionOpen { user: Option<UserInfo> },

    /// Connection dropped. The supervisor reconnects unless the stream ends.
    ConnectionClosed { reason: DisconnectReason },

    /// Credentials changed and were persisted by the library.
    CredsUpdate,

    /// New messages (usually a batch of one).
    MessagesUpsert { messages: Vec<IncomingMessage> },
}

/// Why a connection closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisconnectReason {
    LoggedOut,
    ConnectionLost,
    MultideviceMismatch,
    ConnectionClosed,
    ConnectionReplaced,
    BadSession,
    RestartRequired,
    /// Unknown code or a bare error message.
    Other(String),
}

impl DisconnectReason {
    pub fn from_code(code: u16) -> Self {
        match code {
            401 => Self::LoggedOut,
            408 => Self::ConnectionLost,
            411 => Self::MultideviceMismatch,
            428 => Self::ConnectionClosed,
            440 => Self::ConnectionReplaced,
            500 => Self::BadSession,
            515 => Self::RestartRequired,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            Self::LoggedOut => Some(401),
            Self::ConnectionLost => Some(408),
            Self::MultideviceMismatch => Some(411),
            Self::ConnectionClosed => Some(428),
            Self::ConnectionReplaced => Some(440),
            Self::BadSession => Some(500),
            Self::RestartRequired => Some(515),
            Self::Other(_) => None,
        }
    }

    /// The session was revoked; stored credentials are useless.
    pub fn is_logged_out(&self) -> bool {
        matches!(self, Self::LoggedOut)
    }
}

impl Default for DisconnectReason {
    fn default() -> Self {
        Self::Other("unknown".to_string())
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.code()) {
            (Self::Other(msg), _) => write!(f, "{msg}"),
            (_, Some(code)) => write!(f, "{code}"),
            (_, None) => write!(f, "unknown"),
        }
    }
}

/// Status codes serialize as JSON numbers, anything else as its message.
impl serde::Serialize for DisconnectReason {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let code = match self {
            Self::Other(msg) => msg.parse::<u16>().ok(),
            known => known.code(),
        };
        match (code, self) {
            (Some(code), _) => serializer.serialize_u16(code),
            (None, Self::Other(msg)) => serializer.serialize_str(msg),
            (None, _) => serializer.serialize_str("unknown"),
        }
    }
}
