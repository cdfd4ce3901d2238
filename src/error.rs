use thiserror::Error;

/// Library result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the bot.
#[derive(Error, Debug)]
pub enum Error {
    #[error("messenger: {0}")]
    Messenger(#[from] MessengerError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("session: {0}")]
    Session(#[from] SessionError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid JID: {0}")]
    Jid(#[from] crate::types::JidParseError),

    #[error("not connected")]
    NotConnected,

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Errors reported by the protocol library behind [`Messenger`](crate::Messenger).
#[derive(Error, Debug)]
pub enum MessengerError {
    #[error("send failed: {0}")]
    Send(String),

    #[error("media download failed: {0}")]
    Download(String),

    #[error("group operation failed: {0}")]
    Group(String),

    #[error("connection closed")]
    Closed,
}

/// Media conversion errors.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("Not a valid YouTube URL")]
    InvalidYoutubeUrl,

    #[error("yt-dlp: {0}")]
    Extractor(String),

    #[error("qr: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("worker: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// HTTP fetch errors. Display strings are shown to chat users as-is.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("fetch error {0}")]
    Status(u16),

    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// Session directory errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("create {path}: {source}")]
    Create {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("remove {path}: {source}")]
    Remove {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("invalid session id: {0:?}")]
    InvalidId(String),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("bot display name must not be empty")]
    EmptyBotName,

    #[error("invalid frontend url {url:?}: {reason}")]
    InvalidFrontendUrl { url: String, reason: String },

    #[error("invalid welcome target: {0}")]
    InvalidWelcomeTarget(String),

    #[error("invalid console chat: {0}")]
    InvalidConsoleChat(String),
}
