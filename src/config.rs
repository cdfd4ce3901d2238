//! Runtime settings from CLI flags and the environment.
//!
//! Every flag falls back to an environment variable (a `.env` file is loaded
//! into the environment by the binary before parsing).

use crate::bot::BotProfile;
use crate::error::ConfigError;
use crate::session::{SessionDir, DEFAULT_SESSION_ID};
use crate::types::Jid;
use crate::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BOT_NAME: &str = "yehazz md";
pub const DEFAULT_FRONTEND_URL: &str = "https://your-frontend-domain.com";
pub const DEFAULT_CONSOLE_CHAT: &str = "10000000000@s.whatsapp.net";

/// WhatsApp command bot with a web control bridge.
#[derive(Parser, Debug, Clone)]
#[command(name = "yehazz-bot")]
#[command(version)]
pub struct Args {
    /// Port of the HTTP/WebSocket control bridge.
    #[arg(long, env = "PORT", default_value_t = crate::bridge::DEFAULT_PORT)]
    pub port: u16,

    /// Display name used for the profile, greetings and the menu.
    #[arg(long, env = "BOT_DISPLAY_NAME", default_value = DEFAULT_BOT_NAME)]
    pub bot_name: String,

    /// Phone number or JID greeted every time the connection opens.
    #[arg(long, env = "WELCOME_TARGET")]
    pub welcome_target: Option<String>,

    /// Directory holding session credentials.
    #[arg(long, env = "AUTH_DIR", default_value = "auth")]
    pub auth_dir: PathBuf,

    /// Session name; credentials live in `<auth-dir>/<session-id>`.
    #[arg(long, env = "SESSION_ID", default_value = DEFAULT_SESSION_ID)]
    pub session_id: String,

    /// Link behind the menu's "Website" button.
    #[arg(long, env = "FRONTEND_URL", default_value = DEFAULT_FRONTEND_URL)]
    pub frontend_url: String,

    /// Seconds to wait before reconnecting after a close.
    #[arg(long, env = "RECONNECT_DELAY_SECS", default_value_t = 3)]
    pub reconnect_delay_secs: u64,

    /// Chat the console connector pretends stdin lines come from.
    #[arg(long, env = "CONSOLE_CHAT", default_value = DEFAULT_CONSOLE_CHAT)]
    pub console_chat: String,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

/// Validated settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub profile: BotProfile,
    pub welcome_target: Option<Jid>,
    pub session: SessionDir,
    pub reconnect_delay: Duration,
    pub console_chat: Jid,
}

impl Settings {
    /// # Errors
    ///
    /// Returns an error if a value is empty or malformed.
    pub fn from_args(args: Args) -> Result<Self> {
        let name = args.bot_name.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyBotName.into());
        }
        validate_frontend_url(&args.frontend_url)?;

        let welcome_target = match args.welcome_target.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(target) => Some(
                Jid::user_or_jid(target)
                    .map_err(|_| ConfigError::InvalidWelcomeTarget(target.to_string()))?,
            ),
        };
        let console_chat = Jid::user_or_jid(&args.console_chat)
            .map_err(|_| ConfigError::InvalidConsoleChat(args.console_chat.clone()))?;

        Ok(Self {
            port: args.port,
            profile: BotProfile {
                name: name.to_string(),
                website: args.frontend_url,
            },
            welcome_target,
            session: SessionDir::new(args.auth_dir, args.session_id)?,
            reconnect_delay: Duration::from_secs(args.reconnect_delay_secs),
            console_chat,
        })
    }
}

fn validate_frontend_url(url: &str) -> std::result::Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidFrontendUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["yehazz-bot"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_explicit_flags() {
        let settings = Settings::from_args(args(&[
            "--port",
            "8080",
            "--bot-name",
            "  my bot ",
            "--welcome-target",
            "94770000001",
            "--auth-dir",
            "/tmp/a",
            "--session-id",
            "work",
            "--reconnect-delay-secs",
            "1",
            "--console-chat",
            "42@g.us",
        ]))
        .unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.profile.name, "my bot");
        assert_eq!(settings.welcome_target, Some(Jid::user("94770000001")));
        assert_eq!(settings.session.path(), PathBuf::from("/tmp/a/work"));
        assert_eq!(settings.reconnect_delay, Duration::from_secs(1));
        assert!(settings.console_chat.is_group());
    }

    #[test]
    fn test_log_level_stays_on_args() {
        // consumed by logging setup before settings are validated
        assert_eq!(args(&[]).log_level, "info");
        assert_eq!(args(&["-l", "debug"]).log_level, "debug");
    }

    #[test]
    fn test_blank_welcome_target_is_none() {
        let settings = Settings::from_args(args(&["--welcome-target", "  "])).unwrap();
        assert!(settings.welcome_target.is_none());
    }

    #[test]
    fn test_empty_bot_name_rejected() {
        let err = Settings::from_args(args(&["--bot-name", "   "])).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::EmptyBotName)));
    }

    #[test]
    fn test_frontend_url_must_be_http() {
        let err = Settings::from_args(args(&["--frontend-url", "ftp://x"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidFrontendUrl { .. })
        ));
        let err = Settings::from_args(args(&["--frontend-url", "not a url"])).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidFrontendUrl { .. })
        ));
    }

    #[test]
    fn test_bad_session_id_rejected() {
        let err = Settings::from_args(args(&["--session-id", "../x"])).unwrap_err();
        assert!(matches!(err, Error::Session(_)));
    }
}
