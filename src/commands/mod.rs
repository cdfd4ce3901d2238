//! Command parsing.

mod menu;

pub use menu::{menu_message, MENU_TEXT};

use crate::types::IncomingMessage;

/// Leading character that marks a chat message as a bot command.
pub const PREFIX: char = '.';

/// Bot commands. Missing arguments stay `None` so handlers can answer with usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Menu,
    Whoami,
    Sticker,
    Download(Option<String>),
    SendImage(Option<String>),
    SendVideo(Option<String>),
    Youtube(Option<String>),
    Kick,
    Add(Option<String>),
    Promote,
    Demote,
    GroupInfo,
    Unknown(String),
}

impl Command {
    /// Parse a message body. Returns `None` when the body is not a command.
    ///
    /// Tokens are split on single spaces with empty ones dropped, so
    /// `.download   <url>` still finds its argument.
    pub fn parse(body: &str) -> Option<Self> {
        let body = body.trim();
        if !body.starts_with(PREFIX) {
            return None;
        }
        let mut args = body.split(' ').filter(|s| !s.is_empty());
        let name = args.next()?[PREFIX.len_utf8()..].to_lowercase();
        let arg = args.next().map(str::to_string);

        Some(match name.as_str() {
            "menu" | "help" => Self::Menu,
            "whoami" => Self::Whoami,
            "sticker" => Self::Sticker,
            "download" => Self::Download(arg),
            "sendimg" => Self::SendImage(arg),
            "sendvid" => Self::SendVideo(arg),
            "yt" => Self::Youtube(arg),
            "kick" => Self::Kick,
            "add" => Self::Add(arg),
            "promote" => Self::Promote,
            "demote" => Self::Demote,
            "ginfo" => Self::GroupInfo,
            _ => Self::Unknown(name),
        })
    }

    /// Command name as typed (without prefix), for logs.
    pub fn name(&self) -> &str {
        match self {
            Self::Menu => "menu",
            Self::Whoami => "whoami",
            Self::Sticker => "sticker",
            Self::Download(_) => "download",
            Self::SendImage(_) => "sendimg",
            Self::SendVideo(_) => "sendvid",
            Self::Youtube(_) => "yt",
            Self::Kick => "kick",
            Self::Add(_) => "add",
            Self::Promote => "promote",
            Self::Demote => "demote",
            Self::GroupInfo => "ginfo",
            Self::Unknown(name) => name,
        }
    }
}

/// Decide whether an incoming message should reach the router.
///
/// Skips empty payloads, status broadcasts, our own messages and anything
/// that is not prefixed.
pub fn command_for(msg: &IncomingMessage) -> Option<Command> {
    msg.content.as_ref()?;
    if msg.chat().is_status_broadcast() || msg.key.from_me {
        return None;
    }
    let body = msg.body();
    if body.is_empty() {
        return None;
    }
    Command::parse(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Jid, MessageContent, MessageKey};

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(Command::parse(".MENU"), Some(Command::Menu));
        assert_eq!(Command::parse(".help"), Some(Command::Menu));
        assert_eq!(Command::parse("  .Ginfo  "), Some(Command::GroupInfo));
        assert_eq!(Command::parse(".sendimg"), Some(Command::SendImage(None)));
    }

    #[test]
    fn first_argument_survives_repeated_spaces() {
        assert_eq!(
            Command::parse(".download    https://example.com/a.png extra"),
            Some(Command::Download(Some("https://example.com/a.png".into())))
        );
        assert_eq!(
            Command::parse(".add 94771234567"),
            Some(Command::Add(Some("94771234567".into())))
        );
    }

    #[test]
    fn non_commands_are_ignored() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("menu."), None);
    }

    #[test]
    fn unknown_keeps_lowercased_name() {
        assert_eq!(
            Command::parse(".Foo bar"),
            Some(Command::Unknown("foo".into()))
        );
        assert_eq!(Command::parse("."), Some(Command::Unknown(String::new())));
    }

    fn incoming(chat: Jid, from_me: bool, content: Option<MessageContent>) -> IncomingMessage {
        IncomingMessage {
            key: MessageKey {
                remote_jid: chat,
                from_me,
                participant: None,
                id: "1".into(),
            },
            content,
        }
    }

    #[test]
    fn filter_drops_status_own_and_empty() {
        let text = Some(MessageContent::text(".menu"));
        assert_eq!(
            command_for(&incoming(Jid::user("1"), false, text.clone())),
            Some(Command::Menu)
        );
        assert_eq!(
            command_for(&incoming(Jid::status_broadcast(), false, text.clone())),
            None
        );
        assert_eq!(command_for(&incoming(Jid::user("1"), true, text)), None);
        assert_eq!(command_for(&incoming(Jid::user("1"), false, None)), None);
        assert_eq!(
            command_for(&incoming(
                Jid::user("1"),
                false,
                Some(MessageContent::text("   "))
            )),
            None
        );
    }
}
