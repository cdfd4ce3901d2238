use std::fmt;
use std::str::FromStr;

/// Known JID servers.
pub const DEFAULT_USER_SERVER: &str = "s.whatsapp.net";
pub const GROUP_SERVER: &str = "g.us";
pub const LEGACY_USER_SERVER: &str = "c.us";
pub const BROADCAST_SERVER: &str = "broadcast";
/// Privacy-preserving linked identities.
pub const HIDDEN_USER_SERVER: &str = "lid";
pub const NEWSLETTER_SERVER: &str = "newsletter";

/// Address of a user, group or broadcast list (`user[.agent][:device]@server`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Jid {
    pub user: String,
    pub raw_agent: u8,
    pub device: u16,
    pub server: String,
}

impl Jid {
    /// Regular JID (user@server).
    pub fn new(user: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            raw_agent: 0,
            device: 0,
            server: server.into(),
        }
    }

    /// Personal chat JID for a phone number.
    pub fn user(number: impl Into<String>) -> Self {
        Self::new(number, DEFAULT_USER_SERVER)
    }

    /// Group chat JID.
    pub fn group(id: impl Into<String>) -> Self {
        Self::new(id, GROUP_SERVER)
    }

    pub fn status_broadcast() -> Self {
        Self::new("status", BROADCAST_SERVER)
    }

    /// Accepts either a full JID or a bare phone number typed by a person.
    ///
    /// Anything containing `@` is parsed as a JID (legacy `c.us` becomes
    /// `s.whatsapp.net`); everything else becomes `<input>@s.whatsapp.net`.
    pub fn user_or_jid(input: &str) -> std::result::Result<Self, JidParseError> {
        let input = input.trim();
        if input.contains('@') {
            let mut jid: Self = input.parse()?;
            if jid.server == LEGACY_USER_SERVER {
                jid.server = DEFAULT_USER_SERVER.to_string();
            }
            Ok(jid)
        } else if input.is_empty() {
            Err(JidParseError)
        } else {
            Ok(Self::user(input))
        }
    }

    /// JID without agent/device (regular user@server).
    pub fn to_non_ad(&self) -> Self {
        Self::new(self.user.clone(), self.server.clone())
    }

    /// Person (phone number or hidden identity) rather than a group or list.
    pub fn is_user(&self) -> bool {
        matches!(
            self.server.as_str(),
            DEFAULT_USER_SERVER | LEGACY_USER_SERVER | HIDDEN_USER_SERVER
        )
    }

    pub fn is_newsletter(&self) -> bool {
        self.server == NEWSLETTER_SERVER
    }

    pub fn is_group(&self) -> bool {
        self.server == GROUP_SERVER
    }

    pub fn is_status_broadcast(&self) -> bool {
        self.server == BROADCAST_SERVER && self.user == "status"
    }

    pub fn is_empty(&self) -> bool {
        self.server.is_empty()
    }
}

impl FromStr for Jid {
    type Err = JidParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('@').collect();
        if parts.len() == 1 {
            return Ok(Self::new("", parts[0]));
        }
        if parts.len() != 2 || parts[1].is_empty() {
            return Err(JidParseError);
        }
        let mut jid = Self::new(parts[0], parts[1]);
        if let Some((user, rest)) = parts[0].split_once('.') {
            jid.user = user.to_string();
            let (agent, device) = match rest.split_once(':') {
                Some((agent, device)) => (agent, Some(device)),
                None => (rest, None),
            };
            jid.raw_agent = agent.parse().map_err(|_| JidParseError)?;
            if let Some(device) = device {
                jid.device = device.parse().map_err(|_| JidParseError)?;
            }
        } else if let Some((user, device)) = parts[0].split_once(':') {
            jid.user = user.to_string();
            jid.device = device.parse().map_err(|_| JidParseError)?;
        }
        Ok(jid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JidParseError;

impl fmt::Display for JidParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid JID format")
    }
}

impl std::error::Error for JidParseError {}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw_agent > 0 {
            write!(
                f,
                "{}.{}:{}@{}",
                self.user, self.raw_agent, self.device, self.server
            )
        } else if self.device > 0 {
            write!(f, "{}:{}@{}", self.user, self.device, self.server)
        } else if !self.user.is_empty() {
            write!(f, "{}@{}", self.user, self.server)
        } else {
            write!(f, "{}", self.server)
        }
    }
}

impl serde::Serialize for Jid {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Jid {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Jid::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_jid_parses() {
        let j: Jid = "120363021234567890@g.us".parse().unwrap();
        assert_eq!(j.user, "120363021234567890");
        assert!(j.is_group());
        assert_eq!(j.to_string(), "120363021234567890@g.us");
    }

    #[test]
    fn device_suffix_is_dropped_by_to_non_ad() {
        let j: Jid = "94771234567:12@s.whatsapp.net".parse().unwrap();
        assert_eq!(j.device, 12);
        assert_eq!(j.to_non_ad().to_string(), "94771234567@s.whatsapp.net");

        let ad: Jid = "94771234567.1:3@s.whatsapp.net".parse().unwrap();
        assert_eq!(ad.raw_agent, 1);
        assert_eq!(ad.device, 3);
        assert_eq!(ad.to_string(), "94771234567.1:3@s.whatsapp.net");
    }

    #[test]
    fn bare_number_becomes_user_jid() {
        let j = Jid::user_or_jid("94771234567").unwrap();
        assert_eq!(j.to_string(), "94771234567@s.whatsapp.net");
        assert!(!j.is_group());

        let g = Jid::user_or_jid("123@g.us").unwrap();
        assert!(g.is_group());

        assert!(Jid::user_or_jid("  ").is_err());
        assert!(Jid::user_or_jid("a@b@c").is_err());
    }

    #[test]
    fn server_kinds() {
        let lid: Jid = "1234567890:2@lid".parse().unwrap();
        assert!(lid.is_user());
        assert_eq!(lid.to_non_ad().to_string(), "1234567890@lid");
        assert!(Jid::user("1").is_user());
        assert!(!Jid::group("1").is_user());

        let channel: Jid = "120363000000000000@newsletter".parse().unwrap();
        assert!(channel.is_newsletter());
        assert!(!channel.is_user() && !channel.is_group());
    }

    #[test]
    fn legacy_c_us_targets_are_normalised() {
        let j = Jid::user_or_jid("94771234567@c.us").unwrap();
        assert_eq!(j, Jid::user("94771234567"));
        let kept: Jid = "94771234567@c.us".parse().unwrap();
        assert_eq!(kept.server, LEGACY_USER_SERVER);
    }

    #[test]
    fn status_broadcast_detection() {
        let j: Jid = "status@broadcast".parse().unwrap();
        assert!(j.is_status_broadcast());
        assert!(!Jid::new("list", BROADCAST_SERVER).is_status_broadcast());
        assert_eq!(Jid::status_broadcast(), j);
    }

    #[test]
    fn serde_uses_string_form() {
        let j = Jid::user("1");
        assert_eq!(serde_json::to_string(&j).unwrap(), "\"1@s.whatsapp.net\"");
        let back: Jid = serde_json::from_str("\"5@g.us\"").unwrap();
        assert_eq!(back, Jid::group("5"));
    }
}
