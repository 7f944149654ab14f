//! Config schema: the two network connections and the channel list.

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StraitConfig {
    pub irc: IrcConfig,
    pub discord: DiscordConfig,
    /// Channels to bridge. Each entry is an IRC channel name (`"#general"`)
    /// or a table with a join key (`{ name = "#private", key = "hunter2" }`).
    pub channels: Vec<ChannelEntry>,
}

impl StraitConfig {
    /// Channel entries normalized to `ChannelSpec`.
    #[must_use]
    pub fn channel_specs(&self) -> Vec<ChannelSpec> {
        self.channels.iter().map(ChannelEntry::to_spec).collect()
    }
}

/// IRC connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IrcConfig {
    pub host: String,
    /// Defaults to 6697 (TLS).
    pub port: u16,
    pub nick: String,
    pub use_tls: bool,
    /// When set, `identify <pass>` is sent to NickServ after registration.
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub nickserv_pass: Option<Secret<String>>,
}

impl Default for IrcConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 6697,
            nick: String::new(),
            use_tls: true,
            nickserv_pass: None,
        }
    }
}

/// Discord connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscordConfig {
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<Secret<String>>,
    /// Guild whose text channels are matched against the channel list.
    pub guild_id: u64,
    /// Owner identity: receives mention pings and may issue admin DMs.
    pub owner_id: Option<u64>,
    /// Delete relayed Discord messages and reinsert a canonical copy.
    pub replace_messages: bool,
    /// Channel receiving IRC notices and wallops. Unset drops them.
    pub notice_channel: Option<u64>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            guild_id: 0,
            owner_id: None,
            replace_messages: false,
            notice_channel: None,
        }
    }
}

/// A channel list entry: a bare name or a name with a join key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelEntry {
    Name(String),
    Keyed { name: String, key: String },
}

impl ChannelEntry {
    fn to_spec(&self) -> ChannelSpec {
        match self {
            Self::Name(name) => ChannelSpec {
                name: name.clone(),
                key: None,
            },
            Self::Keyed { name, key } => ChannelSpec {
                name: name.clone(),
                key: Some(key.clone()),
            },
        }
    }
}

/// A normalized channel to bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub name: String,
    pub key: Option<String>,
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
