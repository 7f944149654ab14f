//! The normalized event model shared by both network sides.

/// A chat or presence event normalized for relay.
///
/// Each variant carries only what the formatter needs. Events are
/// immutable and have no identity beyond their occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Message {
        nick: String,
        channel: String,
        text: String,
    },
    Action {
        nick: String,
        channel: String,
        text: String,
    },
    Notice {
        from_server: bool,
        nick: Option<String>,
        text: String,
    },
    Wallops {
        from_server: bool,
        nick: Option<String>,
        text: String,
    },
    NickChange {
        old_nick: String,
        new_nick: String,
    },
    Join {
        nick: String,
        channel: String,
    },
    Part {
        nick: String,
        channel: String,
        reason: Option<String>,
    },
    Quit {
        nick: String,
        reason: Option<String>,
    },
    Kick {
        kicked: String,
        by: String,
        channel: String,
        reason: Option<String>,
    },
    Away {
        nick: String,
        reason: Option<String>,
    },
    Back {
        nick: String,
    },
}

/// Where an event is delivered on the destination network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationClass<'a> {
    /// The single channel bound to the origin channel.
    Channel(&'a str),
    /// Every mapped destination channel. Used for events the origin
    /// network reports without channel scope; the bridge does not track
    /// per-user membership.
    Broadcast,
    /// The fixed system-notices destination.
    Notices,
}

impl RelayEvent {
    /// The identity that produced this event, for echo suppression.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        match self {
            Self::Message { nick, .. }
            | Self::Action { nick, .. }
            | Self::Join { nick, .. }
            | Self::Part { nick, .. }
            | Self::Quit { nick, .. }
            | Self::Away { nick, .. }
            | Self::Back { nick } => Some(nick),
            Self::NickChange { old_nick, .. } => Some(old_nick),
            Self::Kick { by, .. } => Some(by),
            Self::Notice { nick, .. } | Self::Wallops { nick, .. } => nick.as_deref(),
        }
    }

    /// The raw origin text, before any markup stripping. The mention
    /// check runs against this so embedded style codes cannot hide a
    /// nickname.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Message { text, .. } | Self::Action { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Whether this is conversational text (Message or Action), the only
    /// kinds that carry a mention marker.
    #[must_use]
    pub fn is_chatter(&self) -> bool {
        matches!(self, Self::Message { .. } | Self::Action { .. })
    }

    /// Destination classification for this event kind.
    #[must_use]
    pub fn destination_class(&self) -> DestinationClass<'_> {
        match self {
            Self::Message { channel, .. }
            | Self::Action { channel, .. }
            | Self::Join { channel, .. }
            | Self::Part { channel, .. }
            | Self::Kick { channel, .. } => DestinationClass::Channel(channel),
            Self::NickChange { .. }
            | Self::Quit { .. }
            | Self::Away { .. }
            | Self::Back { .. } => DestinationClass::Broadcast,
            Self::Notice { .. } | Self::Wallops { .. } => DestinationClass::Notices,
        }
    }
}
