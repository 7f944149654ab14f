//! Destination-side text rendering.
//!
//! Pure and deterministic: the same event always renders to the same
//! display text. Origin-network style codes are stripped so they never
//! leak into the destination format.

use crate::event::RelayEvent;

/// Rendering style of the destination network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Discord markdown: nicks in bold monospace.
    Markdown,
    /// Plain text for IRC.
    Plain,
}

/// Renders relay events as destination-side display text.
#[derive(Debug, Clone)]
pub struct Formatter {
    style: Style,
    /// The bridge's own nick on the origin network, for mention detection.
    bridge_nick: String,
    /// Destination-side mention string for the configured owner. When set,
    /// Message/Action text containing the bridge nick gets a ping marker.
    owner_mention: Option<String>,
}

impl Formatter {
    #[must_use]
    pub fn new(style: Style, bridge_nick: impl Into<String>) -> Self {
        Self {
            style,
            bridge_nick: bridge_nick.into(),
            owner_mention: None,
        }
    }

    #[must_use]
    pub fn with_owner_mention(mut self, mention: impl Into<String>) -> Self {
        self.owner_mention = Some(mention.into());
        self
    }

    /// Render an event for the destination network.
    ///
    /// The mention check runs against the raw origin text, before control
    /// codes are stripped, so a style code inside the nickname cannot
    /// produce a false negative.
    #[must_use]
    pub fn render(&self, event: &RelayEvent) -> String {
        let mut out = strip_control_codes(&self.body(event));

        if event.is_chatter()
            && let Some(owner) = &self.owner_mention
            && let Some(raw) = event.raw_text()
            && contains_ci(raw, &self.bridge_nick)
        {
            out.push_str(" (");
            out.push_str(owner);
            out.push(')');
        }

        out
    }

    fn body(&self, event: &RelayEvent) -> String {
        match event {
            RelayEvent::Message { nick, text, .. } => {
                format!("{}: {text}", self.nick(nick))
            },
            RelayEvent::Action { nick, text, .. } => match self.style {
                Style::Markdown => format!("``* {nick}`` {text}"),
                Style::Plain => format!("* {nick} {text}"),
            },
            RelayEvent::Notice {
                from_server,
                nick,
                text,
            } => format!("[notice]{} {text}", self.origin_tag(*from_server, nick.as_deref())),
            RelayEvent::Wallops {
                from_server,
                nick,
                text,
            } => format!("[wallops]{} {text}", self.origin_tag(*from_server, nick.as_deref())),
            RelayEvent::NickChange { old_nick, new_nick } => {
                format!("{} is now {}", self.nick(old_nick), self.nick(new_nick))
            },
            RelayEvent::Join { nick, .. } => format!("{} has joined", self.nick(nick)),
            RelayEvent::Part { nick, reason, .. } => format!(
                "{} has left (Part{})",
                self.quiet_nick(nick),
                reason_suffix(reason.as_deref())
            ),
            RelayEvent::Quit { nick, reason } => format!(
                "{} has left (Quit{})",
                self.quiet_nick(nick),
                reason_suffix(reason.as_deref())
            ),
            RelayEvent::Kick {
                kicked, by, reason, ..
            } => format!(
                "{} has left (Kicked by {}{})",
                self.quiet_nick(kicked),
                self.nick(by),
                reason_suffix(reason.as_deref())
            ),
            RelayEvent::Away { nick, reason } => {
                let suffix = match reason.as_deref() {
                    Some(r) if !r.is_empty() => format!(" ({r})"),
                    _ => String::new(),
                };
                format!("{} went away{suffix}", self.nick(nick))
            },
            RelayEvent::Back { nick } => format!("{} is back", self.nick(nick)),
        }
    }

    /// A nick, visually distinguished on the destination side.
    fn nick(&self, nick: &str) -> String {
        match self.style {
            Style::Markdown => format!("**``{nick}``**"),
            Style::Plain => nick.to_string(),
        }
    }

    /// Departure lines keep the nick in monospace only, not bold.
    fn quiet_nick(&self, nick: &str) -> String {
        match self.style {
            Style::Markdown => format!("``{nick}``"),
            Style::Plain => nick.to_string(),
        }
    }

    fn origin_tag(&self, from_server: bool, nick: Option<&str>) -> String {
        match nick {
            Some(nick) if !from_server => match self.style {
                Style::Markdown => format!(" **``{nick}``**"),
                Style::Plain => format!(" <{nick}>"),
            },
            _ => "[server]".to_string(),
        }
    }
}

fn reason_suffix(reason: Option<&str>) -> String {
    match reason {
        Some(r) if !r.is_empty() => format!(": {r}"),
        _ => String::new(),
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Strip mIRC color and style control codes.
///
/// Covers bold (0x02), monospace (0x11), reverse (0x16), italic (0x1d),
/// strikethrough (0x1e), underline (0x1f), reset (0x0f), numeric color
/// (0x03 with optional `fg[,bg]` digits) and hex color (0x04).
#[must_use]
pub fn strip_control_codes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x02' | '\x11' | '\x16' | '\x1d' | '\x1e' | '\x1f' | '\x0f' => {},
            '\x03' => {
                let fg = consume_digits(&mut chars, 2, char::is_ascii_digit);
                if fg > 0 {
                    consume_separated_bg(&mut chars, 2, char::is_ascii_digit);
                }
            },
            '\x04' => {
                let fg = consume_digits(&mut chars, 6, char::is_ascii_hexdigit);
                if fg > 0 {
                    consume_separated_bg(&mut chars, 6, char::is_ascii_hexdigit);
                }
            },
            _ => out.push(ch),
        }
    }

    out
}

fn consume_digits(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    max: usize,
    accept: impl Fn(&char) -> bool,
) -> usize {
    let mut taken = 0;
    while taken < max && chars.peek().is_some_and(&accept) {
        chars.next();
        taken += 1;
    }
    taken
}

/// Consume `,bg` after a color code, but only when a digit actually
/// follows the comma: a bare comma is message text.
fn consume_separated_bg(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    max: usize,
    accept: impl Fn(&char) -> bool,
) {
    if chars.peek() == Some(&',') {
        let mut lookahead = chars.clone();
        lookahead.next();
        if lookahead.peek().is_some_and(&accept) {
            chars.next();
            consume_digits(chars, max, accept);
        }
    }
}
