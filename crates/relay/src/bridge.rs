//! Composition root for the relay path.
//!
//! Both network collaborators hold an `Arc<Bridge>`: the IRC loop feeds
//! normalized events into [`Bridge::relay_from_irc`], the Discord handler
//! calls [`Bridge::relay_discord_message`] and, on success, chains the
//! replace protocol through [`Bridge::schedule_replace`].

use std::sync::{Arc, OnceLock};

use {tokio_util::sync::CancellationToken, tracing::{debug, warn}};

use crate::{
    dispatch::{Dispatcher, Outbound, ReplaceTarget},
    echo::EchoGuard,
    event::{DestinationClass, RelayEvent},
    format::{Formatter, Style},
    map::ChannelMap,
    replace::{PendingReplace, ReplaceSequencer},
};

pub struct Bridge {
    /// Channel bindings, installed once after startup discovery. The
    /// `OnceLock` is the publication barrier: handlers that run before
    /// installation see `None` and drop their events.
    bindings: OnceLock<Arc<ChannelMap>>,
    to_discord: Dispatcher,
    to_irc: Dispatcher,
    irc_guard: EchoGuard,
    /// Renders events headed to Discord.
    fmt_discord: Formatter,
    /// Renders events headed to IRC.
    fmt_irc: Formatter,
    notice_channel: Option<String>,
    replace: Option<ReplaceSequencer>,
    irc_nick: String,
}

impl Bridge {
    #[must_use]
    pub fn new(
        to_discord: Arc<dyn Outbound>,
        to_irc: Arc<dyn Outbound>,
        irc_nick: impl Into<String>,
    ) -> Self {
        let irc_nick = irc_nick.into();
        Self {
            bindings: OnceLock::new(),
            to_discord: Dispatcher::new(to_discord),
            to_irc: Dispatcher::new(to_irc),
            irc_guard: EchoGuard::new(&irc_nick),
            fmt_discord: Formatter::new(Style::Markdown, &irc_nick),
            fmt_irc: Formatter::new(Style::Plain, &irc_nick),
            notice_channel: None,
            replace: None,
            irc_nick,
        }
    }

    /// Ping the owner when the bridge nick is mentioned in relayed text.
    #[must_use]
    pub fn with_owner_mention(mut self, mention: impl Into<String>) -> Self {
        self.fmt_discord = self.fmt_discord.with_owner_mention(mention);
        self
    }

    /// Discord channel receiving Notice/Wallops renderings.
    #[must_use]
    pub fn with_notice_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.notice_channel = Some(channel_id.into());
        self
    }

    /// Enable the replace protocol against the Discord side.
    #[must_use]
    pub fn with_replace(
        mut self,
        target: Arc<dyn ReplaceTarget>,
        shutdown: CancellationToken,
    ) -> Self {
        self.replace = Some(ReplaceSequencer::new(target, shutdown));
        self
    }

    /// Install the channel bindings produced by startup discovery.
    ///
    /// The map is immutable afterwards. A second install (e.g. a gateway
    /// reconnect re-firing the ready event) is ignored.
    pub fn install_bindings(&self, map: Arc<ChannelMap>) {
        if self.bindings.set(map).is_err() {
            debug!("channel bindings already installed, ignoring");
        }
    }

    /// The installed channel map, if discovery has completed.
    #[must_use]
    pub fn bindings(&self) -> Option<&ChannelMap> {
        self.bindings.get().map(Arc::as_ref)
    }

    /// Relay a normalized IRC event to its Discord destination(s).
    ///
    /// Delivery is queued in the background; the caller's event loop
    /// never blocks on destination sends, and messages to one channel
    /// arrive in the order they were relayed.
    pub fn relay_from_irc(&self, event: RelayEvent) {
        let Some(map) = self.bindings.get() else {
            debug!("channel bindings not installed yet, dropping event");
            return;
        };

        if self.irc_guard.suppress(event.author()) {
            return;
        }

        let destinations: Vec<String> = match event.destination_class() {
            DestinationClass::Channel(channel) => match map.discord_for(channel) {
                Some(id) => vec![id.to_string()],
                None => {
                    debug!(channel = %channel, "no binding for channel, dropping event");
                    return;
                },
            },
            DestinationClass::Broadcast => map.discord_ids().map(str::to_string).collect(),
            DestinationClass::Notices => match &self.notice_channel {
                Some(id) => vec![id.clone()],
                None => {
                    debug!("no notice channel configured, dropping event");
                    return;
                },
            },
        };
        if destinations.is_empty() {
            return;
        }

        let text = self.fmt_discord.render(&event);
        self.to_discord.dispatch(&text, &destinations);
    }

    /// Relay a Discord-origin message to its bound IRC channel.
    ///
    /// Returns the IRC channel name when the send was accepted, so the
    /// caller can chain the replace protocol; `None` means the message
    /// was dropped (unmapped channel, bindings not ready, or send
    /// failure).
    pub async fn relay_discord_message(
        &self,
        nick: &str,
        discord_channel: &str,
        text: &str,
    ) -> Option<String> {
        let Some(map) = self.bindings.get() else {
            debug!("channel bindings not installed yet, dropping message");
            return None;
        };
        let Some(irc_channel) = map.irc_for(discord_channel) else {
            debug!(channel = %discord_channel, "no binding for channel, dropping message");
            return None;
        };

        let event = RelayEvent::Message {
            nick: nick.to_string(),
            channel: discord_channel.to_string(),
            text: text.to_string(),
        };
        let rendered = self.fmt_irc.render(&event);

        match self.to_irc.send(&rendered, irc_channel).await {
            Ok(()) => Some(irc_channel.to_string()),
            Err(e) => {
                warn!(channel = %irc_channel, error = %e, "relay to irc failed");
                None
            },
        }
    }

    /// Schedule the delete-and-reinsert cycle for a relayed Discord
    /// message. No-op unless the replace protocol is enabled.
    ///
    /// The canonical copy is the original text formatted as a message
    /// from the bridge's IRC nick, so it matches what an IRC-origin
    /// message would look like in that channel.
    pub fn schedule_replace(&self, discord_channel: &str, message_id: &str, original_text: &str) {
        let Some(sequencer) = &self.replace else {
            return;
        };

        let event = RelayEvent::Message {
            nick: self.irc_nick.clone(),
            channel: discord_channel.to_string(),
            text: original_text.to_string(),
        };
        sequencer.schedule(PendingReplace {
            channel: discord_channel.to_string(),
            message_id: message_id.to_string(),
            replacement: self.fmt_discord.render(&event),
        });
    }
}
