//! Discord event handler for serenity.

use std::sync::{Arc, OnceLock};

use {
    serenity::{
        all::{ChannelType, Context, EventHandler, GatewayIntents, GuildId, Message, Ready},
        async_trait,
    },
    strait_config::{ChannelSpec, DiscordConfig},
    strait_relay::Bridge,
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info},
};

use crate::{admin, discovery::build_bindings, mentions::expand_mentions};

/// Handler for Discord gateway events.
pub struct DiscordHandler {
    config: DiscordConfig,
    channels: Vec<ChannelSpec>,
    bridge: Arc<Bridge>,
    bot_user_id: OnceLock<u64>,
    shutdown: CancellationToken,
}

impl DiscordHandler {
    #[must_use]
    pub fn new(
        config: DiscordConfig,
        channels: Vec<ChannelSpec>,
        bridge: Arc<Bridge>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            channels,
            bridge,
            bot_user_id: OnceLock::new(),
            shutdown,
        }
    }

    /// Required gateway intents for the bot.
    #[must_use]
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// `<#id>` expansion table: every bound channel under its IRC name
    /// without the leading '#'.
    fn channel_names(&self) -> Vec<(u64, String)> {
        let Some(map) = self.bridge.bindings() else {
            return Vec::new();
        };
        map.bindings()
            .filter_map(|(irc, discord)| {
                let id: u64 = discord.parse().ok()?;
                Some((id, irc.trim_start_matches('#').to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );
        let _ = self.bot_user_id.set(ready.user.id.get());

        let guild = GuildId::new(self.config.guild_id);
        let guild_channels = match ctx.http.get_channels(guild).await {
            Ok(channels) => channels,
            Err(e) => {
                error!(guild = self.config.guild_id, error = %e, "failed to list guild channels");
                self.shutdown.cancel();
                return;
            },
        };
        let text_channels: Vec<(u64, String)> = guild_channels
            .into_iter()
            .filter(|c| c.kind == ChannelType::Text)
            .map(|c| (c.id.get(), c.name))
            .collect();

        match build_bindings(&self.channels, &text_channels) {
            Ok(map) => {
                info!(bound = map.len(), "channel discovery complete");
                self.bridge.install_bindings(map);
            },
            Err(e) => {
                error!(error = %e, "channel discovery failed");
                self.shutdown.cancel();
            },
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Only our own echoes are suppressed; other bots relay like users.
        if self.bot_user_id.get().copied() == Some(msg.author.id.get()) {
            return;
        }

        if msg.guild_id.is_none() {
            admin::handle_dm(&ctx, &msg, self.config.owner_id, &self.bridge).await;
            return;
        }

        let users: Vec<(u64, String)> = msg
            .mentions
            .iter()
            .map(|u| (u.id.get(), u.name.clone()))
            .collect();
        let text = expand_mentions(&msg.content, &users, &self.channel_names());

        let nick = msg
            .author
            .global_name
            .clone()
            .unwrap_or_else(|| msg.author.name.clone());
        let channel = msg.channel_id.get().to_string();

        let Some(irc_channel) = self.bridge.relay_discord_message(&nick, &channel, &text).await
        else {
            return;
        };
        debug!(from = %channel, to = %irc_channel, "relayed discord message");

        if self.config.replace_messages {
            self.bridge
                .schedule_replace(&channel, &msg.id.get().to_string(), &text);
        }
    }
}
