//! Outbound delivery of IRC traffic onto Discord.

use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::{
        all::{ChannelId, MessageId},
        http::Http,
    },
    strait_relay::{Outbound, ReplaceTarget},
};

/// Sends relayed text to Discord channels over the REST API.
///
/// Holds its own `Http` handle so sends work before the gateway client
/// is running, and also serves as the delete-and-resend half of the
/// replace protocol.
pub struct DiscordOutbound {
    http: Arc<Http>,
}

impl DiscordOutbound {
    #[must_use]
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn channel(id_text: &str) -> anyhow::Result<ChannelId> {
        // ChannelId::new panics on 0, so parse failures and 0 both
        // surface as errors here instead.
        match id_text.parse::<u64>() {
            Ok(id) if id != 0 => Ok(ChannelId::new(id)),
            _ => Err(anyhow::anyhow!("invalid discord channel id: {id_text}")),
        }
    }

    fn message(id_text: &str) -> anyhow::Result<MessageId> {
        // MessageId::new has the same zero panic as ChannelId::new.
        match id_text.parse::<u64>() {
            Ok(id) if id != 0 => Ok(MessageId::new(id)),
            _ => Err(anyhow::anyhow!("invalid discord message id: {id_text}")),
        }
    }
}

#[async_trait]
impl Outbound for DiscordOutbound {
    fn network(&self) -> &'static str {
        "discord"
    }

    async fn send_text(&self, to: &str, text: &str) -> anyhow::Result<()> {
        Self::channel(to)?.say(&self.http, text).await?;
        Ok(())
    }
}

#[async_trait]
impl ReplaceTarget for DiscordOutbound {
    async fn delete_message(&self, channel: &str, message_id: &str) -> anyhow::Result<()> {
        Self::channel(channel)?
            .delete_message(&self.http, Self::message(message_id)?)
            .await?;
        Ok(())
    }

    async fn send_text(&self, channel: &str, text: &str) -> anyhow::Result<()> {
        Self::channel(channel)?.say(&self.http, text).await?;
        Ok(())
    }
}
