//! Discord side of the relay.
//!
//! Runs a serenity gateway client. On ready it discovers the guild's text
//! channels, derives the channel bindings, and installs them on the
//! bridge. Guild messages flow to IRC; owner DMs are admin commands.

pub mod admin;
pub mod client;
pub mod discovery;
pub mod handler;
pub mod mentions;
pub mod outbound;

pub use {
    client::{build_client, http},
    discovery::{build_bindings, discord_name_for},
    handler::DiscordHandler,
    mentions::expand_mentions,
    outbound::DiscordOutbound,
};
