//! IRC side of the relay.
//!
//! Connects with the `irc` crate, normalizes server messages into
//! [`strait_relay::RelayEvent`]s, and exposes an outbound sender for
//! traffic coming from Discord.

pub mod client;
pub mod normalize;
pub mod outbound;

pub use {
    client::{connect, run},
    normalize::normalize,
    outbound::IrcOutbound,
};
