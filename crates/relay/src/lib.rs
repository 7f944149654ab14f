//! Relay core for the IRC ⇄ Discord bridge.
//!
//! Network clients feed normalized [`RelayEvent`]s into a [`Bridge`], which
//! applies echo suppression, resolves destinations through the channel map,
//! renders destination-side text, and fans the result out best-effort. The
//! replace sequencer handles the delete-and-reinsert protocol on the Discord
//! side.

pub mod bridge;
pub mod dispatch;
pub mod echo;
pub mod error;
pub mod event;
pub mod format;
pub mod map;
pub mod replace;

pub use {
    bridge::Bridge,
    dispatch::{Dispatcher, Outbound, ReplaceTarget},
    echo::EchoGuard,
    error::{Error, Result},
    event::{DestinationClass, RelayEvent},
    format::{Formatter, Style},
    map::{ChannelMap, ChannelMapBuilder},
    replace::{PendingReplace, ReplaceSequencer, REINSERT_DELAY},
};
