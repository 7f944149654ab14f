//! Bijective channel bindings between the two networks.
//!
//! Two plain maps kept in lockstep behind one interface; the bijection
//! invariant holds on every mutation. Built once during startup discovery,
//! then published read-only for the life of the process.

use std::{collections::HashMap, sync::Arc};

use crate::error::{Error, Result};

/// Write side of the channel map, used only during startup discovery.
#[derive(Debug, Default)]
pub struct ChannelMapBuilder {
    by_irc: HashMap<String, String>,
    by_discord: HashMap<String, String>,
}

impl ChannelMapBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an IRC channel name to a Discord channel id.
    ///
    /// Fails with [`Error::DuplicateBinding`] when either side is already
    /// bound; the builder is unchanged on failure.
    pub fn bind(
        &mut self,
        irc_name: impl Into<String>,
        discord_id: impl Into<String>,
    ) -> Result<()> {
        let irc_name = irc_name.into();
        let discord_id = discord_id.into();

        if self.by_irc.contains_key(&irc_name) {
            return Err(Error::duplicate_binding(&irc_name));
        }
        if self.by_discord.contains_key(&discord_id) {
            return Err(Error::duplicate_binding(&discord_id));
        }

        self.by_discord.insert(discord_id.clone(), irc_name.clone());
        self.by_irc.insert(irc_name, discord_id);
        Ok(())
    }

    /// Finish building. The returned map is immutable; moving it into an
    /// `Arc` publishes it safely to concurrent readers.
    #[must_use]
    pub fn build(self) -> Arc<ChannelMap> {
        Arc::new(ChannelMap {
            by_irc: self.by_irc,
            by_discord: self.by_discord,
        })
    }
}

/// Read-only bijection between IRC channel names and Discord channel ids.
///
/// Lookups work in both directions in O(1). There is no unbind: bindings
/// live as long as the process.
#[derive(Debug)]
pub struct ChannelMap {
    by_irc: HashMap<String, String>,
    by_discord: HashMap<String, String>,
}

impl ChannelMap {
    /// Discord channel id bound to an IRC channel name, if any.
    #[must_use]
    pub fn discord_for(&self, irc_name: &str) -> Option<&str> {
        self.by_irc.get(irc_name).map(String::as_str)
    }

    /// IRC channel name bound to a Discord channel id, if any.
    #[must_use]
    pub fn irc_for(&self, discord_id: &str) -> Option<&str> {
        self.by_discord.get(discord_id).map(String::as_str)
    }

    /// Every mapped Discord channel id (the broadcast destination set).
    pub fn discord_ids(&self) -> impl Iterator<Item = &str> {
        self.by_irc.values().map(String::as_str)
    }

    /// All bindings as `(irc_name, discord_id)` pairs.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_irc.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_irc.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_irc.is_empty()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_and_lookup_both_directions() {
        let mut builder = ChannelMapBuilder::new();
        builder.bind("#general", "123").unwrap();
        builder.bind("#dev", "456").unwrap();
        let map = builder.build();

        assert_eq!(map.discord_for("#general"), Some("123"));
        assert_eq!(map.discord_for("#dev"), Some("456"));
        assert_eq!(map.irc_for("123"), Some("#general"));
        assert_eq!(map.irc_for("456"), Some("#dev"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn absent_lookups_return_none() {
        let map = ChannelMapBuilder::new().build();
        assert!(map.is_empty());
        assert_eq!(map.discord_for("#general"), None);
        assert_eq!(map.irc_for("123"), None);
    }

    #[test]
    fn duplicate_irc_name_rejected_and_map_unchanged() {
        let mut builder = ChannelMapBuilder::new();
        builder.bind("#general", "123").unwrap();

        let err = builder.bind("#general", "999").unwrap_err();
        assert!(matches!(err, Error::DuplicateBinding { .. }));

        let map = builder.build();
        assert_eq!(map.len(), 1);
        assert_eq!(map.discord_for("#general"), Some("123"));
        assert_eq!(map.irc_for("999"), None);
    }

    #[test]
    fn duplicate_discord_id_rejected_and_map_unchanged() {
        let mut builder = ChannelMapBuilder::new();
        builder.bind("#general", "123").unwrap();

        let err = builder.bind("#other", "123").unwrap_err();
        assert!(matches!(err, Error::DuplicateBinding { .. }));

        let map = builder.build();
        assert_eq!(map.len(), 1);
        assert_eq!(map.discord_for("#other"), None);
    }

    #[test]
    fn broadcast_set_covers_all_bindings() {
        let mut builder = ChannelMapBuilder::new();
        builder.bind("#a", "1").unwrap();
        builder.bind("#b", "2").unwrap();
        let map = builder.build();

        let mut ids: Vec<&str> = map.discord_ids().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
