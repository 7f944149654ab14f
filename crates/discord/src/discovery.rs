//! Channel discovery: derive Discord channel names from IRC channel names
//! and bind the two sides into a channel map.

use std::sync::Arc;

use {
    strait_config::ChannelSpec,
    strait_relay::{ChannelMap, ChannelMapBuilder},
    tracing::warn,
};

/// Derive the Discord channel name expected for an IRC channel.
///
/// Strips the leading `#`, lowercases, replaces anything outside
/// `[a-z0-9-_]` with `-`, then drops a single leading `-` or `_` so the
/// result is a valid Discord channel name.
#[must_use]
pub fn discord_name_for(irc_name: &str) -> String {
    let bare = irc_name.strip_prefix('#').unwrap_or(irc_name);
    let mapped: String = bare
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    mapped
        .strip_prefix(['-', '_'])
        .map_or(mapped.clone(), str::to_owned)
}

/// Match configured IRC channels against the guild's text channels.
///
/// Channels without a leading `#` and channels with no same-named guild
/// channel are skipped with a warning; a name claimed twice on either
/// side is an error.
pub fn build_bindings(
    specs: &[ChannelSpec],
    guild_channels: &[(u64, String)],
) -> strait_relay::Result<Arc<ChannelMap>> {
    let mut builder = ChannelMapBuilder::new();

    for spec in specs {
        if !spec.name.starts_with('#') {
            warn!(channel = %spec.name, "skipping channel without leading '#'");
            continue;
        }
        let wanted = discord_name_for(&spec.name);
        match guild_channels.iter().find(|(_, name)| *name == wanted) {
            Some((id, _)) => builder.bind(spec.name.clone(), id.to_string())?,
            None => {
                warn!(
                    channel = %spec.name,
                    expected = %wanted,
                    "no matching discord channel in guild"
                );
            },
        }
    }

    Ok(builder.build())
}
