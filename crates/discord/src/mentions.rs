//! Rewrite Discord mention markup into readable text before relay.

use std::sync::LazyLock;

use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
static USER_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?(\d+)>").expect("literal pattern"));
#[allow(clippy::expect_used)]
static CHANNEL_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<#(\d+)>").expect("literal pattern"));

/// Expand `<@id>` / `<@!id>` to `@name` and `<#id>` to `#name`.
///
/// Ids with no known name are left verbatim rather than guessed at.
#[must_use]
pub fn expand_mentions(
    text: &str,
    users: &[(u64, String)],
    channels: &[(u64, String)],
) -> String {
    let expanded = USER_MENTION.replace_all(text, |caps: &Captures<'_>| {
        resolve(&caps[1], users).map_or_else(|| caps[0].to_string(), |name| format!("@{name}"))
    });
    CHANNEL_MENTION
        .replace_all(&expanded, |caps: &Captures<'_>| {
            resolve(&caps[1], channels).map_or_else(|| caps[0].to_string(), |name| format!("#{name}"))
        })
        .into_owned()
}

fn resolve<'a>(id_text: &str, names: &'a [(u64, String)]) -> Option<&'a str> {
    let id: u64 = id_text.parse().ok()?;
    names
        .iter()
        .find(|(candidate, _)| *candidate == id)
        .map(|(_, name)| name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_user_mentions() {
        let users = vec![(42, "alice".to_string())];
        assert_eq!(
            expand_mentions("hi <@42> and <@!42>", &users, &[]),
            "hi @alice and @alice"
        );
    }

    #[test]
    fn expands_channel_mentions() {
        let channels = vec![(100, "general".to_string())];
        assert_eq!(
            expand_mentions("see <#100>", &[], &channels),
            "see #general"
        );
    }

    #[test]
    fn unknown_ids_left_verbatim() {
        assert_eq!(expand_mentions("hi <@99> in <#98>", &[], &[]), "hi <@99> in <#98>");
    }

    #[test]
    fn plain_text_untouched() {
        assert_eq!(expand_mentions("no markup here", &[], &[]), "no markup here");
    }
}
