//! Self-echo suppression.

/// Suppresses events authored by the bridge's own identity on the
/// originating network, so a relayed message is never re-read and
/// re-relayed.
///
/// Replace-protocol reinsertions need no extra bookkeeping here: they are
/// authored by the bridge on the destination side of the original relay,
/// so that side's own self-identity filter already excludes them.
#[derive(Debug, Clone)]
pub struct EchoGuard {
    identity: String,
}

impl EchoGuard {
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }

    /// True when the event author is the bridge itself. Comparison is
    /// ASCII case-insensitive since IRC nicks are case-insensitive.
    #[must_use]
    pub fn suppress(&self, author: Option<&str>) -> bool {
        author.is_some_and(|a| a.eq_ignore_ascii_case(&self.identity))
    }
}
