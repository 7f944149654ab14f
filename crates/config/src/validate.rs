//! Configuration validation.
//!
//! Semantic checks on a parsed [`StraitConfig`]: missing credentials,
//! malformed channel lists, and settings that would make the relay a no-op.

use std::collections::HashSet;

use crate::schema::StraitConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "irc.host"
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn error(path: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    fn warning(path: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Returns `true` if any diagnostic is an error.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// Validate a parsed config. Errors mean the relay cannot start.
#[must_use]
pub fn validate(config: &StraitConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if config.irc.host.is_empty() {
        diagnostics.push(Diagnostic::error("irc.host", "IRC server host is not set"));
    }
    if config.irc.nick.is_empty() {
        diagnostics.push(Diagnostic::error("irc.nick", "IRC nickname is not set"));
    }
    if config.irc.port == 0 {
        diagnostics.push(Diagnostic::error("irc.port", "IRC port cannot be 0"));
    }
    if config.irc.port == 6667 && config.irc.use_tls {
        diagnostics.push(Diagnostic::warning(
            "irc.port",
            "port 6667 is usually plaintext; set use_tls = false or use 6697",
        ));
    }

    if config.discord.token.is_none() {
        diagnostics.push(Diagnostic::error(
            "discord.token",
            "Discord bot token is not set",
        ));
    }
    if config.discord.guild_id == 0 {
        diagnostics.push(Diagnostic::error(
            "discord.guild_id",
            "Discord guild id is not set",
        ));
    }

    if config.channels.is_empty() {
        diagnostics.push(Diagnostic::warning(
            "channels",
            "no channels configured; nothing will be relayed",
        ));
    }

    let mut seen = HashSet::new();
    for (idx, spec) in config.channel_specs().iter().enumerate() {
        let path = format!("channels[{idx}]");
        if !spec.name.starts_with('#') {
            diagnostics.push(Diagnostic::warning(
                &path,
                format!(
                    "channel \"{}\" does not start with '#' and will be skipped",
                    spec.name
                ),
            ));
        }
        if !seen.insert(spec.name.to_ascii_lowercase()) {
            diagnostics.push(Diagnostic::error(
                &path,
                format!("channel \"{}\" is listed more than once", spec.name),
            ));
        }
        if let Some(key) = &spec.key
            && key.is_empty()
        {
            diagnostics.push(Diagnostic::warning(&path, "channel key is empty"));
        }
    }

    if config.discord.replace_messages && config.discord.owner_id.is_none() {
        diagnostics.push(Diagnostic::warning(
            "discord.replace_messages",
            "replace_messages is enabled without owner_id; admin commands stay unavailable",
        ));
    }

    diagnostics
}
