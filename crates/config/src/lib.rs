//! Configuration loading, validation, and env substitution.
//!
//! Config files: `strait.toml`, `strait.yaml`, or `strait.json`
//! Searched in `./` then `~/.config/strait/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{config_dir, discover_and_load, find_config_file, load_config},
    schema::{ChannelSpec, DiscordConfig, IrcConfig, StraitConfig},
    validate::{has_errors, validate, Diagnostic, Severity},
};
