use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{env_subst::substitute_env, schema::StraitConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["strait.toml", "strait.yaml", "strait.yml", "strait.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<StraitConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./strait.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/strait/strait.{toml,yaml,yml,json}` (user-global)
///
/// Unlike tools that can run on defaults, the relay needs a server and a
/// token, so a missing config file is an error.
pub fn discover_and_load() -> anyhow::Result<StraitConfig> {
    let Some(path) = find_config_file() else {
        anyhow::bail!(
            "no config file found (looked for strait.{{toml,yaml,yml,json}} in . and {})",
            config_dir().unwrap_or_else(|| PathBuf::from("~/.config/strait")).display()
        );
    };
    debug!(path = %path.display(), "loading config");
    load_config(&path)
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/strait/
    if let Some(dirs) = directories::ProjectDirs::from("", "", "strait") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/strait/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "strait").map(|d| d.config_dir().to_path_buf())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<StraitConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
