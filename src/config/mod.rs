//! Configuration file discovery and loading for the CLI.

pub use vt_core::config::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Locations searched, in order, when no `--config` is given.
pub const DEFAULT_PATHS: &[&str] = &[
    "./videotools.toml",
    "~/.config/videotools/config.toml",
    "/etc/videotools/config.toml",
];

/// Load configuration from a TOML file.
///
/// Unreadable or malformed files are errors; validation findings are logged
/// as warnings.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(vt_core::Error::from)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = Config::from_toml(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    for warning in config.validate() {
        tracing::warn!("{}: {warning}", path.display());
    }

    Ok(config)
}

/// Load config from `custom_path`, else the first existing default location,
/// else built-in defaults.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    match find_default_config() {
        Some(path) => {
            tracing::debug!("using config file {}", path.display());
            load_config(&path)
        }
        None => Ok(Config::default()),
    }
}

/// The first default location that exists, tilde-expanded.
pub fn find_default_config() -> Option<PathBuf> {
    DEFAULT_PATHS
        .iter()
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
        .find(|p| p.exists())
}
