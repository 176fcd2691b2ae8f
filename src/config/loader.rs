//! Configuration loading from file system
//!
//! Reads an optional JSON file. Any failure falls back to defaults.

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::defaults::DEFAULT_CONFIG_PATH;
use super::types::Config;

/// ~/.clipman/config.json
pub fn default_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref())
}

/// Load configuration from `path`.
///
/// Returns `Config::default()` if the file is missing, unreadable or not
/// valid JSON. Missing fields take their defaults individually.
#[instrument(name = "load_config")]
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Failed to read config, using defaults");
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&json) {
        Ok(mut config) => {
            config.expand_paths();
            info!(path = %path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            warn!(
                error = %e,
                path = %path.display(),
                "Failed to parse config JSON, using defaults"
            );
            Config::default()
        }
    }
}
