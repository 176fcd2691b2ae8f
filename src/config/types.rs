//! Configuration type definitions

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::defaults::*;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to create storage directory '{}': {source}", path.display())]
    StorageDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding clipboard_history.json (default: ~/.clipman/history)
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    /// History capacity; values <= 0 fall back to 1000 on validate
    #[serde(default = "default_max_entries")]
    pub max_entries: i64,
    /// Clipboard polling cadence in milliseconds (default: 500)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// tracing filter directive used when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_STORAGE_PATH).as_ref())
}
fn default_max_entries() -> i64 {
    DEFAULT_MAX_ENTRIES as i64
}
fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_path: default_storage_path(),
            max_entries: default_max_entries(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Create the storage directory and normalize out-of-range values.
    ///
    /// # Errors
    /// Returns `ConfigError::StorageDir` if the directory cannot be created.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.storage_path).map_err(|source| ConfigError::StorageDir {
            path: self.storage_path.clone(),
            source,
        })?;
        if self.max_entries <= 0 {
            self.max_entries = DEFAULT_MAX_ENTRIES as i64;
        }
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            self.poll_interval_ms = MIN_POLL_INTERVAL_MS;
        }
        Ok(())
    }

    /// Expand a leading `~` in `storage_path`
    pub fn expand_paths(&mut self) {
        let raw = self.storage_path.to_string_lossy().into_owned();
        self.storage_path = PathBuf::from(shellexpand::tilde(&raw).as_ref());
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
