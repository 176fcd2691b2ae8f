//! Configuration module - storage location, history size and polling
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.clipman/config.json
//! - Default values for all settings
//! - Validation (storage directory creation, capacity fallback)
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - The `Config` struct and its validation
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

pub use defaults::{
    DEFAULT_CONFIG_PATH, DEFAULT_LOG_LEVEL, DEFAULT_MAX_ENTRIES, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_STORAGE_PATH, MIN_POLL_INTERVAL_MS,
};

pub use types::{Config, ConfigError};

pub use loader::{default_config_path, load_config};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
