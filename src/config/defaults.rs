//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Default history capacity, also substituted for non-positive values
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Default storage directory (tilde-expanded at load time)
pub const DEFAULT_STORAGE_PATH: &str = "~/.clipman/history";

/// Default location of the optional JSON config file
pub const DEFAULT_CONFIG_PATH: &str = "~/.clipman/config.json";

/// Clipboard polling cadence
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Lower bound for the polling cadence, anything faster just burns CPU
pub const MIN_POLL_INTERVAL_MS: u64 = 10;

/// Default log level (overridable with RUST_LOG)
pub const DEFAULT_LOG_LEVEL: &str = "info";
