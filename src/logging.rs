//! Structured JSONL logging plus human-readable stderr output.
//!
//! This module provides dual-output logging:
//! - **JSONL to file** (~/.clipman/logs/clipman.jsonl) - structured, one event per line
//! - **Compact to stderr** - human-readable for whoever runs the daemon
//!
//! # Usage
//!
//! ```rust,ignore
//! use clipman::logging;
//!
//! // Initialize logging - MUST keep guard alive for duration of program
//! let _guard = logging::init("info");
//!
//! // Use tracing macros directly
//! tracing::info!(content_type = "text", length = 42, "New clipboard entry captured");
//! ```
//!
//! # JSONL Output Format
//!
//! ```json
//! {"timestamp":"2024-12-25T10:30:45.123Z","level":"INFO","target":"clipman::clipboard_history::monitor","fields":{"message":"New clipboard entry captured","content_type":"shorttext","length":5}}
//! ```

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::DEFAULT_LOG_LEVEL;

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the dual-output logging system.
///
/// `default_level` is any `EnvFilter` directive and is used unless
/// `RUST_LOG` is set. If the log file cannot be opened, only stderr output
/// is produced.
pub fn init(default_level: &str) -> LoggingGuard {
    let log_dir = log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_path();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path);

    // Non-blocking writer so a slow disk never stalls the poller
    let (non_blocking_file, file_guard) = match file {
        Ok(file) => tracing_appender::non_blocking(file),
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            tracing_appender::non_blocking(std::io::sink())
        }
    };

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::new(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        )))
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    // try_init: a second call (e.g. from tests) keeps the first subscriber
    let installed = tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(json_layer)
        .with(pretty_layer)
        .try_init();

    if installed.is_ok() {
        tracing::info!(
            event_type = "app_lifecycle",
            action = "started",
            log_path = %log_path.display(),
            "Application logging initialized"
        );
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// RUST_LOG if set, else `default_level`, else the built-in default.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Get the log directory path (~/.clipman/logs/)
fn log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".clipman").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("clipman-logs"))
}

/// Get the path to the JSONL log file
pub fn log_path() -> PathBuf {
    log_dir().join("clipman.jsonl")
}
