use std::path::PathBuf;

use thiserror::Error;
use tracing::error;

use crate::clipboard_history::ContentType;

/// Failures from the history store, one variant per persistence stage.
///
/// None of these are fatal to the store itself. The caller decides whether
/// to log and continue or abort.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to create storage directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to marshal clipboard history: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write clipboard history to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read clipboard history from '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse clipboard history in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Short stage name, used as a structured log field.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::CreateDir { .. } => "directory",
            Self::Serialize(_) => "marshal",
            Self::Write { .. } => "write",
            Self::Read { .. } => "read",
            Self::Parse { .. } => "parse",
        }
    }
}

/// Rejected entry construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("clipboard entry content must not be empty")]
    EmptyContent,

    #[error("clipboard entry is marked '{declared}' but its content is '{derived}'")]
    TypeMismatch {
        declared: ContentType,
        derived: ContentType,
    },
}

/// Failure of the clipboard read primitive. Always transient from the
/// monitor's point of view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardReadError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard read failed: {0}")]
    Read(String),
}

/// Lifecycle errors returned by `ClipboardMonitor::start`.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("clipboard monitor is already running")]
    AlreadyRunning,

    #[error("clipboard monitor was stopped and cannot be restarted")]
    Stopped,

    #[error("failed to spawn clipboard monitor thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Extension trait for logging a recoverable failure with the caller's
/// location and carrying on.
///
/// ```ignore
/// use clipman::error::ResultExt;
///
/// // Startup load failure is not fatal, an empty history is fine
/// store.load().log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None.
    fn log_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = %error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }
}
