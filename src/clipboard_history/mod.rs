//! Clipboard History Module
//!
//! Polls the clipboard and keeps a bounded, JSON-persisted history of
//! distinct values.
//!
//! ## Features
//! - Background polling every 500ms (configurable)
//! - Content-based change detection (only new values are recorded)
//! - Length classification (shorttext / text / longtext)
//! - Capacity-bounded history, oldest entries evicted first
//! - Crash-safe full-snapshot persistence to clipboard_history.json
//!
//! ## Module Structure
//! - `types`: Core types (ContentType, ClipboardEntry)
//! - `store`: Bounded history with JSON persistence
//! - `change_detection`: Last-seen diffing
//! - `clipboard`: Clipboard read primitive (arboard and scripted sources)
//! - `lifetime`: Cancellation token for the polling thread
//! - `monitor`: Background clipboard polling

mod change_detection;
mod clipboard;
mod lifetime;
mod monitor;
mod store;
mod types;

// Types
pub use types::{ClipboardEntry, ContentType, LONG_TEXT_MIN_EXCLUSIVE, SHORT_TEXT_MAX_EXCLUSIVE};

// Store
pub use store::{HistoryStore, HISTORY_FILE_NAME};

// Change detection
pub use change_detection::{ClipboardChangeDetector, Observation};

// Clipboard sources
pub use clipboard::{ClipboardSource, ScriptedClipboard, SystemClipboard};

// Lifetime / Monitor
pub use lifetime::LifetimeToken;
pub use monitor::{ClipboardMonitor, MonitorState};
