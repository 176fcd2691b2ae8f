//! clipman - clipboard history daemon
//!
//! This library provides the clipboard polling monitor and the bounded,
//! persisted history store behind the `clipman` binary.

pub mod clipboard_history;
pub mod config;
pub mod error;
pub mod logging;
