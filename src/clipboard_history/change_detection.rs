//! Clipboard change detection
//!
//! Content-based diffing against the last value seen. Only a change to a
//! new non-empty value counts; re-reading the same value every poll does
//! not.

use tracing::trace;

/// Result of comparing one clipboard read with the last-seen value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Clipboard is empty; never recorded
    Empty,
    /// Same text as the last-seen value
    Unchanged,
    /// New text; last-seen has been updated
    Changed,
}

/// Remembers the last clipboard value that was seen as a change.
#[derive(Debug, Default)]
pub struct ClipboardChangeDetector {
    last_seen: Option<String>,
}

impl ClipboardChangeDetector {
    pub fn new() -> Self {
        Self { last_seen: None }
    }

    /// Compare `current` with the last-seen value.
    ///
    /// On `Changed` the detector now remembers `current`. Empty reads never
    /// touch the last-seen value, so "a", "", "a" records "a" only once.
    pub fn observe(&mut self, current: &str) -> Observation {
        if current.is_empty() {
            return Observation::Empty;
        }
        if self.last_seen.as_deref() == Some(current) {
            return Observation::Unchanged;
        }

        trace!(
            old_len = self.last_seen.as_ref().map(|s| s.len()),
            new_len = current.len(),
            "Clipboard content changed"
        );
        self.last_seen = Some(current.to_owned());
        Observation::Changed
    }

    /// The last value reported as a change
    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }
}
