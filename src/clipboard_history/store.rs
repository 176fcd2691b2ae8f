//! Bounded, persisted clipboard history
//!
//! The store owns an oldest-first `Vec<ClipboardEntry>` capped at
//! `capacity` and mirrors it to `<storage_dir>/clipboard_history.json`.
//! Every mutation rewrites the whole file (write temp + rename), and the
//! mutation and the write happen under one lock so each snapshot on disk
//! is complete.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info, instrument};

use super::types::ClipboardEntry;
use crate::config::DEFAULT_MAX_ENTRIES;
use crate::error::StoreError;

/// File name of the persisted history inside the storage directory
pub const HISTORY_FILE_NAME: &str = "clipboard_history.json";

/// Capacity-bounded clipboard history with JSON snapshot persistence
#[derive(Debug)]
pub struct HistoryStore {
    entries: Mutex<Vec<ClipboardEntry>>,
    capacity: usize,
    file_path: PathBuf,
}

impl HistoryStore {
    /// Create an empty store persisting under `storage_dir`.
    ///
    /// A non-positive `max_entries` falls back to the default capacity.
    pub fn new(storage_dir: impl AsRef<Path>, max_entries: i64) -> Self {
        let capacity = if max_entries <= 0 {
            DEFAULT_MAX_ENTRIES
        } else {
            usize::try_from(max_entries).unwrap_or(usize::MAX)
        };
        let file_path = storage_dir.as_ref().join(HISTORY_FILE_NAME);

        debug!(
            capacity,
            path = %file_path.display(),
            "Created clipboard history store"
        );

        HistoryStore {
            entries: Mutex::new(Vec::new()),
            capacity,
            file_path,
        }
    }

    /// Append an entry, evicting the oldest one first when full, then
    /// persist the whole history.
    ///
    /// The in-memory append is kept even if persisting fails.
    #[instrument(name = "history_add", skip_all, fields(entry_id = %entry.id()))]
    pub fn add(&self, entry: ClipboardEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();

        if entries.len() >= self.capacity {
            let evicted = entries.remove(0);
            debug!(evicted_id = %evicted.id(), "Evicted oldest clipboard entry");
        }
        entries.push(entry);

        self.persist(&entries)
    }

    /// Snapshot of the history, oldest first
    pub fn list(&self) -> Vec<ClipboardEntry> {
        self.entries.lock().clone()
    }

    /// Replace the in-memory history with the persisted snapshot.
    ///
    /// A missing file is not an error. On read or parse failure the current
    /// in-memory history is left untouched, including when any persisted
    /// entry is empty or carries a type that does not match its content.
    #[instrument(name = "history_load", skip(self))]
    pub fn load(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();

        let data = match fs::read_to_string(&self.file_path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.file_path.display(), "History file not found, starting fresh");
                return Ok(());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.file_path.clone(),
                    source,
                })
            }
        };

        let mut loaded: Vec<ClipboardEntry> =
            serde_json::from_str(&data).map_err(|source| StoreError::Parse {
                path: self.file_path.clone(),
                source,
            })?;

        if loaded.len() > self.capacity {
            let excess = loaded.len() - self.capacity;
            loaded.drain(..excess);
            info!(
                dropped = excess,
                capacity = self.capacity,
                "Persisted history exceeds capacity, keeping newest entries"
            );
        }

        *entries = loaded;

        info!(
            path = %self.file_path.display(),
            entry_count = entries.len(),
            "Loaded clipboard history"
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Path of the persisted history file
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Write the full snapshot. Caller must hold the entries lock.
    fn persist(&self, entries: &[ClipboardEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(StoreError::Serialize)?;

        // Atomic write: a crash mid-write never truncates the real file
        let temp_path = self.file_path.with_extension("json.tmp");
        fs::write(&temp_path, &json).map_err(|source| StoreError::Write {
            path: temp_path.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&temp_path, &self.file_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Write {
                path: self.file_path.clone(),
                source,
            });
        }

        debug!(
            path = %self.file_path.display(),
            entry_count = entries.len(),
            bytes = json.len(),
            "Persisted clipboard history"
        );
        Ok(())
    }
}
