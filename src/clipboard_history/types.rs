//! Core clipboard history types
//!
//! `ClipboardEntry` is immutable once constructed. Its `ContentType` is
//! derived from the content length at creation time and never recomputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EntryError;

/// Entries shorter than this many characters are `ShortText`
pub const SHORT_TEXT_MAX_EXCLUSIVE: usize = 10;

/// Entries longer than this many characters are `LongText`
pub const LONG_TEXT_MIN_EXCLUSIVE: usize = 1000;

/// Length class of a clipboard entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    ShortText,
    Text,
    LongText,
}

impl ContentType {
    /// Classify content by its length in characters.
    ///
    /// Precedence matters: `< 10` wins first, then `> 1000`, everything
    /// else (10..=1000) is plain text.
    pub fn classify(content: &str) -> Self {
        let len = content.chars().count();
        if len < SHORT_TEXT_MAX_EXCLUSIVE {
            ContentType::ShortText
        } else if len > LONG_TEXT_MIN_EXCLUSIVE {
            ContentType::LongText
        } else {
            ContentType::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::ShortText => "shorttext",
            ContentType::Text => "text",
            ContentType::LongText => "longtext",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured clipboard value
///
/// Deserialization goes through `RawEntry` so a persisted entry must satisfy
/// the same rules as a freshly constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct ClipboardEntry {
    id: String,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    content_type: ContentType,
}

impl ClipboardEntry {
    /// Create an entry stamped with the current time.
    ///
    /// # Errors
    /// Returns `EntryError::EmptyContent` for an empty string.
    pub fn new(content: impl Into<String>) -> Result<Self, EntryError> {
        Self::with_timestamp(content, Utc::now())
    }

    /// Create an entry with an explicit creation instant.
    pub fn with_timestamp(
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, EntryError> {
        let content = content.into();
        if content.is_empty() {
            return Err(EntryError::EmptyContent);
        }
        Ok(Self {
            id: entry_id(timestamp),
            content_type: ContentType::classify(&content),
            content,
            timestamp,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Length of the content in characters
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Single-line preview, truncated to `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        let flat: String = self
            .content
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let truncated: String = flat.chars().take(max_chars).collect();
            format!("{}…", truncated)
        }
    }
}

/// On-disk shape of an entry, checked before it becomes a `ClipboardEntry`
#[derive(Deserialize)]
struct RawEntry {
    id: String,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    content_type: ContentType,
}

impl TryFrom<RawEntry> for ClipboardEntry {
    type Error = EntryError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        if raw.content.is_empty() {
            return Err(EntryError::EmptyContent);
        }
        let derived = ContentType::classify(&raw.content);
        if raw.content_type != derived {
            return Err(EntryError::TypeMismatch {
                declared: raw.content_type,
                derived,
            });
        }
        Ok(Self {
            id: raw.id,
            content: raw.content,
            timestamp: raw.timestamp,
            content_type: raw.content_type,
        })
    }
}

/// Nanoseconds since the epoch. Falls back to microseconds for instants
/// outside the i64 nanosecond range (beyond year 2262).
fn entry_id(timestamp: DateTime<Utc>) -> String {
    match timestamp.timestamp_nanos_opt() {
        Some(nanos) => nanos.to_string(),
        None => timestamp.timestamp_micros().to_string(),
    }
}
