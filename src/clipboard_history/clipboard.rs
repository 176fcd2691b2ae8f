//! Clipboard read primitive
//!
//! The monitor only needs "read the current text". `SystemClipboard` wraps
//! arboard; `ScriptedClipboard` replays canned reads for tests and dry runs.

use std::collections::VecDeque;

use arboard::Clipboard;
use tracing::debug;

use crate::error::ClipboardReadError;

/// Synchronous source of the current clipboard text.
///
/// Sources are built on the polling thread (see `ClipboardMonitor::new`),
/// so implementations need not be `Send`. An empty string means "nothing to
/// record", not an error.
pub trait ClipboardSource {
    fn read_text(&mut self) -> Result<String, ClipboardReadError>;
}

impl<S: ClipboardSource + ?Sized> ClipboardSource for Box<S> {
    fn read_text(&mut self) -> Result<String, ClipboardReadError> {
        (**self).read_text()
    }
}

/// The OS clipboard via arboard.
///
/// The handle is opened lazily on first read and reopened after a failed
/// open, so a clipboard that is briefly unavailable at startup does
/// not disable monitoring for good.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardReadError> {
        if self.clipboard.is_none() {
            let clipboard =
                Clipboard::new().map_err(|e| ClipboardReadError::Unavailable(e.to_string()))?;
            debug!("Opened system clipboard");
            self.clipboard = Some(clipboard);
        }

        let Some(clipboard) = self.clipboard.as_mut() else {
            return Err(ClipboardReadError::Unavailable("clipboard not open".into()));
        };

        match clipboard.get_text() {
            Ok(text) => Ok(text),
            // Empty clipboard or non-text content
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(arboard::Error::ClipboardNotSupported) => {
                self.clipboard = None;
                Err(ClipboardReadError::Unavailable(
                    "clipboard not supported".into(),
                ))
            }
            Err(e) => Err(ClipboardReadError::Read(e.to_string())),
        }
    }
}

/// Replays a fixed sequence of reads, then keeps returning the last value.
#[derive(Debug, Clone, Default)]
pub struct ScriptedClipboard {
    reads: VecDeque<Result<String, ClipboardReadError>>,
    last: String,
}

impl ScriptedClipboard {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reads: values.into_iter().map(|v| Ok(v.into())).collect(),
            ..Self::default()
        }
    }

    /// Queue a failed read.
    pub fn push_error(mut self, error: ClipboardReadError) -> Self {
        self.reads.push_back(Err(error));
        self
    }

    /// Queue a successful read.
    pub fn push_text(mut self, text: impl Into<String>) -> Self {
        self.reads.push_back(Ok(text.into()));
        self
    }
}

impl ClipboardSource for ScriptedClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardReadError> {
        match self.reads.pop_front() {
            Some(Ok(text)) => {
                self.last = text.clone();
                Ok(text)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.clone()),
        }
    }
}
