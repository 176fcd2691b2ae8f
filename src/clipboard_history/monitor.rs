//! Clipboard monitoring
//!
//! A single background thread polls the clipboard on a fixed cadence,
//! diffs each read against the last-seen value and hands new entries to the
//! `HistoryStore`. The thread is bound to a child of the owner's
//! `LifetimeToken`; either side cancelling ends the loop within one tick.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::change_detection::{ClipboardChangeDetector, Observation};
use super::clipboard::{ClipboardSource, SystemClipboard};
use super::lifetime::LifetimeToken;
use super::store::HistoryStore;
use super::types::{ClipboardEntry, ContentType};
use crate::config::DEFAULT_POLL_INTERVAL_MS;
use crate::error::MonitorError;

/// Builds the clipboard source on the polling thread
type SourceFactory = Box<dyn FnOnce() -> Box<dyn ClipboardSource> + Send>;

/// Monitor lifecycle. There is no way back from `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
    Stopped,
}

struct Lifecycle {
    state: MonitorState,
    make_source: Option<SourceFactory>,
    token: Option<LifetimeToken>,
    handle: Option<JoinHandle<()>>,
}

/// Polls the clipboard and records each new distinct value.
pub struct ClipboardMonitor {
    store: Arc<HistoryStore>,
    poll_interval: Duration,
    lifecycle: Mutex<Lifecycle>,
}

impl ClipboardMonitor {
    /// Create an idle monitor. `make_source` runs on the polling thread
    /// when the monitor starts.
    pub fn new<F, S>(store: Arc<HistoryStore>, make_source: F) -> Self
    where
        F: FnOnce() -> S + Send + 'static,
        S: ClipboardSource + 'static,
    {
        let make_source: SourceFactory =
            Box::new(move || Box::new(make_source()) as Box<dyn ClipboardSource>);

        ClipboardMonitor {
            store,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            lifecycle: Mutex::new(Lifecycle {
                state: MonitorState::Idle,
                make_source: Some(make_source),
                token: None,
                handle: None,
            }),
        }
    }

    /// Idle monitor reading the OS clipboard
    pub fn with_system_clipboard(store: Arc<HistoryStore>) -> Self {
        Self::new(store, SystemClipboard::new)
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Current lifecycle state.
    ///
    /// A running monitor whose token was cancelled by the owner reports
    /// `Stopped`.
    pub fn state(&self) -> MonitorState {
        let lifecycle = self.lifecycle.lock();
        effective_state(&lifecycle)
    }

    /// Launch the polling thread, bound to a child of `lifetime`.
    ///
    /// # Errors
    /// `AlreadyRunning` if started before, `Stopped` once stopped, `Spawn`
    /// if the OS refuses the thread (the monitor is then stopped).
    pub fn start(&self, lifetime: &LifetimeToken) -> Result<(), MonitorError> {
        let mut lifecycle = self.lifecycle.lock();

        match effective_state(&lifecycle) {
            MonitorState::Running => return Err(MonitorError::AlreadyRunning),
            MonitorState::Stopped => return Err(MonitorError::Stopped),
            MonitorState::Idle => {}
        }
        let Some(make_source) = lifecycle.make_source.take() else {
            return Err(MonitorError::Stopped);
        };

        let token = lifetime.child();
        let loop_token = token.clone();
        let store = Arc::clone(&self.store);
        let poll_interval = self.poll_interval;

        let spawned = thread::Builder::new()
            .name("clipman-monitor".into())
            .spawn(move || {
                let poller = Poller::new(make_source(), store);
                clipboard_monitor_loop(poller, loop_token, poll_interval);
            });

        match spawned {
            Ok(handle) => {
                lifecycle.state = MonitorState::Running;
                lifecycle.token = Some(token);
                lifecycle.handle = Some(handle);
                info!(
                    poll_interval_ms = poll_interval.as_millis() as u64,
                    "Clipboard listener started"
                );
                Ok(())
            }
            Err(e) => {
                lifecycle.state = MonitorState::Stopped;
                Err(MonitorError::Spawn(e))
            }
        }
    }

    /// Request the polling loop to stop. Never blocks.
    ///
    /// Safe before `start`, after the loop already exited, and repeatedly.
    pub fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock();
        match lifecycle.state {
            MonitorState::Idle => {
                lifecycle.make_source = None;
                debug!("Clipboard monitor stopped before it was started");
            }
            MonitorState::Running => {
                if let Some(token) = &lifecycle.token {
                    token.cancel();
                }
                info!("Clipboard monitor stop requested");
            }
            MonitorState::Stopped => {
                debug!("Clipboard monitor already stopped");
            }
        }
        lifecycle.state = MonitorState::Stopped;
    }

    /// Wait for the polling thread to exit. Returns at once if it was never
    /// started or has already been joined.
    pub fn join(&self) {
        // Take the handle so the lock is not held while joining
        let handle = self.lifecycle.lock().handle.take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("Clipboard monitor thread panicked");
            }
        }
    }
}

impl Drop for ClipboardMonitor {
    fn drop(&mut self) {
        if let Some(token) = &self.lifecycle.get_mut().token {
            token.cancel();
        }
    }
}

fn effective_state(lifecycle: &Lifecycle) -> MonitorState {
    match (lifecycle.state, &lifecycle.token) {
        (MonitorState::Running, Some(token)) if token.is_cancelled() => MonitorState::Stopped,
        (state, _) => state,
    }
}

/// Background loop: wait one interval, poll, repeat until cancelled.
fn clipboard_monitor_loop<S: ClipboardSource>(
    mut poller: Poller<S>,
    token: LifetimeToken,
    poll_interval: Duration,
) {
    debug!(
        poll_interval_ms = poll_interval.as_millis() as u64,
        "Clipboard monitor loop running"
    );

    let mut wait = poll_interval;
    loop {
        // Cancellation is raced against the tick timer
        if token.wait_timeout(wait) {
            break;
        }

        let start = Instant::now();
        poller.tick();

        // Keep the cadence: sleep only for what is left of this interval
        wait = poll_interval.saturating_sub(start.elapsed());
    }

    info!("clipboard listener stopped");
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    ReadFailed,
    Empty,
    Unchanged,
    Recorded(ContentType),
    StoreFailed(ContentType),
}

/// Per-thread polling state: the source, the diff state and the store.
pub(crate) struct Poller<S> {
    source: S,
    detector: ClipboardChangeDetector,
    store: Arc<HistoryStore>,
}

impl<S: ClipboardSource> Poller<S> {
    pub(crate) fn new(source: S, store: Arc<HistoryStore>) -> Self {
        Poller {
            source,
            detector: ClipboardChangeDetector::new(),
            store,
        }
    }

    /// One read-diff-record cycle. Never fails; problems are logged.
    pub(crate) fn tick(&mut self) -> TickOutcome {
        let content = match self.source.read_text() {
            Ok(content) => content,
            Err(e) => {
                warn!(error = %e, "Failed to read clipboard");
                return TickOutcome::ReadFailed;
            }
        };

        match self.detector.observe(&content) {
            Observation::Empty => return TickOutcome::Empty,
            Observation::Unchanged => return TickOutcome::Unchanged,
            Observation::Changed => {}
        }

        let entry = match ClipboardEntry::new(content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Rejected clipboard entry");
                return TickOutcome::Empty;
            }
        };
        let content_type = entry.content_type();
        let length = entry.char_count();
        let timestamp = entry.timestamp();

        match self.store.add(entry) {
            Ok(()) => {
                info!(
                    content_type = %content_type,
                    length,
                    timestamp = %timestamp.to_rfc3339(),
                    "New clipboard entry captured"
                );
                TickOutcome::Recorded(content_type)
            }
            Err(e) => {
                let correlation_id = Uuid::new_v4().to_string();
                error!(
                    correlation_id = %correlation_id,
                    stage = e.stage(),
                    error = %e,
                    content_type = %content_type,
                    length,
                    timestamp = %timestamp.to_rfc3339(),
                    "Failed to store clipboard entry"
                );
                TickOutcome::StoreFailed(content_type)
            }
        }
    }

    #[cfg(test)]
    fn last_seen(&self) -> Option<&str> {
        self.detector.last_seen()
    }
}
