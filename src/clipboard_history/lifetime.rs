//! Cooperative cancellation for background loops
//!
//! A `LifetimeToken` is cancelled once and stays cancelled. Cancelling a
//! token cancels every child derived from it; cancelling a child leaves the
//! parent alone. Waiting on a token doubles as the loop's sleep, so a
//! cancellation wakes the sleeper immediately instead of after the timer.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct TokenState {
    cancelled: bool,
    children: Vec<Weak<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<TokenState>,
    cancelled_cv: Condvar,
}

/// Cancellable lifetime handle. Clones share the same cancellation state.
#[derive(Debug, Clone, Default)]
pub struct LifetimeToken {
    inner: Arc<Inner>,
}

impl LifetimeToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a token that is cancelled when `self` is, or on its own.
    pub fn child(&self) -> Self {
        let child = LifetimeToken::new();
        let mut state = self.inner.state.lock();
        if state.cancelled {
            child.inner.state.lock().cancelled = true;
        } else {
            state.children.retain(|weak| weak.strong_count() > 0);
            state.children.push(Arc::downgrade(&child.inner));
        }
        child
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        let children = {
            let mut state = self.inner.state.lock();
            if state.cancelled {
                return;
            }
            state.cancelled = true;
            self.inner.cancelled_cv.notify_all();
            std::mem::take(&mut state.children)
        };

        // Parent lock is released before touching children
        for weak in children {
            if let Some(inner) = weak.upgrade() {
                LifetimeToken { inner }.cancel();
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.state.lock().cancelled
    }

    /// Block until cancelled.
    pub fn wait(&self) {
        let mut state = self.inner.state.lock();
        while !state.cancelled {
            self.inner.cancelled_cv.wait(&mut state);
        }
    }

    /// Block for up to `timeout` or until cancelled.
    ///
    /// Returns true if the token is cancelled. A timeout too large to
    /// represent as an `Instant` waits for cancellation only.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            self.wait();
            return true;
        };
        let mut state = self.inner.state.lock();
        while !state.cancelled {
            if self
                .inner
                .cancelled_cv
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                break;
            }
        }
        state.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_new_token_is_not_cancelled() {
        let token = LifetimeToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_idempotent_and_shared_by_clones() {
        let token = LifetimeToken::new();
        let clone = token.clone();

        token.cancel();
        token.cancel();

        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_parent_cancel_reaches_grandchildren() {
        let parent = LifetimeToken::new();
        let child = parent.child();
        let grandchild = child.child();

        parent.cancel();

        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
    }

    #[test]
    fn test_child_cancel_leaves_parent_running() {
        let parent = LifetimeToken::new();
        let child = parent.child();
        let sibling = parent.child();

        child.cancel();

        assert!(!parent.is_cancelled());
        assert!(!sibling.is_cancelled());
    }

    #[test]
    fn test_child_of_cancelled_parent_starts_cancelled() {
        let parent = LifetimeToken::new();
        parent.cancel();
        assert!(parent.child().is_cancelled());
    }

    #[test]
    fn test_wait_timeout_times_out_when_not_cancelled() {
        let token = LifetimeToken::new();
        let start = Instant::now();

        assert!(!token.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_wait_timeout_wakes_on_cancel() {
        let token = LifetimeToken::new();
        let canceller = token.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            canceller.cancel();
        });

        let start = Instant::now();
        assert!(token.wait_timeout(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_timeout_with_unbounded_duration() {
        let token = LifetimeToken::new();
        let canceller = token.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            canceller.cancel();
        });

        assert!(token.wait_timeout(Duration::MAX));
        handle.join().unwrap();

        // Already cancelled: returns at once
        assert!(token.wait_timeout(Duration::MAX));
    }

    #[test]
    fn test_wait_returns_after_parent_cancel() {
        let parent = LifetimeToken::new();
        let child = parent.child();

        let waiter = thread::spawn(move || child.wait());
        thread::sleep(Duration::from_millis(10));
        parent.cancel();

        waiter.join().unwrap();
    }

    #[test]
    fn test_dropped_children_are_pruned() {
        let parent = LifetimeToken::new();
        for _ in 0..100 {
            drop(parent.child());
        }
        let _live = parent.child();
        assert!(parent.inner.state.lock().children.len() <= 1);
    }
}
