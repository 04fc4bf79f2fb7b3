//! Counted loading flags.
//!
//! A [`LoadingIndicator`] is "loading" while at least one [`LoadingGuard`]
//! is alive. Guards release on drop, so every exit path of an operation
//! (success, error, early return, cancellation) clears its share exactly
//! once.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    active: Arc<watch::Sender<usize>>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(0);
        Self {
            active: Arc::new(sender),
        }
    }

    /// Marks one operation as in flight until the returned guard drops.
    pub fn begin(&self) -> LoadingGuard {
        self.active.send_modify(|count| *count += 1);
        LoadingGuard {
            active: Arc::clone(&self.active),
        }
    }

    pub fn is_loading(&self) -> bool {
        *self.active.borrow() > 0
    }

    /// Number of operations currently holding a guard.
    pub fn in_flight(&self) -> usize {
        *self.active.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.active.subscribe()
    }
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
#[must_use = "the loading flag clears as soon as the guard is dropped"]
pub struct LoadingGuard {
    active: Arc<watch::Sender<usize>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.active
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}
