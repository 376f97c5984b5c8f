//! Cooperative Cancellation
//!
//! Provides a cheap, clonable cancellation flag accepted by the blocking
//! admission operations and, optionally, by the worker pool as a whole.
//! Cancellation is level-triggered and advisory: a signalled token aborts
//! only the specific wait observing it, never work already handed to a
//! worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clonable cancellation token shared between a caller and a blocked wait
///
/// All clones observe the same underlying flag; once cancelled the token
/// never resets.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new token in the not-cancelled state
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signal cancellation to every clone of this token
    pub fn cancel(&self) {
        // Use Release ordering to synchronize-with all Acquire loads so any
        // thread checking is_cancelled() sees this store and any previous
        // memory operations
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been signalled
    pub fn is_cancelled(&self) -> bool {
        // Use Acquire ordering to synchronize-with Release stores
        self.cancelled.load(Ordering::Acquire)
    }
}
