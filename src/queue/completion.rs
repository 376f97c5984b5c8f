//! Completion tracking for the worker pool
//!
//! A single-assignment future observed by external callers to learn when all
//! submitted work has finished. Implemented over a `tokio::sync::watch`
//! channel written exactly once by the pool's coordination thread and read
//! by any number of observers.

use tokio::sync::watch;

/// Terminal state of the worker pool's draining loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The store stopped accepting and drained normally
    Succeeded,
    /// The pool's own coordination machinery failed (distinct from per-item
    /// processing errors, which never end the pool)
    Faulted,
    /// The pool-level cancellation token fired before the drain finished
    Canceled,
}

impl CompletionOutcome {
    /// Boolean success indicator: `true` only for a natural drain
    pub fn succeeded(&self) -> bool {
        matches!(self, CompletionOutcome::Succeeded)
    }
}

/// Write side of the completion future; held by the coordination thread
#[derive(Debug)]
pub(crate) struct CompletionTracker {
    sender: watch::Sender<Option<CompletionOutcome>>,
}

impl CompletionTracker {
    pub(crate) fn new() -> (Self, Completion) {
        let (sender, receiver) = watch::channel(None);
        (Self { sender }, Completion { receiver })
    }

    /// Resolve the future; only the first resolution takes effect
    pub(crate) fn resolve(&self, outcome: CompletionOutcome) {
        self.sender.send_if_modified(|slot| {
            if slot.is_none() {
                *slot = Some(outcome);
                true
            } else {
                false
            }
        });
    }
}

/// Observer handle for the pool's completion
///
/// Clonable; every clone resolves to the same outcome and any number of
/// observers may wait concurrently without extra synchronization.
#[derive(Debug, Clone)]
pub struct Completion {
    receiver: watch::Receiver<Option<CompletionOutcome>>,
}

impl Completion {
    /// Wait until the pool has permanently stopped
    ///
    /// Resolves to [`CompletionOutcome::Faulted`] if the coordination thread
    /// disappeared without resolving, which indicates an internal failure.
    pub async fn wait(&self) -> CompletionOutcome {
        let mut receiver = self.receiver.clone();
        let outcome = match receiver.wait_for(|slot| slot.is_some()).await {
            Ok(slot) => (*slot).unwrap_or(CompletionOutcome::Faulted),
            Err(_) => CompletionOutcome::Faulted,
        };
        outcome
    }

    /// Blocking variant of [`Completion::wait`] for synchronous callers
    pub fn wait_blocking(&self) -> CompletionOutcome {
        futures::executor::block_on(self.wait())
    }

    /// Current outcome without waiting, if already resolved
    pub fn try_outcome(&self) -> Option<CompletionOutcome> {
        *self.receiver.borrow()
    }
}
