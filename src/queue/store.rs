//! Bounded FIFO store with backpressure
//!
//! This module provides the core thread-safe container:
//! - FIFO ordering of pending items behind a mutex/condvar pair
//! - Optional capacity with blocking or bounded-try admission
//! - Idempotent `complete_adding` that lets pending items drain
//! - A blocking `next` pull used by the worker pool, terminal once the
//!   store stops accepting and empties

use crate::core::cancel::CancellationToken;
use crate::core::sync::handle_mutex_poison;
use crate::queue::error::{QueueError, QueueResult};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// How often a blocked wait re-checks its cancellation token. The token is a
/// plain flag and cannot signal the condvar, so waits holding a token sleep
/// in slices.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug)]
struct StoreInner<T> {
    items: VecDeque<T>,
    accepting: bool,
    closed: bool,
}

/// Thread-safe FIFO store with an optional maximum size
///
/// Admissions block (or time out) while a bounded store is full; workers
/// pulling with [`BoundedStore::next`] block while the store is empty but
/// still accepting. Items are admitted and drained in FIFO order with
/// respect to a single producer and single consumer; with several concurrent
/// consumers only exactly-once removal is guaranteed.
#[derive(Debug)]
pub struct BoundedStore<T> {
    inner: Mutex<StoreInner<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: Option<usize>,
}

impl<T> BoundedStore<T> {
    /// Create a store; `None` capacity means unbounded
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                items: VecDeque::new(),
                accepting: true,
                closed: false,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    /// Configured capacity, or `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of items currently pending
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the store still admits new items
    pub fn is_accepting(&self) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.accepting && !inner.closed)
            .unwrap_or(false)
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, StoreInner<T>>> {
        handle_mutex_poison(self.inner.lock(), |message| QueueError::OperationFailed {
            message,
        })
    }

    fn check_admission(inner: &StoreInner<T>) -> QueueResult<()> {
        if inner.closed {
            return Err(QueueError::Closed);
        }
        if !inner.accepting {
            return Err(QueueError::AddingCompleted);
        }
        Ok(())
    }

    fn has_room(&self, inner: &StoreInner<T>) -> bool {
        !self
            .capacity
            .is_some_and(|capacity| inner.items.len() >= capacity)
    }

    /// Admit an item, blocking while a bounded store is full
    pub fn add(&self, item: T) -> QueueResult<()> {
        self.add_inner(item, None)
    }

    /// Admit an item, blocking until room or until the token is cancelled
    pub fn add_with_token(&self, item: T, token: &CancellationToken) -> QueueResult<()> {
        self.add_inner(item, Some(token))
    }

    fn add_inner(&self, item: T, token: Option<&CancellationToken>) -> QueueResult<()> {
        let mut guard = self.lock()?;
        loop {
            Self::check_admission(&guard)?;
            if self.has_room(&guard) {
                guard.items.push_back(item);
                self.not_empty.notify_one();
                return Ok(());
            }
            if let Some(token) = token {
                if token.is_cancelled() {
                    return Err(QueueError::Cancelled);
                }
                let (next_guard, _) = handle_mutex_poison(
                    self.not_full.wait_timeout(guard, CANCEL_POLL_INTERVAL),
                    |message| QueueError::OperationFailed { message },
                )?;
                guard = next_guard;
            } else {
                guard = handle_mutex_poison(self.not_full.wait(guard), |message| {
                    QueueError::OperationFailed { message }
                })?;
            }
        }
    }

    /// Attempt admission without blocking
    pub fn try_add(&self, item: T) -> QueueResult<bool> {
        self.try_add_inner(item, Duration::ZERO, None)
    }

    /// Attempt admission within the waiting period; zero means an immediate
    /// non-blocking probe
    pub fn try_add_for(&self, item: T, timeout: Duration) -> QueueResult<bool> {
        self.try_add_inner(item, timeout, None)
    }

    /// Attempt admission within the waiting period, aborting early if the
    /// token is cancelled
    pub fn try_add_with_token(
        &self,
        item: T,
        timeout: Duration,
        token: &CancellationToken,
    ) -> QueueResult<bool> {
        self.try_add_inner(item, timeout, Some(token))
    }

    fn try_add_inner(
        &self,
        item: T,
        timeout: Duration,
        token: Option<&CancellationToken>,
    ) -> QueueResult<bool> {
        // An unrepresentable deadline behaves as an unbounded wait
        let deadline = Instant::now().checked_add(timeout);
        let mut guard = self.lock()?;
        loop {
            Self::check_admission(&guard)?;
            if self.has_room(&guard) {
                guard.items.push_back(item);
                self.not_empty.notify_one();
                return Ok(true);
            }
            if let Some(token) = token {
                if token.is_cancelled() {
                    return Err(QueueError::Cancelled);
                }
            }
            let mut wait = CANCEL_POLL_INTERVAL;
            if let Some(deadline) = deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Ok(false);
                }
                wait = if token.is_some() {
                    remaining.min(CANCEL_POLL_INTERVAL)
                } else {
                    remaining
                };
            }
            let (next_guard, _) = handle_mutex_poison(
                self.not_full.wait_timeout(guard, wait),
                |message| QueueError::OperationFailed { message },
            )?;
            guard = next_guard;
        }
    }

    /// Stop admitting new items; idempotent and never blocks
    ///
    /// Items already pending remain drainable. Wakes every blocked producer
    /// (so their admissions fail) and every idle worker (so they can observe
    /// the terminal state once the store empties).
    pub fn complete_adding(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            if inner.accepting {
                inner.accepting = false;
                log::debug!("store stopped accepting new items");
            }
        }
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    /// Remove the next pending item for a worker
    ///
    /// Blocks while the store is empty but still accepting. Returns
    /// `Ok(None)` — permanently — once the store has stopped accepting and
    /// is empty, or immediately once the given token is cancelled.
    pub fn next(&self, token: Option<&CancellationToken>) -> QueueResult<Option<T>> {
        let mut guard = self.lock()?;
        loop {
            if let Some(item) = guard.items.pop_front() {
                self.not_full.notify_one();
                return Ok(Some(item));
            }
            if guard.closed || !guard.accepting {
                return Ok(None);
            }
            if let Some(token) = token {
                if token.is_cancelled() {
                    return Ok(None);
                }
                let (next_guard, _) = handle_mutex_poison(
                    self.not_empty.wait_timeout(guard, CANCEL_POLL_INTERVAL),
                    |message| QueueError::OperationFailed { message },
                )?;
                guard = next_guard;
            } else {
                guard = handle_mutex_poison(self.not_empty.wait(guard), |message| {
                    QueueError::OperationFailed { message }
                })?;
            }
        }
    }

    /// Point-in-time copy of the pending items
    ///
    /// Purely observational; concurrent admissions and removals may not be
    /// reflected.
    pub fn snapshot(&self) -> QueueResult<Vec<T>>
    where
        T: Clone,
    {
        let guard = self.lock()?;
        Ok(guard.items.iter().cloned().collect())
    }

    /// Stop accepting, discard pending items and release the buffer
    ///
    /// Post-close admissions fail fast with [`QueueError::Closed`]; workers
    /// observe an empty, non-accepting store and exit.
    pub fn close(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            if !inner.closed {
                inner.closed = true;
                inner.accepting = false;
                let discarded = inner.items.len();
                inner.items = VecDeque::new();
                if discarded > 0 {
                    log::debug!("store closed, discarded {discarded} pending items");
                } else {
                    log::debug!("store closed");
                }
            }
        }
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().map(|inner| inner.closed).unwrap_or(true)
    }
}
