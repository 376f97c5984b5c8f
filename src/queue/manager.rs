//! WorkQueue - composition root and lifecycle owner
//!
//! The WorkQueue wires the bounded store, the worker pool, the completion
//! tracker and the fault reporter together, and owns the lifecycle from
//! construction (accepting) through draining to closed.

use crate::core::cancel::CancellationToken;
use crate::faults::api::{FaultContext, FaultRecord, FaultReporter};
use crate::queue::completion::{Completion, CompletionTracker};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::store::BoundedStore;
use crate::queue::types::{ProcessResult, QueueConfig};
use crate::queue::worker::WorkerPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Bounded producer/consumer work queue
///
/// Items added from any number of producer threads are drained by a fixed
/// pool of worker threads, each invoking the processing function supplied
/// at construction on one item at a time.
///
/// # Failure visibility
///
/// Admission and processing failures are recovered locally and routed to
/// the fault reporter instead of being returned to the caller: blocking
/// `add` swallows them, and every `try_add` variant surfaces them as
/// `false`. A caller that never subscribes to faults cannot observe
/// failures at all, so subscribe before producing if visibility matters.
///
/// # Thread Safety
///
/// Fully thread-safe behind `&self`; share across threads with
/// `Arc<WorkQueue<T>>`. The one exception is `close`, which must not race
/// in-flight `add` calls from the same caller (the expected shutdown
/// sequence is `complete_adding`, await completion, then `close`).
///
/// # Example
///
/// ```rust,no_run
/// use workpool::queue::api::WorkQueue;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let queue = WorkQueue::bounded(4, 256, |item: String| {
///     println!("processing {item}");
///     Ok(())
/// })?;
///
/// queue.add("first".to_string());
/// queue.complete_adding();
/// let outcome = queue.completion().wait_blocking();
/// assert!(outcome.succeeded());
/// # Ok(())
/// # }
/// ```
pub struct WorkQueue<T: Send + 'static> {
    label: String,
    store: Arc<BoundedStore<T>>,
    reporter: Arc<FaultReporter>,
    completion: Completion,
    pool: WorkerPool,
    closed: AtomicBool,
}

impl<T: Send + 'static> WorkQueue<T> {
    /// Create an unbounded queue with `max_concurrency` workers
    ///
    /// The pool starts draining immediately.
    pub fn new(
        max_concurrency: usize,
        processor: impl Fn(T) -> ProcessResult + Send + Sync + 'static,
    ) -> QueueResult<Self> {
        Self::with_config(
            QueueConfig {
                max_concurrency,
                ..QueueConfig::default()
            },
            processor,
        )
    }

    /// Create a bounded queue: producers block once `capacity` items are
    /// pending
    pub fn bounded(
        max_concurrency: usize,
        capacity: usize,
        processor: impl Fn(T) -> ProcessResult + Send + Sync + 'static,
    ) -> QueueResult<Self> {
        Self::with_config(
            QueueConfig {
                max_concurrency,
                capacity: Some(capacity),
                ..QueueConfig::default()
            },
            processor,
        )
    }

    /// Create a queue from an explicit configuration
    pub fn with_config(
        config: QueueConfig,
        processor: impl Fn(T) -> ProcessResult + Send + Sync + 'static,
    ) -> QueueResult<Self> {
        config.validate()?;

        let store = Arc::new(BoundedStore::new(config.capacity));
        let reporter = Arc::new(FaultReporter::new());
        let (tracker, completion) = CompletionTracker::new();

        let pool = WorkerPool::start(
            &config.label,
            config.max_concurrency,
            Arc::clone(&store),
            Arc::new(processor),
            Arc::clone(&reporter),
            tracker,
            config.shutdown,
        )?;

        Ok(Self {
            label: config.label,
            store,
            reporter,
            completion,
            pool,
            closed: AtomicBool::new(false),
        })
    }

    /// Add an item, blocking while a bounded queue is full
    ///
    /// Admission failures (queue closed or no longer accepting) are not
    /// returned; they are reported as admission faults. Carried over from
    /// the reference behavior, see the type-level docs.
    pub fn add(&self, item: T) {
        if let Err(error) = self.store.add(item) {
            self.report_admission(error);
        }
    }

    /// Like [`WorkQueue::add`], aborting the wait when `token` is cancelled
    ///
    /// Cancellation aborts only this call; the queue keeps operating for
    /// other callers. The cancellation itself is reported as an admission
    /// fault.
    pub fn add_with_token(&self, item: T, token: &CancellationToken) {
        if let Err(error) = self.store.add_with_token(item, token) {
            self.report_admission(error);
        }
    }

    /// Immediate non-blocking admission probe
    ///
    /// Returns `false` both when the queue is full and when admission fails
    /// outright (the latter additionally reports an admission fault).
    pub fn try_add(&self, item: T) -> bool {
        self.handle_try(self.store.try_add(item))
    }

    /// Attempt admission within the waiting period
    pub fn try_add_for(&self, item: T, timeout: Duration) -> bool {
        self.handle_try(self.store.try_add_for(item, timeout))
    }

    /// Attempt admission within the waiting period, aborting early on
    /// cancellation
    pub fn try_add_with_token(
        &self,
        item: T,
        timeout: Duration,
        token: &CancellationToken,
    ) -> bool {
        self.handle_try(self.store.try_add_with_token(item, timeout, token))
    }

    /// Stop accepting new items; idempotent, never blocks
    ///
    /// Pending items continue to drain; once they have, the pool stops and
    /// the completion future resolves.
    pub fn complete_adding(&self) {
        self.store.complete_adding();
    }

    /// Number of items admitted but not yet pulled by a worker
    pub fn pending_count(&self) -> usize {
        self.store.len()
    }

    /// Configured capacity, or `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        self.store.capacity()
    }

    /// Point-in-time copy of the pending items (approximate under
    /// concurrent mutation)
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.store.snapshot().unwrap_or_default()
    }

    /// Observer handle resolving once the pool has permanently stopped
    pub fn completion(&self) -> Completion {
        self.completion.clone()
    }

    /// Register a synchronous fault callback
    pub fn on_fault(&self, callback: impl Fn(&FaultRecord) + Send + Sync + 'static) {
        self.reporter.on_fault(callback);
    }

    /// Subscribe to fault records through a channel
    pub fn subscribe_faults(&self, subscriber_id: String) -> UnboundedReceiver<FaultRecord> {
        self.reporter.subscribe(subscriber_id, self.label.clone())
    }

    /// Whether the draining loop is still running
    pub fn is_running(&self) -> bool {
        self.pool.is_running()
    }

    /// Number of workers currently processing an item
    pub fn active_workers(&self) -> usize {
        self.pool.active_workers()
    }

    /// Close the queue and release the store's buffer
    ///
    /// Idempotent. Stops accepting, discards any still-pending items so the
    /// pool can terminate, and makes later admissions fail fast down the
    /// admission-fault path. Must not be called concurrently with in-flight
    /// `add` calls from the same caller.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.store.close();
            log::debug!("work queue '{}' closed", self.label);
        }
    }

    fn report_admission(&self, error: QueueError) {
        self.reporter
            .report(FaultRecord::new(FaultContext::Admission, error));
    }

    fn handle_try(&self, result: QueueResult<bool>) -> bool {
        match result {
            Ok(admitted) => admitted,
            Err(error) => {
                self.report_admission(error);
                false
            }
        }
    }
}

impl<T: Send + 'static> Drop for WorkQueue<T> {
    fn drop(&mut self) {
        self.close();
    }
}
