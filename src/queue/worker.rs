//! Worker pool draining the bounded store
//!
//! A coordination thread started at construction spawns `max_concurrency`
//! long-lived worker threads. Each worker pulls one item at a time (no
//! read-ahead) so slow items do not starve fairness among workers, and a
//! failure while processing one item never brings down sibling workers.
//! Only a failure in the coordination machinery itself ends the pool
//! abnormally.

use crate::core::cancel::CancellationToken;
use crate::faults::api::{FaultContext, FaultRecord, FaultReporter};
use crate::queue::completion::{CompletionOutcome, CompletionTracker};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::store::BoundedStore;
use crate::queue::types::ProcessResult;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Shared handle to the user-supplied processing function
pub(crate) type Processor<T> = Arc<dyn Fn(T) -> ProcessResult + Send + Sync>;

/// Error wrapper for a panic raised inside a processing invocation
#[derive(Debug)]
struct ProcessingPanic {
    message: String,
}

impl fmt::Display for ProcessingPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "processing panicked: {}", self.message)
    }
}

impl std::error::Error for ProcessingPanic {}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Running worker pool; observable state only, draining happens on the
/// spawned threads
pub(crate) struct WorkerPool {
    running: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Spawn the coordination thread and start draining
    pub(crate) fn start<T: Send + 'static>(
        label: &str,
        max_concurrency: usize,
        store: Arc<BoundedStore<T>>,
        processor: Processor<T>,
        reporter: Arc<FaultReporter>,
        tracker: CompletionTracker,
        shutdown: Option<CancellationToken>,
    ) -> QueueResult<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let active = Arc::new(AtomicUsize::new(0));

        let coordinator = Coordinator {
            label: label.to_string(),
            max_concurrency,
            store,
            processor,
            reporter,
            tracker,
            shutdown,
            running: Arc::clone(&running),
            active: Arc::clone(&active),
        };

        thread::Builder::new()
            .name(format!("{label}-coordinator"))
            .spawn(move || coordinator.run())
            .map_err(|error| QueueError::OperationFailed {
                message: format!("failed to spawn coordination thread: {error}"),
            })?;

        Ok(Self { running, active })
    }

    /// Whether the draining loop is still running
    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Number of workers currently inside a processing invocation
    pub(crate) fn active_workers(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }
}

struct Coordinator<T: Send + 'static> {
    label: String,
    max_concurrency: usize,
    store: Arc<BoundedStore<T>>,
    processor: Processor<T>,
    reporter: Arc<FaultReporter>,
    tracker: CompletionTracker,
    shutdown: Option<CancellationToken>,
    running: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

impl<T: Send + 'static> Coordinator<T> {
    fn run(self) {
        log::debug!(
            "worker pool '{}' started with {} workers",
            self.label,
            self.max_concurrency
        );

        let mut handles = Vec::with_capacity(self.max_concurrency);
        let mut faulted = false;

        for index in 0..self.max_concurrency {
            let store = Arc::clone(&self.store);
            let processor = Arc::clone(&self.processor);
            let reporter = Arc::clone(&self.reporter);
            let shutdown = self.shutdown.clone();
            let active = Arc::clone(&self.active);

            let handle = thread::Builder::new()
                .name(format!("{}-worker-{index}", self.label))
                .spawn(move || worker_loop(store, processor, reporter, shutdown, active));

            match handle {
                Ok(handle) => handles.push(handle),
                Err(error) => {
                    log::error!(
                        "worker pool '{}' failed to spawn worker {index}: {error}",
                        self.label
                    );
                    faulted = true;
                    break;
                }
            }
        }

        if faulted {
            // Fail fast: release blocked producers and let any workers that
            // did spawn observe the terminal store state
            self.store.close();
        }

        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    log::error!("worker pool '{}' worker failed: {error}", self.label);
                    faulted = true;
                }
                Err(_) => {
                    log::error!(
                        "worker pool '{}' worker panicked outside item processing",
                        self.label
                    );
                    faulted = true;
                }
            }
        }

        let outcome = if faulted {
            CompletionOutcome::Faulted
        } else if self
            .shutdown
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
        {
            CompletionOutcome::Canceled
        } else {
            CompletionOutcome::Succeeded
        };

        // An abnormal stop leaves nobody to drain the store; close it so
        // blocked producers fail fast instead of hanging
        if !outcome.succeeded() {
            self.store.close();
        }

        self.tracker.resolve(outcome);
        self.running.store(false, Ordering::Release);
        log::debug!("worker pool '{}' stopped ({:?})", self.label, outcome);
    }
}

/// Pull loop run by each worker thread
///
/// Returns `Ok(())` on a natural exit (store drained or pool cancelled);
/// `Err` only for a coordination failure such as a poisoned store lock.
fn worker_loop<T>(
    store: Arc<BoundedStore<T>>,
    processor: Processor<T>,
    reporter: Arc<FaultReporter>,
    shutdown: Option<CancellationToken>,
    active: Arc<AtomicUsize>,
) -> QueueResult<()> {
    log::trace!("worker started");
    loop {
        match store.next(shutdown.as_ref())? {
            Some(item) => {
                active.fetch_add(1, Ordering::Relaxed);
                let result = catch_unwind(AssertUnwindSafe(|| processor(item)));
                active.fetch_sub(1, Ordering::Relaxed);

                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(error)) => {
                        reporter.report(FaultRecord::new(FaultContext::Processing, error));
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        reporter.report(FaultRecord::new(
                            FaultContext::Processing,
                            ProcessingPanic { message },
                        ));
                    }
                }
            }
            None => {
                log::trace!("worker exiting");
                return Ok(());
            }
        }
    }
}
