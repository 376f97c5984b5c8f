//! FaultReporter implementation
//!
//! Fan-out notification channel for caught fault records. Subscription takes
//! two forms: synchronous callbacks invoked on whatever thread caught the
//! fault, and channel subscriptions drained at the subscriber's own pace.
//! Reporting never alters control flow of the producer or worker that raised
//! the fault, and never panics outward.

use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};
use crate::faults::record::FaultRecord;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::RwLock;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

type FaultCallback = Box<dyn Fn(&FaultRecord) + Send + Sync>;

struct ChannelSubscriber {
    source: String,
    sender: UnboundedSender<FaultRecord>,
}

/// Fan-out sink for fault records
///
/// # Thread Safety
///
/// Fully thread-safe; `report` may be called concurrently from producer and
/// worker threads while subscriptions are added or removed.
#[derive(Default)]
pub struct FaultReporter {
    callbacks: RwLock<Vec<FaultCallback>>,
    subscribers: RwLock<HashMap<String, ChannelSubscriber>>,
}

impl FaultReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous callback invoked for every reported fault
    ///
    /// The callback runs on the thread that caught the fault (a producer
    /// thread for admission faults, a worker thread for processing faults)
    /// and should return quickly. A panicking callback is contained and does
    /// not affect the reporting thread or other callbacks.
    pub fn on_fault(&self, callback: impl Fn(&FaultRecord) + Send + Sync + 'static) {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.push(Box::new(callback));
        }
    }

    /// Subscribe to fault records through an unbounded channel
    ///
    /// Returns a receiver the subscriber drains at its own pace. Closed
    /// receivers are pruned lazily on the next report.
    pub fn subscribe(&self, subscriber_id: String, source: String) -> UnboundedReceiver<FaultRecord> {
        let (sender, receiver) = unbounded_channel();

        let subscriber = ChannelSubscriber {
            source: source.clone(),
            sender,
        };

        if let Ok(mut subscribers) = self.subscribers.write() {
            // Warn if overwriting an existing subscriber
            if let Some(existing) = subscribers.insert(subscriber_id.clone(), subscriber) {
                log::warn!(
                    "Fault subscriber '{}' replaced existing subscription (source: {} -> {})",
                    subscriber_id,
                    existing.source,
                    source
                );
            }
        }

        receiver
    }

    /// Remove a channel subscription; returns true if it existed
    pub fn unsubscribe(&self, subscriber_id: &str) -> bool {
        self.subscribers
            .write()
            .map(|mut subscribers| subscribers.remove(subscriber_id).is_some())
            .unwrap_or(false)
    }

    pub fn subscriber_count(&self) -> usize {
        let callbacks = self.callbacks.read().map(|c| c.len()).unwrap_or(0);
        let channels = self.subscribers.read().map(|s| s.len()).unwrap_or(0);
        callbacks + channels
    }

    /// Report a fault record to all subscribers
    ///
    /// Invoked synchronously from whichever thread encountered the fault.
    /// Must never panic: callback panics are caught and the poisoned-lock
    /// fallback is to drop the record. With no subscribers the record is
    /// dropped after a trace log.
    pub fn report(&self, record: FaultRecord) {
        let mut delivered = false;

        if let Ok(callbacks) = handle_rwlock_read(self.callbacks.read(), |message| {
            log::error!("fault reporter callback lock poisoned: {message}");
        }) {
            for callback in callbacks.iter() {
                delivered = true;
                if catch_unwind(AssertUnwindSafe(|| callback(&record))).is_err() {
                    log::warn!("fault callback panicked while handling: {record}");
                }
            }
        }

        let mut closed: Vec<String> = Vec::new();
        if let Ok(subscribers) = handle_rwlock_read(self.subscribers.read(), |message| {
            log::error!("fault reporter subscriber lock poisoned: {message}");
        }) {
            for (id, subscriber) in subscribers.iter() {
                if subscriber.sender.send(record.clone()).is_ok() {
                    delivered = true;
                } else {
                    closed.push(id.clone());
                }
            }
        }

        // Prune subscribers whose receiver side has been dropped
        if !closed.is_empty() {
            if let Ok(mut subscribers) = handle_rwlock_write(self.subscribers.write(), |message| {
                log::error!("fault reporter subscriber lock poisoned: {message}");
            }) {
                for id in closed {
                    subscribers.remove(&id);
                    log::trace!("pruned closed fault subscriber '{id}'");
                }
            }
        }

        if !delivered {
            log::trace!("fault dropped (no subscribers): {record}");
        }
    }
}
