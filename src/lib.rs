//! Bounded producer/consumer work queue.
//!
//! Items enqueued from any number of producer threads are drained by a
//! fixed-size pool of worker threads that invoke a user-supplied processing
//! function. A bounded store applies backpressure to producers, per-item
//! failures are isolated and reported out-of-band, and a single-assignment
//! completion future resolves once the pool has permanently stopped.
//!
//! The public surface lives in [`queue::api`] and [`faults::api`].

pub mod core;
pub mod faults;
pub mod queue;
