//! Bounded Producer/Consumer Work Queue
//!
//! A thread-safe queue that accepts items from arbitrary producer threads
//! and drains them with a fixed degree of parallel workers. Key properties:
//!
//! - **Backpressure**: a bounded queue blocks (or fails a bounded-try
//!   admission) once the capacity limit is reached
//! - **Fault isolation**: one failing item never aborts the others; every
//!   caught failure is routed to the fault reporter
//! - **Completion future**: a single-assignment future resolves once the
//!   pool has permanently stopped
//! - **At-most-once**: every admitted item is handed to the processing
//!   function at most once, FIFO under single concurrency
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Producer A  │     │  Producer B  │     │  Producer C  │
//! └──────┬───────┘     └──────┬───────┘     └──────┬───────┘
//!        │ add                │ add                │ try_add
//!        ▼                    ▼                    ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                     WorkQueue (facade)                  │
//! │  ┌─────────────────────────────────────────────────┐    │
//! │  │        BoundedStore (FIFO, backpressure)        │    │
//! │  │  ┌───┬───┬───┬───┬───┬───┬───┬───┬───┬───┐     │    │
//! │  │  │ 1 │ 2 │ 3 │ 4 │ 5 │ 6 │ 7 │ 8 │ 9 │...│     │    │
//! │  │  └───┴───┴───┴───┴───┴───┴───┴───┴───┴───┘     │    │
//! │  └───────┼─────────────┼─────────────┼────────────┘    │
//! │          │ pull        │ pull        │ pull            │
//! │    ┌─────┴────┐  ┌─────┴────┐  ┌─────┴────┐            │
//! │    │ Worker 0 │  │ Worker 1 │  │ Worker N │ ──► faults │
//! │    └──────────┘  └──────────┘  └──────────┘            │
//! │          └─────────────┴─────────────┘                 │
//! │                 coordination thread ──► Completion     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use workpool::queue::api::WorkQueue;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Four workers, at most 100 pending items
//! let queue = WorkQueue::bounded(4, 100, |item: u32| {
//!     println!("processing {item}");
//!     Ok(())
//! })?;
//!
//! // Failures are only visible to subscribers
//! queue.on_fault(|record| eprintln!("{record}"));
//!
//! for item in 0..1000 {
//!     queue.add(item);
//! }
//!
//! queue.complete_adding();
//! assert!(queue.completion().wait_blocking().succeeded());
//! queue.close();
//! # Ok(())
//! # }
//! ```

mod completion;
mod error;
mod manager;
mod store;
mod types;
mod worker;

pub mod api;

pub use completion::{Completion, CompletionOutcome};
pub use error::{QueueError, QueueResult};
pub use manager::WorkQueue;
pub use store::BoundedStore;
pub use types::{ProcessResult, QueueConfig};

#[cfg(test)]
mod tests;
