//! Public API for the work queue
//!
//! This module provides the complete public API for the bounded
//! producer/consumer queue. External modules should import from here rather
//! than directly from internal modules. See the module documentation for
//! usage examples and architecture details.

// Core queue components
pub use crate::queue::manager::WorkQueue;
pub use crate::queue::store::BoundedStore;

// Configuration and the processing signature
pub use crate::queue::types::{ProcessResult, QueueConfig};

// Completion observation
pub use crate::queue::completion::{Completion, CompletionOutcome};

// Cancellation of blocked admissions and of the pool as a whole
pub use crate::core::cancel::CancellationToken;

// Fault observation
pub use crate::faults::api::{FaultContext, FaultRecord, FaultReporter};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult};
