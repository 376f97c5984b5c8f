//! Fault record types
//!
//! A fault record is a wrapped, contextualized representation of an error
//! caught at one of the two recovery boundaries of the queue. Records have
//! no lifecycle of their own; they are emitted transiently to the reporter.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Boundary at which a fault was caught
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultContext {
    /// Raised while trying to admit an item into the store
    Admission,
    /// Raised by the user-supplied processing function for a single item
    Processing,
}

impl fmt::Display for FaultContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultContext::Admission => write!(f, "add failure"),
            FaultContext::Processing => write!(f, "processing failure"),
        }
    }
}

/// A single caught failure, forwarded to fault subscribers
///
/// The original error is Arc-wrapped so the record can be fanned out to any
/// number of subscribers without cloning the error itself.
#[derive(Debug, Clone)]
pub struct FaultRecord {
    /// Which boundary caught the error
    pub context: FaultContext,
    /// The original caught error
    pub error: Arc<dyn Error + Send + Sync>,
    /// When the fault was caught
    pub timestamp: SystemTime,
}

impl FaultRecord {
    pub fn new(
        context: FaultContext,
        error: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            context,
            error: Arc::from(error.into()),
            timestamp: SystemTime::now(),
        }
    }
}

impl fmt::Display for FaultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.error)
    }
}
