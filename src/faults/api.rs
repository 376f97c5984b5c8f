//! Public API for the fault reporting system
//!
//! External modules should import from here rather than directly from
//! internal modules.

pub use crate::faults::record::{FaultContext, FaultRecord};
pub use crate::faults::reporter::FaultReporter;
