//! Fault Reporting Component
//!
//! Every error caught at the admission or processing boundary of the work
//! queue is wrapped into a [`record::FaultRecord`] and handed to the
//! [`reporter::FaultReporter`] instead of being re-thrown to the thread that
//! raised it. Callers who want to observe failures must subscribe; with no
//! subscribers a record is dropped silently.

// Internal modules - all access should go through the api module
pub(crate) mod record;
pub(crate) mod reporter;

// Public API module - the only public interface for the fault system
pub mod api;
