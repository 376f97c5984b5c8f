//! Shared infrastructure for the queue internals

pub mod cancel;
pub mod sync;
