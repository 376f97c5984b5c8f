//! Test modules for the work queue
//!
//! Tests are organized by functional area. Most drive the full facade with
//! instrumented processing functions; a gate channel is used wherever a test
//! needs to hold a worker inside a processing invocation.

mod core_functionality;
mod edge_cases;

use std::time::{Duration, Instant};

/// Poll `condition` until it holds or `deadline` elapses
pub(crate) fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let started = Instant::now();
    while started.elapsed() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}
