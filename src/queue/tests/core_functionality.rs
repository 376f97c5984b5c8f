//! Core delivery and ordering behavior

use super::wait_until;
use crate::queue::api::WorkQueue;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

#[test]
fn test_fifo_order_with_single_worker() {
    let processed: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));

    let recorder = Arc::clone(&processed);
    let queue = WorkQueue::new(1, move |item: u32| {
        recorder.lock().unwrap().push(item);
        Ok(())
    })
    .unwrap();

    for item in 0..20 {
        queue.add(item);
    }
    queue.complete_adding();

    assert!(queue.completion().wait_blocking().succeeded());
    assert_eq!(*processed.lock().unwrap(), (0..20).collect::<Vec<_>>());
}

#[test]
fn test_exactly_once_delivery_across_workers() {
    let processed: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));

    let recorder = Arc::clone(&processed);
    let queue = WorkQueue::new(4, move |item: u32| {
        recorder.lock().unwrap().push(item);
        Ok(())
    })
    .unwrap();

    for item in 1..=100 {
        queue.add(item);
    }
    queue.complete_adding();

    assert!(queue.completion().wait_blocking().succeeded());

    // Every item delivered exactly once; cross-worker order is not asserted
    let mut seen = processed.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, (1..=100).collect::<Vec<_>>());
}

#[test]
fn test_capacity_accessors() {
    let bounded = WorkQueue::bounded(1, 5, |_: u32| Ok(())).unwrap();
    assert_eq!(bounded.capacity(), Some(5));

    let unbounded = WorkQueue::new(1, |_: u32| Ok(())).unwrap();
    assert_eq!(unbounded.capacity(), None);
    assert_eq!(unbounded.pending_count(), 0);
}

#[test]
fn test_snapshot_reflects_pending_items() {
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let gate = Mutex::new(gate_rx);

    let queue = WorkQueue::new(1, move |_item: u32| {
        // Hold the worker inside the invocation until released
        let _ = gate.lock().unwrap().recv();
        Ok(())
    })
    .unwrap();

    queue.add(1);
    // Wait for the worker to pull the first item, then stack up pending ones
    assert!(wait_until(Duration::from_secs(2), || {
        queue.active_workers() == 1
    }));
    queue.add(2);
    queue.add(3);
    queue.add(4);

    assert_eq!(queue.pending_count(), 3);
    assert_eq!(queue.snapshot(), vec![2, 3, 4]);

    for _ in 0..4 {
        gate_tx.send(()).unwrap();
    }
    queue.complete_adding();
    assert!(queue.completion().wait_blocking().succeeded());
    assert_eq!(queue.pending_count(), 0);
}
