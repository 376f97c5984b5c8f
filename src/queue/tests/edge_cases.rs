//! Edge cases: non-blocking probes, cancellation, invalid configuration

use super::wait_until;
use crate::queue::api::{
    CancellationToken, CompletionOutcome, FaultContext, QueueConfig, QueueError, WorkQueue,
};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Queue whose single worker parks at a gate inside each invocation
fn gated_queue(processed: Arc<Mutex<Vec<u32>>>) -> (Arc<WorkQueue<u32>>, mpsc::Sender<()>) {
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let gate = Mutex::new(gate_rx);
    let queue = WorkQueue::bounded(1, 1, move |item: u32| {
        let _ = gate.lock().unwrap().recv();
        processed.lock().unwrap().push(item);
        Ok(())
    })
    .unwrap();
    (Arc::new(queue), gate_tx)
}

#[test]
fn test_try_add_probe_on_full_queue_returns_false_immediately() {
    let processed = Arc::new(Mutex::new(Vec::new()));
    let (queue, gate_tx) = gated_queue(Arc::clone(&processed));

    // Worker holds item 0; item 1 fills the single slot
    queue.add(0);
    assert!(wait_until(Duration::from_secs(2), || {
        queue.active_workers() == 1
    }));
    assert!(queue.try_add(1));

    let started = Instant::now();
    assert!(!queue.try_add(2));
    assert!(
        started.elapsed() < Duration::from_millis(50),
        "zero-timeout probe must not block"
    );

    gate_tx.send(()).unwrap();
    gate_tx.send(()).unwrap();
    queue.complete_adding();
    assert!(queue.completion().wait_blocking().succeeded());
    assert_eq!(*processed.lock().unwrap(), vec![0, 1]);
}

#[test]
fn test_try_add_for_waits_out_the_timeout() {
    let processed = Arc::new(Mutex::new(Vec::new()));
    let (queue, gate_tx) = gated_queue(Arc::clone(&processed));

    queue.add(0);
    assert!(wait_until(Duration::from_secs(2), || {
        queue.active_workers() == 1
    }));
    assert!(queue.try_add(1));

    let started = Instant::now();
    assert!(!queue.try_add_for(2, Duration::from_millis(80)));
    assert!(started.elapsed() >= Duration::from_millis(80));

    gate_tx.send(()).unwrap();
    gate_tx.send(()).unwrap();
    queue.complete_adding();
    assert!(queue.completion().wait_blocking().succeeded());
}

#[test]
fn test_cancellation_aborts_only_the_blocked_add() {
    let processed = Arc::new(Mutex::new(Vec::new()));
    let (queue, gate_tx) = gated_queue(Arc::clone(&processed));
    let mut fault_rx = queue.subscribe_faults("edge-test".to_string());

    queue.add(0);
    assert!(wait_until(Duration::from_secs(2), || {
        queue.active_workers() == 1
    }));
    assert!(queue.try_add(1));

    let token = CancellationToken::new();
    let producer_token = token.clone();
    let producer_queue = Arc::clone(&queue);
    let producer = thread::spawn(move || {
        producer_queue.add_with_token(2, &producer_token);
    });

    thread::sleep(Duration::from_millis(50));
    token.cancel();
    producer.join().unwrap();

    let record = fault_rx.blocking_recv().expect("admission fault expected");
    assert_eq!(record.context, FaultContext::Admission);
    assert!(record.error.to_string().to_lowercase().contains("cancelled"));

    // The queue keeps operating for everyone else
    gate_tx.send(()).unwrap();
    gate_tx.send(()).unwrap();
    queue.complete_adding();
    assert!(queue.completion().wait_blocking().succeeded());
    assert_eq!(*processed.lock().unwrap(), vec![0, 1]);
}

#[test]
fn test_pool_shutdown_token_resolves_canceled() {
    let token = CancellationToken::new();
    let config = QueueConfig {
        max_concurrency: 2,
        shutdown: Some(token.clone()),
        ..QueueConfig::default()
    };
    let queue = WorkQueue::with_config(config, |_: u32| {
        thread::sleep(Duration::from_millis(5));
        Ok(())
    })
    .unwrap();

    for item in 0..50 {
        queue.add(item);
    }

    // No complete_adding: cancellation alone must stop the pool
    token.cancel();
    assert_eq!(
        queue.completion().wait_blocking(),
        CompletionOutcome::Canceled
    );
    assert!(wait_until(Duration::from_secs(2), || !queue.is_running()));
}

#[test]
fn test_invalid_configurations_are_rejected() {
    let zero_workers = WorkQueue::with_config(
        QueueConfig {
            max_concurrency: 0,
            ..QueueConfig::default()
        },
        |_: u32| Ok(()),
    );
    assert!(matches!(
        zero_workers,
        Err(QueueError::InvalidConfig { .. })
    ));

    let zero_capacity = WorkQueue::with_config(
        QueueConfig {
            capacity: Some(0),
            ..QueueConfig::default()
        },
        |_: u32| Ok(()),
    );
    assert!(matches!(
        zero_capacity,
        Err(QueueError::InvalidConfig { .. })
    ));
}

#[test]
fn test_unbounded_add_never_blocks_producers() {
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let gate = Mutex::new(gate_rx);
    let queue = WorkQueue::new(1, move |_: u32| {
        let _ = gate.lock().unwrap().recv();
        Ok(())
    })
    .unwrap();

    for item in 0..100 {
        queue.add(item);
    }
    // The single worker holds at most one item; the rest are pending
    assert!(queue.pending_count() >= 99);

    drop(gate_tx); // releases the worker for every remaining item
    queue.complete_adding();
    assert!(queue.completion().wait_blocking().succeeded());
}
