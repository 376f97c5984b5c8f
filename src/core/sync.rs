//! Synchronization utilities for robust lock handling
//!
//! The queue internals use standard library mutexes, condition variables and
//! read/write locks. A panic while one of those is held poisons the lock;
//! these helpers convert poison errors into application errors so callers can
//! propagate them with `?` instead of panicking in turn.

use std::sync::{LockResult, RwLockReadGuard, RwLockWriteGuard};

/// Handle poisoned mutex cases with consistent error handling
///
/// Converts a poison error from `Mutex::lock`, `Condvar::wait` or
/// `Condvar::wait_timeout` (all of which return [`LockResult`]) into an
/// application-specific error using the provided constructor.
///
/// # Arguments
/// * `result` - The result from a lock or condvar wait operation
/// * `error_constructor` - Function to create the appropriate error type
///
/// # Returns
/// The guard (or guard/timeout pair) on success, or an application error on
/// poison
pub fn handle_mutex_poison<T, E>(
    result: LockResult<T>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<T, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (mutex poisoned). This indicates a panic occurred while holding a lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

/// Handle poisoned RwLock read operations with consistent error handling
///
/// RwLocks become poisoned when a writer panics while holding the lock.
pub fn handle_rwlock_read<T, E>(
    result: LockResult<RwLockReadGuard<T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockReadGuard<T>, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (RwLock read poisoned). This indicates a panic occurred while holding a write lock. PoisonError: {:?}",
            poison_err
        ))
    })
}

/// Handle poisoned RwLock write operations with consistent error handling
pub fn handle_rwlock_write<T, E>(
    result: LockResult<RwLockWriteGuard<T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<RwLockWriteGuard<T>, E> {
    result.map_err(|poison_err| {
        error_constructor(format!(
            "Internal synchronisation error (RwLock write poisoned). This indicates a panic occurred while holding the lock. PoisonError: {:?}",
            poison_err
        ))
    })
}
