//! Queue Error Types

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue is no longer accepting new items")]
    AddingCompleted,

    #[error("Queue has been closed")]
    Closed,

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
