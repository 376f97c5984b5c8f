//! Type definitions for the work queue
//!
//! Configuration and the processing-function signature shared between the
//! facade and the worker pool.

use crate::core::cancel::CancellationToken;
use crate::queue::error::{QueueError, QueueResult};
use std::error::Error;

/// Result returned by a processing invocation for one item
pub type ProcessResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Construction-time configuration for a [`crate::queue::WorkQueue`]
///
/// # Example
///
/// ```rust,no_run
/// use workpool::queue::api::QueueConfig;
///
/// let config = QueueConfig {
///     max_concurrency: 4,
///     capacity: Some(256),
///     ..QueueConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Label used in thread names and log lines
    pub label: String,
    /// Maximum number of workers processing items simultaneously
    pub max_concurrency: usize,
    /// Upper limit on pending items; `None` means unbounded
    pub capacity: Option<usize>,
    /// Optional pool-level token: once cancelled, workers stop pulling and
    /// the completion future resolves to `Canceled`
    pub shutdown: Option<CancellationToken>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            label: "workpool".to_string(),
            max_concurrency: 1,
            capacity: None,
            shutdown: None,
        }
    }
}

impl QueueConfig {
    pub(crate) fn validate(&self) -> QueueResult<()> {
        if self.max_concurrency == 0 {
            return Err(QueueError::InvalidConfig {
                message: "max_concurrency must be at least 1".to_string(),
            });
        }
        if self.capacity == Some(0) {
            return Err(QueueError::InvalidConfig {
                message: "capacity must be at least 1 when bounded".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = QueueConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.capacity, None);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config = QueueConfig {
            max_concurrency: 0,
            ..QueueConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(QueueError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = QueueConfig {
            capacity: Some(0),
            ..QueueConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(QueueError::InvalidConfig { .. })
        ));
    }
}
