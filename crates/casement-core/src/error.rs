//! Error types for the consumer runtime.

/// Result type alias for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors reported by a consumer scheduler when handing off work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// The scheduler no longer accepts tasks.
    #[error("consumer scheduler has been shut down")]
    ShutDown,

    /// The scheduler's queue is at capacity.
    #[error("consumer scheduler queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// A blocking task was discarded before it ran.
    #[error("blocking task was dropped before it completed")]
    TaskDropped,
}

impl SchedulerError {
    /// Create a queue-full error.
    pub fn queue_full(capacity: usize) -> Self {
        Self::QueueFull { capacity }
    }

    /// Whether retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::QueueFull { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            SchedulerError::ShutDown.to_string(),
            "consumer scheduler has been shut down"
        );
        assert_eq!(
            SchedulerError::queue_full(8).to_string(),
            "consumer scheduler queue is full (capacity 8)"
        );
    }

    #[test]
    fn test_is_transient() {
        assert!(SchedulerError::queue_full(1).is_transient());
        assert!(!SchedulerError::ShutDown.is_transient());
        assert!(!SchedulerError::TaskDropped.is_transient());
    }
}
