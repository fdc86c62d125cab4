use crate::models::LifecycleState;

/// Lifecycle orchestration errors.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("invalid transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    #[error("specialist executor timed out after {timeout_ms}ms")]
    ExecutorTimeout { timeout_ms: u64 },

    #[error("specialist executor failed: {reason}")]
    ExecutorFailure { reason: String },

    #[error("max retries exceeded: {retries}")]
    MaxRetriesExceeded { retries: u32 },
}
