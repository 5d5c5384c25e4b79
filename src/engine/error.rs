//! Engine error taxonomy
//!
//! Every failure in the core is local to one model or one task and is
//! returned to the immediate caller. Nothing here terminates the process.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by model handles, the registry and the scheduler
#[derive(Debug, Error)]
pub enum EngineError {
    /// The artifact is missing or malformed, or the execution context
    /// could not be built
    #[error("Failed to initialize model from {path}: {reason}")]
    InitializationFailure {
        /// Artifact path
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Inference attempted on a handle that is not ready
    #[error("Model not initialized: {0}")]
    NotInitialized(String),

    /// Input length disagrees with the model's declared input size
    #[error("Input shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch {
        /// Declared input size
        expected: usize,
        /// Length of the supplied input
        actual: usize,
    },

    /// No model registered under this name
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The backend invocation itself failed
    #[error("Inference failed: {0}")]
    RuntimeExecutionFailure(String),

    /// A model is already registered under this name
    #[error("Model already loaded: {0}")]
    DuplicateName(String),

    /// The inference queue reached its capacity bound
    #[error("Inference queue full: capacity {capacity}")]
    QueueFull {
        /// Configured capacity
        capacity: usize,
    },

    /// The scheduler no longer accepts work
    #[error("Scheduler stopped")]
    SchedulerStopped,

    /// Operation not allowed in the current lifecycle state
    #[error("Invalid scheduler state: {0}")]
    InvalidState(String),
}

impl EngineError {
    /// Stable machine-readable kind, used on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InitializationFailure { .. } => "initialization_failure",
            EngineError::NotInitialized(_) => "not_initialized",
            EngineError::ShapeMismatch { .. } => "shape_mismatch",
            EngineError::ModelNotFound(_) => "model_not_found",
            EngineError::RuntimeExecutionFailure(_) => "runtime_execution_failure",
            EngineError::DuplicateName(_) => "duplicate_name",
            EngineError::QueueFull { .. } => "queue_full",
            EngineError::SchedulerStopped => "scheduler_stopped",
            EngineError::InvalidState(_) => "invalid_state",
        }
    }

    pub(crate) fn init(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        EngineError::InitializationFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_stable() {
        assert_eq!(
            EngineError::ModelNotFound("m".into()).kind(),
            "model_not_found"
        );
        assert_eq!(
            EngineError::ShapeMismatch {
                expected: 4,
                actual: 3
            }
            .kind(),
            "shape_mismatch"
        );
        assert_eq!(EngineError::SchedulerStopped.kind(), "scheduler_stopped");
    }

    #[test]
    fn test_display_includes_context() {
        let err = EngineError::init("/models/a.json", "missing weights");
        let msg = err.to_string();
        assert!(msg.contains("/models/a.json"));
        assert!(msg.contains("missing weights"));
    }
}
