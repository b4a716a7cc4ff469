//! Core domain errors.

use thiserror::Error;

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core domain errors for streamrun.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A required parameter is not present in the task config.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// A parameter is present but cannot be converted to the requested type.
    #[error("Parameter '{name}' has invalid value '{value}': expected {expected}")]
    Conversion {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// A parameter converted fine but violates a constraint.
    #[error("Invalid parameter '{name}': {reason}")]
    Validation { name: String, reason: String },

    /// Parameter name not accepted by this task type.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// Task has no executor configured, so it cannot be launched.
    #[error("Executor name required for task {0}")]
    MissingExecutor(String),

    /// Task is in a lifecycle state that does not permit a launch.
    #[error("Task {task} cannot be launched while {state}")]
    NotLaunchable { task: String, state: String },

    /// Invalid state transition.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
