//! Scenario error types.

use thiserror::Error;

/// Errors raised while running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("step '{step}' failed: {message}")]
    AssertionFailed { step: String, message: String },

    #[error("setup failed: {0}")]
    Setup(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl ScenarioError {
    pub fn assertion_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            message: message.into(),
        }
    }
}

/// Result type for scenarios.
pub type ScenarioResult<T> = Result<T, ScenarioError>;
