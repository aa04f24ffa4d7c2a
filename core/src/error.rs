//! Core error types.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while moving a scalar between its wire and storage shapes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("Type mismatch: expected {expected}, got {actual}")]
    Mismatch {
        expected: &'static str,
        actual: String,
    },

    #[error("Invalid {codec} value: {message}")]
    Invalid {
        codec: &'static str,
        message: String,
    },
}

impl CodecError {
    pub fn mismatch(expected: &'static str, actual: impl Into<String>) -> Self {
        Self::Mismatch {
            expected,
            actual: actual.into(),
        }
    }

    pub fn invalid(codec: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            codec,
            message: message.into(),
        }
    }
}

/// Name of a JSON value's shape, used in mismatch diagnostics.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
