//! Mutation error types.

use crate::NestedPath;
use thiserror::Error;

/// Result type for plan construction.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors raised while turning nested input into a plan.
///
/// All of them are raised before any statement exists, so a failing request
/// never touches the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    #[error("Invalid input at {path}: {message}")]
    Validation { path: NestedPath, message: String },

    #[error("Unknown table {table} at {path}")]
    UnknownTable { path: NestedPath, table: String },
}

impl MutationError {
    pub fn validation(path: &NestedPath, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.clone(),
            message: message.into(),
        }
    }

    pub fn unknown_table(path: &NestedPath, table: impl Into<String>) -> Self {
        Self::UnknownTable {
            path: path.clone(),
            table: table.into(),
        }
    }

    pub fn unknown_field(path: &NestedPath, owner: &str, field: &str) -> Self {
        Self::validation(&path.field(field), format!("Unknown field {} on {}", field, owner))
    }

    /// The nested path the error points at.
    pub fn path(&self) -> &NestedPath {
        match self {
            Self::Validation { path, .. } | Self::UnknownTable { path, .. } => path,
        }
    }
}
