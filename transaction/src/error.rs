//! Transaction error types.

use rusqlite::ErrorCode;
use tether_compiler::CompileError;
use tether_mutation::{MutationError, NestedPath};
use thiserror::Error;

/// Errors raised while executing a request.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// A connect, update or delete target does not exist.
    #[error("No matching row in {table} at {path}")]
    NotFound { path: NestedPath, table: String },

    /// The store rejected a write; the message is the store's own.
    #[error("Constraint violation at {path}: {message}")]
    ConstraintViolation { path: NestedPath, message: String },

    /// Any other store or connection failure.
    #[error("Store failure at {path}: {message}")]
    Transport { path: NestedPath, message: String },

    #[error("mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("compile error: {0}")]
    Compile(#[from] CompileError),
}

impl TransactionError {
    pub fn not_found(path: &NestedPath, table: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.clone(),
            table: table.into(),
        }
    }

    /// Classify a store error raised while handling `path`.
    pub fn from_sqlite(err: rusqlite::Error, path: &NestedPath) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message) if code.code == ErrorCode::ConstraintViolation => {
                Self::ConstraintViolation {
                    path: path.clone(),
                    message: message.clone().unwrap_or_else(|| err.to_string()),
                }
            }
            _ => Self::Transport {
                path: path.clone(),
                message: err.to_string(),
            },
        }
    }

    /// The nested input path the error points at; compile errors have none.
    pub fn path(&self) -> Option<&NestedPath> {
        match self {
            Self::NotFound { path, .. } | Self::ConstraintViolation { path, .. } | Self::Transport { path, .. } => {
                Some(path)
            }
            Self::Mutation(err) => Some(err.path()),
            Self::Compile(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
