//! Session error types.

use thiserror::Error;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// Mutation error.
    #[error("mutation error: {0}")]
    Mutation(#[from] tether_mutation::MutationError),

    /// Compilation error.
    #[error("compilation error: {0}")]
    Compile(#[from] tether_compiler::CompileError),

    /// Transaction error.
    #[error("transaction error: {0}")]
    Transaction(#[from] tether_transaction::TransactionError),

    /// A node identifier could not be produced.
    #[error("cannot identify row of {table}: {message}")]
    NodeId { table: String, message: String },
}

impl SessionError {
    pub fn node_id(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NodeId {
            table: table.into(),
            message: message.into(),
        }
    }

    /// True when the request was rejected before any statement ran.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Mutation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Transaction(err) if err.is_not_found())
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Transaction(err) if err.is_constraint_violation())
    }

    /// Nested input path of the failure, when it has one.
    pub fn path(&self) -> Option<String> {
        match self {
            Self::Mutation(err) => Some(err.path().to_string()),
            Self::Transaction(err) => err.path().map(|p| p.to_string()),
            _ => None,
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
