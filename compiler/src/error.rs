//! Compiler error types.

use tether_mutation::{MutationError, PlanNodeId};
use thiserror::Error;

/// Errors that can occur while compiling or resolving a plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The plan itself is inconsistent.
    #[error("Plan error: {0}")]
    Plan(#[from] MutationError),

    #[error("Plan has no root node")]
    EmptyPlan,

    #[error("Unknown table '{table}' in plan node {node}")]
    UnknownTable { node: PlanNodeId, table: String },

    #[error("Unknown column '{column}' of '{table}' in plan node {node}")]
    UnknownColumn {
        node: PlanNodeId,
        table: String,
        column: String,
    },

    /// Updates, deletes and lookups must be keyed.
    #[error("Plan node {node} on '{table}' has no predicate")]
    EmptyPredicate { node: PlanNodeId, table: String },

    /// A deferred parameter's producer has not returned the column.
    #[error("Column '{column}' of plan node {node} is not available")]
    UnresolvedSlot { node: PlanNodeId, column: String },
}

impl CompileError {
    pub fn unknown_column(node: PlanNodeId, table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            node,
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn unresolved_slot(node: PlanNodeId, column: impl Into<String>) -> Self {
        Self::UnresolvedSlot {
            node,
            column: column.into(),
        }
    }
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
