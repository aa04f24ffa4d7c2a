//! Compiled statements and deferred parameter resolution.

use crate::{CompileError, CompileResult};
use std::collections::HashMap;
use std::fmt;
use tether_core::{Row, Value};
use tether_mutation::{Binding, NestedPath, PlanNodeId};

/// The statement form a plan node compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Insert,
    Update,
    Delete,
    Select,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Select => "select",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamSlot {
    /// Known at compile time.
    Bound(Value),
    /// Filled from an earlier statement's returned row.
    Deferred { node: PlanNodeId, column: String },
}

impl ParamSlot {
    pub fn is_deferred(&self) -> bool {
        matches!(self, ParamSlot::Deferred { .. })
    }
}

impl From<&Binding> for ParamSlot {
    fn from(binding: &Binding) -> Self {
        match binding {
            Binding::Literal(value) => ParamSlot::Bound(value.clone()),
            Binding::Pending { node, column } => ParamSlot::Deferred {
                node: *node,
                column: column.clone(),
            },
        }
    }
}

/// A rendered statement for one plan node.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    pub node: PlanNodeId,
    pub table: String,
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<ParamSlot>,
    /// Columns in the RETURNING (or SELECT) list, in order.
    pub returning: Vec<String>,
    /// Zero affected rows means the target was not found.
    pub expect_row: bool,
    /// Nested input path that produced this statement.
    pub path: NestedPath,
}

impl CompiledStatement {
    /// Whether the statement yields rows rather than an affected-row count.
    pub fn returns_rows(&self) -> bool {
        self.kind == StatementKind::Select || !self.returning.is_empty()
    }

    pub fn deferred_count(&self) -> usize {
        self.params.iter().filter(|p| p.is_deferred()).count()
    }
}

/// Statements of one request, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPlan {
    pub(crate) statements: Vec<CompiledStatement>,
    pub(crate) root: PlanNodeId,
}

impl CompiledPlan {
    pub fn statements(&self) -> &[CompiledStatement] {
        &self.statements
    }

    pub fn root(&self) -> PlanNodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statement(&self, node: PlanNodeId) -> Option<&CompiledStatement> {
        self.statements.iter().find(|s| s.node == node)
    }

    /// Final parameter values for `stmt`, reading deferred slots from the
    /// rows already returned by earlier statements.
    pub fn resolve(stmt: &CompiledStatement, results: &HashMap<PlanNodeId, Row>) -> CompileResult<Vec<Value>> {
        stmt.params
            .iter()
            .map(|slot| match slot {
                ParamSlot::Bound(value) => Ok(value.clone()),
                ParamSlot::Deferred { node, column } => results
                    .get(node)
                    .and_then(|row| row.get(column))
                    .cloned()
                    .ok_or_else(|| CompileError::unresolved_slot(*node, column)),
            })
            .collect()
    }
}
