//! Main compiler implementation.

use crate::sql::SqlWriter;
use crate::{CompileError, CompileResult, CompiledPlan, CompiledStatement, StatementKind};
use tether_catalog::{Catalog, TableDescriptor};
use tether_mutation::{Bindings, MutationPlan, PlanNode, PlanOperation};
use tracing::debug;

/// Compiles plans against one catalog.
pub struct Compiler<'c> {
    catalog: &'c Catalog,
}

impl<'c> Compiler<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Compile every node of `plan`, in dependency order.
    pub fn compile(&self, plan: &MutationPlan) -> CompileResult<CompiledPlan> {
        let root = plan.root().ok_or(CompileError::EmptyPlan)?.id;

        let mut statements = Vec::with_capacity(plan.len());
        for id in plan.ordered()? {
            let node = plan.node(id).ok_or(CompileError::EmptyPlan)?;
            let stmt = self.compile_node(node)?;
            debug!(node = %stmt.node, table = %stmt.table, kind = %stmt.kind, sql = %stmt.sql, "compiled statement");
            statements.push(stmt);
        }

        Ok(CompiledPlan { statements, root })
    }

    fn compile_node(&self, node: &PlanNode) -> CompileResult<CompiledStatement> {
        let table = self
            .catalog
            .table(&node.table)
            .ok_or_else(|| CompileError::UnknownTable {
                node: node.id,
                table: node.table.clone(),
            })?;

        for column in node
            .operation
            .bindings()
            .map(|(c, _)| c)
            .chain(node.returning.iter())
        {
            if !table.has_attr(column) {
                return Err(CompileError::unknown_column(node.id, &table.name, column));
            }
        }

        let returning: Vec<String> = node.returning.iter().cloned().collect();
        let mut w = SqlWriter::new();

        let kind = match &node.operation {
            PlanOperation::Insert { values } => {
                w.push("INSERT INTO ").ident(&table.name);
                if values.is_empty() {
                    w.push(" DEFAULT VALUES");
                } else {
                    w.push(" (").ident_list(values.iter().map(|(c, _)| c.as_str())).push(") VALUES (");
                    for (i, (_, binding)) in values.iter().enumerate() {
                        if i > 0 {
                            w.push(", ");
                        }
                        w.param(binding);
                    }
                    w.push(")");
                }
                StatementKind::Insert
            }
            PlanOperation::Update { assignments, predicate } => {
                let first = self.keyed(node, table, predicate)?;
                w.push("UPDATE ").ident(&table.name).push(" SET ");
                if assignments.is_empty() {
                    // Still touches the row, so absence is detected.
                    w.ident(first).push(" = ").ident(first);
                } else {
                    w.assignments(assignments, ", ");
                }
                w.push(" WHERE ").assignments(predicate, " AND ");
                StatementKind::Update
            }
            PlanOperation::Delete { predicate } => {
                self.keyed(node, table, predicate)?;
                w.push("DELETE FROM ").ident(&table.name);
                w.push(" WHERE ").assignments(predicate, " AND ");
                StatementKind::Delete
            }
            PlanOperation::Lookup { predicate } => {
                self.keyed(node, table, predicate)?;
                w.push("SELECT ");
                if returning.is_empty() {
                    w.push("1");
                } else {
                    w.ident_list(returning.iter().map(String::as_str));
                }
                w.push(" FROM ").ident(&table.name);
                w.push(" WHERE ").assignments(predicate, " AND ").push(" LIMIT 1");
                StatementKind::Select
            }
        };

        if kind != StatementKind::Select && !returning.is_empty() {
            w.push(" RETURNING ").ident_list(returning.iter().map(String::as_str));
        }

        let (sql, params) = w.finish();
        Ok(CompiledStatement {
            node: node.id,
            table: table.name.clone(),
            kind,
            sql,
            params,
            returning,
            expect_row: node.expects_row(),
            path: node.path.clone(),
        })
    }

    /// First predicate column; unkeyed writes are refused.
    fn keyed<'p>(&self, node: &PlanNode, table: &TableDescriptor, predicate: &'p Bindings) -> CompileResult<&'p str> {
        predicate
            .first()
            .map(|(c, _)| c.as_str())
            .ok_or_else(|| CompileError::EmptyPredicate {
                node: node.id,
                table: table.name.clone(),
            })
    }
}

/// Compile `plan` against `catalog`.
pub fn compile(plan: &MutationPlan, catalog: &Catalog) -> CompileResult<CompiledPlan> {
    Compiler::new(catalog).compile(plan)
}
