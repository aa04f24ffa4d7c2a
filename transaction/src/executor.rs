//! Executor: runs a compiled plan in one SQLite transaction.

use crate::{ExecutorOptions, MutationOutcome, StatementOutcome, TransactionError, TransactionResult};
use rusqlite::{params_from_iter, Connection, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::time::Duration;
use tether_compiler::{CompiledPlan, CompiledStatement};
use tether_core::{Row, Value};
use tether_mutation::{NestedPath, PlanNodeId};
use tracing::{debug, info, trace};

/// Executes compiled plans.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    options: ExecutorOptions,
}

impl Executor {
    pub fn new(options: ExecutorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    /// Run every statement of `plan` and commit.
    ///
    /// Statements run one at a time in plan order. On any failure the
    /// transaction is dropped, which rolls it back, and the error is returned.
    pub fn run(&self, conn: &mut Connection, plan: &CompiledPlan) -> TransactionResult<MutationOutcome> {
        let root_path = NestedPath::root();
        let sql_err = |e| TransactionError::from_sqlite(e, &root_path);

        conn.busy_timeout(Duration::from_millis(self.options.busy_timeout_ms))
            .map_err(sql_err)?;
        if self.options.enforce_foreign_keys {
            // No effect inside a transaction, so it goes first.
            conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(sql_err)?;
        }

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(sql_err)?;

        let mut rows: HashMap<PlanNodeId, Row> = HashMap::new();
        let mut results = Vec::with_capacity(plan.len());

        for stmt in plan.statements() {
            match dispatch(&tx, stmt, &rows) {
                Ok(outcome) => {
                    if let Some(row) = &outcome.row {
                        rows.insert(stmt.node, row.clone());
                    }
                    results.push(outcome);
                }
                Err(err) => {
                    info!(
                        executed = results.len(),
                        failed = %stmt.path,
                        error = %err,
                        "mutation rolled back"
                    );
                    return Err(err);
                }
            }
        }

        tx.commit().map_err(sql_err)?;
        info!(statements = results.len(), "mutation committed");

        let root_table = plan
            .statement(plan.root())
            .map(|s| s.table.clone())
            .unwrap_or_default();
        Ok(MutationOutcome {
            root_table,
            root: rows.remove(&plan.root()).unwrap_or_default(),
            statements_executed: results.len(),
            results,
        })
    }
}

fn dispatch(
    tx: &Transaction<'_>,
    stmt: &CompiledStatement,
    rows: &HashMap<PlanNodeId, Row>,
) -> TransactionResult<StatementOutcome> {
    let sql_err = |e| TransactionError::from_sqlite(e, &stmt.path);

    let params = CompiledPlan::resolve(stmt, rows)?;
    trace!(node = %stmt.node, params = params.len(), deferred = stmt.deferred_count(), "resolved parameters");
    debug!(table = %stmt.table, kind = %stmt.kind, sql = %stmt.sql, "dispatching statement");

    let mut prepared = tx.prepare_cached(&stmt.sql).map_err(sql_err)?;

    let (row, affected) = if stmt.returns_rows() {
        let mut returned = prepared.query(params_from_iter(params.iter())).map_err(sql_err)?;
        match returned.next().map_err(sql_err)? {
            Some(r) => {
                let mut row = Row::new();
                for (i, column) in stmt.returning.iter().enumerate() {
                    let value: Value = r.get(i).map_err(sql_err)?;
                    row.insert(column.clone(), value);
                }
                (Some(row), 1)
            }
            None => (None, 0),
        }
    } else {
        let affected = prepared.execute(params_from_iter(params.iter())).map_err(sql_err)?;
        (None, affected)
    };

    if stmt.expect_row && affected == 0 {
        return Err(TransactionError::not_found(&stmt.path, &stmt.table));
    }

    Ok(StatementOutcome {
        node: stmt.node,
        table: stmt.table.clone(),
        kind: stmt.kind,
        row,
        affected,
    })
}
