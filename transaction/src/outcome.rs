//! Results of an executed request.

use serde_json::{Map, Value as Json};
use tether_catalog::Catalog;
use tether_compiler::StatementKind;
use tether_core::Row;
use tether_mutation::PlanNodeId;

/// What one statement did.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementOutcome {
    pub node: PlanNodeId,
    pub table: String,
    pub kind: StatementKind,
    /// The returned row, when the statement returns one.
    pub row: Option<Row>,
    /// Rows affected (or found, for selects).
    pub affected: usize,
}

/// Outcome of a committed request.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    pub root_table: String,
    /// Columns of the root row the caller asked for.
    pub root: Row,
    pub results: Vec<StatementOutcome>,
    pub statements_executed: usize,
}

impl MutationOutcome {
    /// The root row as JSON, each column decoded through its codec.
    pub fn root_json(&self, catalog: &Catalog) -> Json {
        let table = catalog.table(&self.root_table);
        let object: Map<String, Json> = self
            .root
            .iter()
            .map(|(column, value)| {
                let json = match table.and_then(|t| t.attr(column)) {
                    Some(attr) => attr.codec.to_json(value),
                    None => value.to_json(),
                };
                (column.clone(), json)
            })
            .collect();
        Json::Object(object)
    }

    /// Statements run against `table`.
    pub fn statements_for<'s>(&'s self, table: &'s str) -> impl Iterator<Item = &'s StatementOutcome> + 's {
        self.results.iter().filter(move |r| r.table == table)
    }
}
