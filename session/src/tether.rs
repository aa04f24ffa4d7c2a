//! The Tether facade.

use crate::{SessionError, SessionResult, TetherConfig};
use rusqlite::Connection;
use serde_json::Value as Json;
use std::sync::Arc;
use tether_catalog::{Catalog, JsonNodeIdCodec, NodeIdCodec};
use tether_compiler::{CompiledPlan, Compiler};
use tether_core::Row;
use tether_mutation::{MutationRequest, PlanBuilder};
use tether_registry::{Registry, RegistryBuilder};
use tether_transaction::{Executor, MutationOutcome};
use tracing::debug;

/// Shared, immutable mutation entry point for one catalog.
///
/// Cloning is cheap; clones share the catalog and registry.
#[derive(Clone)]
pub struct Tether {
    catalog: Arc<Catalog>,
    registry: Arc<Registry>,
    node_ids: Arc<dyn NodeIdCodec>,
    config: TetherConfig,
}

impl Tether {
    /// Build the registry for `catalog` and wrap both.
    pub fn new(catalog: Catalog, config: TetherConfig) -> Self {
        let registry = RegistryBuilder::new(&catalog)
            .with_options(config.inflection.clone())
            .build();
        debug!(
            tables = catalog.table_count(),
            relationships = catalog.relationship_count(),
            types = registry.type_count(),
            "tether ready"
        );

        Self {
            catalog: Arc::new(catalog),
            registry: Arc::new(registry),
            node_ids: Arc::new(JsonNodeIdCodec),
            config,
        }
    }

    /// Replace the identifier format.
    pub fn with_node_id_codec(mut self, codec: impl NodeIdCodec + 'static) -> Self {
        self.node_ids = Arc::new(codec);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &TetherConfig {
        &self.config
    }

    /// Plan and compile without executing.
    pub fn plan(&self, request: &MutationRequest) -> SessionResult<CompiledPlan> {
        let plan = PlanBuilder::new(&self.catalog, &self.registry, self.node_ids.as_ref()).build(request)?;
        Ok(Compiler::new(&self.catalog).compile(&plan)?)
    }

    /// Plan, compile and execute in one transaction.
    ///
    /// Malformed input is rejected before the transaction opens.
    pub fn execute(&self, conn: &mut Connection, request: &MutationRequest) -> SessionResult<MutationOutcome> {
        let compiled = self.plan(request)?;
        let executor = Executor::new(self.config.executor.clone());
        Ok(executor.run(conn, &compiled)?)
    }

    /// Execute and return the root row as JSON.
    pub fn execute_json(&self, conn: &mut Connection, request: &MutationRequest) -> SessionResult<Json> {
        let outcome = self.execute(conn, request)?;
        Ok(outcome.root_json(&self.catalog))
    }

    /// Identifier of a row of `table`; `row` must hold its primary key columns.
    pub fn node_id(&self, table: &str, row: &Row) -> SessionResult<String> {
        let descriptor = self
            .catalog
            .table(table)
            .ok_or_else(|| SessionError::node_id(table, "unknown table"))?;
        let pk = descriptor
            .primary_key()
            .ok_or_else(|| SessionError::node_id(table, "no primary key"))?;

        let keys = pk
            .attributes
            .iter()
            .map(|attribute| {
                let value = row
                    .get(attribute)
                    .ok_or_else(|| SessionError::node_id(table, format!("missing column {}", attribute)))?;
                Ok(match descriptor.attr(attribute) {
                    Some(def) => def.codec.to_json(value),
                    None => value.to_json(),
                })
            })
            .collect::<SessionResult<Vec<Json>>>()?;

        Ok(self.node_ids.encode(table, &keys))
    }
}
