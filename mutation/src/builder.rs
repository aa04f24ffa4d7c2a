//! PlanBuilder: nested input to mutation plan.

use crate::input::{self, Object};
use crate::ops::{self, Slot};
use crate::{
    Binding, Bindings, MutationError, MutationPlan, MutationRequest, MutationResult, NestedPath, NodeRole,
    PlanNodeId, PlanOperation, RootOperation,
};
use serde_json::Value as Json;
use tether_catalog::{Catalog, NodeIdCodec, TableDescriptor};
use tether_core::{messages, Value};
use tether_registry::{ConnectorOperation, MutationFieldDetails, Registry, RelationshipFields};
use tracing::debug;

/// Builds mutation plans against one catalog and its registry.
pub struct PlanBuilder<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) registry: &'a Registry,
    pub(crate) node_ids: &'a dyn NodeIdCodec,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(catalog: &'a Catalog, registry: &'a Registry, node_ids: &'a dyn NodeIdCodec) -> Self {
        Self {
            catalog,
            registry,
            node_ids,
        }
    }

    /// Build the plan for a root request.
    pub fn build(&self, request: &MutationRequest) -> MutationResult<MutationPlan> {
        let path = NestedPath::root();
        let table = self.table(&request.table, &path)?;

        for attribute in &request.returning {
            if !table.has_attr(attribute) {
                return Err(MutationError::validation(
                    &path,
                    format!("Cannot return unknown attribute {} of {}", attribute, table.name),
                ));
            }
        }

        let input = match &request.operation {
            RootOperation::Create { input } => input::as_object(input, &path)?,
            RootOperation::Update { patch, .. } | RootOperation::UpdateByNodeId { patch, .. } => patch
                .as_object()
                .ok_or_else(|| MutationError::validation(&path, messages::ERR_EMPTY_PATCH))?,
        };

        let scalars = literals(self.encode_scalars(table, input, &path)?);
        let operation = match &request.operation {
            RootOperation::Create { .. } => PlanOperation::Insert { values: scalars },
            RootOperation::Update { key, .. } => PlanOperation::Update {
                assignments: scalars,
                predicate: literals(self.root_key(table, key, &path)?),
            },
            RootOperation::UpdateByNodeId { node_id, .. } => PlanOperation::Update {
                assignments: scalars,
                predicate: literals(self.node_id_values(table, &Json::String(node_id.clone()), &path)?),
            },
        };

        let mut plan = MutationPlan::new();
        let root = plan.add_node(&table.name, operation, path.clone(), NodeRole::Root);
        for attribute in &request.returning {
            plan.require(root, attribute.clone());
        }

        self.apply(&mut plan, root, input, &path)?;
        plan.ordered()?;

        debug!(
            table = %table.name,
            kind = plan.root().map(|n| n.operation.kind()).unwrap_or("none"),
            nodes = plan.len(),
            edges = plan.edges().len(),
            "mutation plan built"
        );
        Ok(plan)
    }

    /// Apply the connector fields of `input` to an existing node.
    ///
    /// Attribute fields are left to whoever created `node`; any field that is
    /// neither an attribute nor a connector of the node's table is rejected.
    pub fn apply(
        &self,
        plan: &mut MutationPlan,
        node: PlanNodeId,
        input: &serde_json::Map<String, Json>,
        path: &NestedPath,
    ) -> MutationResult<()> {
        let table_name = plan
            .node(node)
            .map(|n| n.table.clone())
            .ok_or_else(|| MutationError::validation(path, format!("Unknown plan node {}", node)))?;

        for (field, value) in input {
            if let Some(connector) = self.registry.connector(&table_name, field) {
                if !value.is_null() {
                    self.apply_connector(plan, node, connector, value, &path.field(field))?;
                }
            } else if self.registry.attribute_for_field(&table_name, field).is_none() {
                return Err(MutationError::unknown_field(path, &table_name, field));
            }
        }
        Ok(())
    }

    fn apply_connector(
        &self,
        plan: &mut MutationPlan,
        parent: PlanNodeId,
        connector: &'a RelationshipFields,
        value: &Json,
        path: &NestedPath,
    ) -> MutationResult<()> {
        let rel = &connector.relationship;
        let fields = input::as_object(value, path)?;
        let single = rel.is_single();

        let mut requested = Vec::new();
        for (name, payload) in fields {
            if payload.is_null() {
                continue;
            }
            let (op, details) = connector
                .fields
                .operation(name)
                .ok_or_else(|| MutationError::unknown_field(path, &connector.fields.input.type_name, name))?;
            requested.push((op, details, payload, path.field(name)));
        }

        // Deletes are planned first so they run before siblings that may
        // reuse the freed key.
        requested.sort_by_key(|(op, ..)| op.is_exclusive());

        let exclusive = requested.iter().filter(|(op, ..)| op.is_exclusive()).count();
        if single && exclusive > 1 {
            return Err(MutationError::validation(path, messages::ERR_CONFLICTING_OPERATIONS));
        }

        let remote = self.table(&rel.remote_table, path)?;
        for (op, details, payload, op_path) in requested {
            let single_slot = single && op.is_exclusive();
            for (obj, item_path) in input::items(payload, single_slot, &op_path)? {
                let ty = self.generated_type(&details.type_name, &item_path)?;
                input::check_fields(obj, ty, &item_path)?;

                let slot = Slot {
                    parent,
                    relationship: rel,
                    remote,
                    path: item_path,
                };
                match op {
                    ConnectorOperation::Create => ops::create(self, plan, &slot, obj)?,
                    ConnectorOperation::ConnectByKey | ConnectorOperation::ConnectByNodeId => {
                        let key = self.target_key(remote, details, obj, &slot.path)?;
                        ops::connect(plan, &slot, key)?
                    }
                    ConnectorOperation::UpdateByKey | ConnectorOperation::UpdateByNodeId => {
                        let key = self.target_key(remote, details, obj, &slot.path)?;
                        let patch_field = self.registry.patch_field();
                        let patch_path = slot.path.field(&patch_field);
                        let patch = match obj.get(&patch_field) {
                            Some(patch) => input::as_object(patch, &patch_path)?,
                            None => return Err(MutationError::validation(&patch_path, messages::ERR_EMPTY_PATCH)),
                        };
                        ops::update(self, plan, &slot, key, patch, &patch_path)?
                    }
                    ConnectorOperation::DeleteByKey | ConnectorOperation::DeleteByNodeId => {
                        let key = self.target_key(remote, details, obj, &slot.path)?;
                        ops::delete(plan, &slot, key)?
                    }
                }
            }
        }
        Ok(())
    }

    /// Predicate values identifying the target row of a connect, update or delete.
    fn target_key(
        &self,
        remote: &TableDescriptor,
        details: &MutationFieldDetails,
        obj: &Object,
        path: &NestedPath,
    ) -> MutationResult<Vec<(String, Value)>> {
        match &details.unique {
            Some(name) => {
                let unique = remote.unique(name).ok_or_else(|| {
                    MutationError::validation(path, format!("Unknown unique constraint {} on {}", name, remote.name))
                })?;
                self.key_values(remote, unique, obj, path)
            }
            None => {
                let field = self.registry.node_id_field();
                let field_path = path.field(&field);
                match obj.get(&field) {
                    Some(id) => self.node_id_values(remote, id, &field_path),
                    None => Err(MutationError::validation(&field_path, messages::ERR_NODE_ID_NOT_STRING)),
                }
            }
        }
    }

    /// Root update key given as attribute names; must match a unique constraint exactly.
    fn root_key(
        &self,
        table: &TableDescriptor,
        key: &[(String, Json)],
        path: &NestedPath,
    ) -> MutationResult<Vec<(String, Value)>> {
        let attributes: Vec<String> = key.iter().map(|(a, _)| a.clone()).collect();
        if table.unique_covering(&attributes).is_none() {
            return Err(MutationError::validation(
                path,
                format!(
                    "No unique constraint of {} covers ({})",
                    table.name,
                    attributes.join(", ")
                ),
            ));
        }

        key.iter()
            .map(|(attribute, json)| {
                let field_path = path.field(&self.registry.field_for_attribute(attribute));
                if json.is_null() {
                    return Err(MutationError::validation(&field_path, messages::ERR_INCOMPLETE_KEY));
                }
                Ok((attribute.clone(), self.encode(table, attribute, json, &field_path)?))
            })
            .collect()
    }
}

pub(crate) fn literals(values: Vec<(String, Value)>) -> Bindings {
    values
        .into_iter()
        .map(|(column, value)| (column, Binding::Literal(value)))
        .collect()
}
