//! Connector sub-operation implementations.
//!
//! Each sub-operation adds one node per input item. Forward relationships
//! point the parent's foreign key at the new node; reverse relationships
//! point the new node's foreign key at the parent.

mod connect;
mod create;
mod delete;
mod update;

pub(crate) use connect::connect;
pub(crate) use create::create;
pub(crate) use delete::delete;
pub(crate) use update::update;

use crate::{Binding, Bindings, MutationPlan, MutationResult, NestedPath, NodeRole, PlanNodeId};
use tether_catalog::{Relationship, TableDescriptor};

/// Where a sub-operation attaches.
pub(crate) struct Slot<'r> {
    pub parent: PlanNodeId,
    pub relationship: &'r Relationship,
    pub remote: &'r TableDescriptor,
    pub path: NestedPath,
}

impl Slot<'_> {
    pub fn role(&self) -> NodeRole {
        if self.relationship.is_reverse {
            NodeRole::Reverse
        } else {
            NodeRole::Forward
        }
    }

    /// Foreign key columns of a reverse child, bound to the parent's key.
    pub fn parent_key(&self) -> Bindings {
        let rel = self.relationship;
        rel.remote_attributes
            .iter()
            .zip(&rel.local_attributes)
            .map(|(fk, key)| (fk.clone(), Binding::pending(self.parent, key.clone())))
            .collect()
    }

    /// Point the parent's foreign key at the row produced by `child`.
    pub fn link_parent(&self, plan: &mut MutationPlan, child: PlanNodeId) -> MutationResult<()> {
        let rel = self.relationship;
        for (fk, key) in rel.local_attributes.iter().zip(&rel.remote_attributes) {
            plan.bind(self.parent, fk.clone(), Binding::pending(child, key.clone()), &self.path)?;
        }
        Ok(())
    }

    /// Seed a reverse child's foreign key from the parent.
    pub fn link_child(&self, plan: &mut MutationPlan, child: PlanNodeId) -> MutationResult<()> {
        for (fk, binding) in self.parent_key() {
            plan.bind(child, fk, binding, &self.path)?;
        }
        Ok(())
    }
}
