//! Nested connect by key or identifier.

use super::Slot;
use crate::builder::literals;
use crate::{MutationPlan, MutationResult, PlanOperation};
use tether_core::Value;

/// Attach an existing row.
///
/// Forward: look the row up and bind the parent's foreign key to the
/// referenced columns, so a missing row surfaces as not found instead of a
/// dangling key. Reverse: rewrite the row's foreign key to the parent.
pub(crate) fn connect(plan: &mut MutationPlan, slot: &Slot<'_>, key: Vec<(String, Value)>) -> MutationResult<()> {
    let predicate = literals(key);

    if slot.relationship.is_reverse {
        plan.add_node(
            &slot.remote.name,
            PlanOperation::Update {
                assignments: slot.parent_key(),
                predicate,
            },
            slot.path.clone(),
            slot.role(),
        );
        return Ok(());
    }

    let target = plan.add_node(
        &slot.remote.name,
        PlanOperation::Lookup { predicate },
        slot.path.clone(),
        slot.role(),
    );
    slot.link_parent(plan, target)
}
