//! Nested delete (reverse relationships only).

use super::Slot;
use crate::builder::literals;
use crate::{MutationError, MutationPlan, MutationResult, PlanOperation};
use tether_core::Value;

/// Delete a child row, matched by key and scoped to the parent.
pub(crate) fn delete(plan: &mut MutationPlan, slot: &Slot<'_>, key: Vec<(String, Value)>) -> MutationResult<()> {
    if !slot.relationship.is_reverse {
        return Err(MutationError::validation(
            &slot.path,
            format!("Cannot delete through forward relationship {}", slot.relationship.name),
        ));
    }

    let mut predicate = literals(key);
    predicate.extend(slot.parent_key());
    plan.add_node(
        &slot.remote.name,
        PlanOperation::Delete { predicate },
        slot.path.clone(),
        slot.role(),
    );
    Ok(())
}
