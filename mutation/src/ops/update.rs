//! Nested update by key or identifier.

use super::Slot;
use crate::builder::literals;
use crate::input::Object;
use crate::{MutationPlan, MutationResult, NestedPath, PlanBuilder, PlanOperation};
use tether_core::Value;

/// Patch an existing row and attach it.
pub(crate) fn update(
    builder: &PlanBuilder<'_>,
    plan: &mut MutationPlan,
    slot: &Slot<'_>,
    key: Vec<(String, Value)>,
    patch: &Object,
    patch_path: &NestedPath,
) -> MutationResult<()> {
    let assignments = literals(builder.encode_scalars(slot.remote, patch, patch_path)?);
    let target = plan.add_node(
        &slot.remote.name,
        PlanOperation::Update {
            assignments,
            predicate: literals(key),
        },
        slot.path.clone(),
        slot.role(),
    );

    if slot.relationship.is_reverse {
        slot.link_child(plan, target)?;
    } else {
        slot.link_parent(plan, target)?;
    }

    builder.apply(plan, target, patch, patch_path)
}
