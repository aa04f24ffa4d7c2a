//! Nested create.

use super::Slot;
use crate::builder::literals;
use crate::input::Object;
use crate::{MutationPlan, MutationResult, PlanBuilder, PlanOperation};

/// Insert a related row.
///
/// A forward child is inserted first and the parent reads its key; a reverse
/// child is inserted after the parent with its foreign key seeded. The
/// payload may nest connectors of the child's own table.
pub(crate) fn create(builder: &PlanBuilder<'_>, plan: &mut MutationPlan, slot: &Slot<'_>, obj: &Object) -> MutationResult<()> {
    let values = literals(builder.encode_scalars(slot.remote, obj, &slot.path)?);
    let child = plan.add_node(
        &slot.remote.name,
        PlanOperation::Insert { values },
        slot.path.clone(),
        slot.role(),
    );

    if slot.relationship.is_reverse {
        slot.link_child(plan, child)?;
    } else {
        slot.link_parent(plan, child)?;
    }

    builder.apply(plan, child, obj, &slot.path)
}
