use std::collections::BTreeMap;

use super::super::domain::{DutyAssignment, DutySlot, Room, StaffId, StaffMember};
use super::service::DutyAllocationError;

/// Outcome of a duty planning pass: one assignment per (slot, room) plus the
/// final duty tally per staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DutyPlan {
    pub assignments: Vec<DutyAssignment>,
    pub duty_counts: BTreeMap<StaffId, u32>,
}

/// Sort staff into rotation order: most senior designation first, then fewer
/// current duties first. The sort is stable, so equal entries keep roster
/// order and re-runs over the same snapshot are deterministic.
pub fn rotation_order(staff: &[StaffMember]) -> Vec<StaffMember> {
    let mut ordered = staff.to_vec();
    ordered.sort_by(|a, b| {
        a.designation
            .cmp(&b.designation)
            .then(a.duty_count.cmp(&b.duty_count))
    });
    ordered
}

/// Weighted round robin over every (slot, room) pair.
///
/// The rotation cursor is shared across all slots rather than reset per
/// slot, which keeps final duty counts within one of each other regardless
/// of how many rooms each exam date uses.
pub fn plan_duties(
    staff: &[StaffMember],
    rooms: &[Room],
    slots: &[DutySlot],
) -> Result<DutyPlan, DutyAllocationError> {
    if staff.is_empty() {
        return Err(DutyAllocationError::NoStaff);
    }
    if rooms.is_empty() {
        return Err(DutyAllocationError::NoActiveRooms);
    }
    if slots.is_empty() {
        return Err(DutyAllocationError::NoActiveSlots);
    }

    let rotation = rotation_order(staff);

    let mut ordered_slots = slots.to_vec();
    ordered_slots.sort_by_key(|slot| slot.date);

    let mut duty_counts: BTreeMap<StaffId, u32> = rotation
        .iter()
        .map(|member| (member.id.clone(), 0))
        .collect();

    let mut assignments = Vec::with_capacity(ordered_slots.len() * rooms.len());
    let mut cursor = 0usize;

    for slot in &ordered_slots {
        for room in rooms {
            let member = &rotation[cursor % rotation.len()];
            assignments.push(DutyAssignment {
                staff: member.id.clone(),
                room: room.id.clone(),
                date: slot.date,
                shift: slot.shift,
                start_time: slot.start_time,
                end_time: slot.end_time,
            });
            if let Some(count) = duty_counts.get_mut(&member.id) {
                *count += 1;
            }
            cursor = (cursor + 1) % rotation.len();
        }
    }

    Ok(DutyPlan {
        assignments,
        duty_counts,
    })
}
