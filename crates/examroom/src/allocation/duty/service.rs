use std::sync::Arc;

use tracing::info;

use super::super::domain::{DutyAllocationSummary, DutyAssignment};
use super::super::repository::{
    DutyAssignmentRepository, RepositoryError, RoomRepository, SlotRepository, StaffRepository,
};
use super::engine::plan_duties;

/// Service composing the roster, room, and slot repositories with the round
/// robin planning pass.
pub struct DutyAllocationService<S, R, L, D> {
    staff: Arc<S>,
    rooms: Arc<R>,
    slots: Arc<L>,
    duties: Arc<D>,
}

impl<S, R, L, D> DutyAllocationService<S, R, L, D>
where
    S: StaffRepository + 'static,
    R: RoomRepository + 'static,
    L: SlotRepository + 'static,
    D: DutyAssignmentRepository + 'static,
{
    pub fn new(staff: Arc<S>, rooms: Arc<R>, slots: Arc<L>, duties: Arc<D>) -> Self {
        Self {
            staff,
            rooms,
            slots,
            duties,
        }
    }

    /// Rebuild the full duty roster from the current entity snapshots.
    ///
    /// Prior duties are discarded and every duty counter reset before the
    /// new batch is written. Writes are not transactional: a failing insert
    /// leaves earlier rows in place, and callers treat a re-run as the
    /// recovery path.
    pub fn allocate(&self) -> Result<DutyAllocationSummary, DutyAllocationError> {
        let staff = self.staff.list()?;
        let rooms = self.rooms.list_active()?;
        let slots = self.slots.list_active()?;

        let plan = plan_duties(&staff, &rooms, &slots)?;
        let total_allocations = plan.assignments.len();

        self.duties.clear()?;
        self.staff.reset_duty_counts()?;
        self.duties.insert_batch(plan.assignments)?;
        self.staff.set_duty_counts(&plan.duty_counts)?;

        info!(
            total_allocations,
            slots = slots.len(),
            rooms = rooms.len(),
            staff = staff.len(),
            "invigilation duties allocated"
        );

        Ok(DutyAllocationSummary {
            total_allocations,
            slots: slots.len(),
            rooms: rooms.len(),
            staff: staff.len(),
        })
    }

    /// Current duty roster for listing and export.
    pub fn roster(&self) -> Result<Vec<DutyAssignment>, DutyAllocationError> {
        Ok(self.duties.list()?)
    }
}

/// Error raised by the duty allocation service.
#[derive(Debug, thiserror::Error)]
pub enum DutyAllocationError {
    #[error("no staff available for allocation")]
    NoStaff,
    #[error("no active rooms available for allocation")]
    NoActiveRooms,
    #[error("no active exam schedules found for allocation")]
    NoActiveSlots,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
