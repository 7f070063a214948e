use std::sync::Arc;

use tracing::info;

use super::super::domain::{SeatAllocationSummary, SeatAssignment, SlotId, SubjectId};
use super::super::repository::{
    RepositoryError, RoomRepository, SeatAssignmentRepository, SlotRepository, StudentRepository,
    SubjectRepository,
};
use super::engine::plan_seating;

/// Service composing slot, subject, room, and examinee lookups with the
/// seating pass and the scoped seat assignment store.
pub struct SeatAllocationService<L, B, R, T, A> {
    slots: Arc<L>,
    subjects: Arc<B>,
    rooms: Arc<R>,
    students: Arc<T>,
    seats: Arc<A>,
}

impl<L, B, R, T, A> SeatAllocationService<L, B, R, T, A>
where
    L: SlotRepository + 'static,
    B: SubjectRepository + 'static,
    R: RoomRepository + 'static,
    T: StudentRepository + 'static,
    A: SeatAssignmentRepository + 'static,
{
    pub fn new(
        slots: Arc<L>,
        subjects: Arc<B>,
        rooms: Arc<R>,
        students: Arc<T>,
        seats: Arc<A>,
    ) -> Self {
        Self {
            slots,
            subjects,
            rooms,
            students,
            seats,
        }
    }

    /// Rebuild the seating chart for one (slot, subject) exam.
    ///
    /// The scoped delete runs only after the plan succeeds: a capacity
    /// failure commits nothing and leaves any previously published chart for
    /// the scope intact.
    pub fn allocate(
        &self,
        slot_id: &SlotId,
        subject_id: &SubjectId,
    ) -> Result<SeatAllocationSummary, SeatAllocationError> {
        let slot = self
            .slots
            .find(slot_id)?
            .ok_or_else(|| SeatAllocationError::SlotNotFound(slot_id.clone()))?;
        let subject = self
            .subjects
            .find(subject_id)?
            .ok_or_else(|| SeatAllocationError::SubjectNotFound(subject_id.clone()))?;

        let rooms = self.rooms.list_active()?;
        let students = self
            .students
            .list_matching(subject.semester, &subject.branch)?;

        let plan = plan_seating(&slot, &subject, &rooms, &students)?;
        let total_allocations = plan.assignments.len();

        self.seats.clear_scope(slot_id, subject_id)?;
        self.seats.insert_batch(plan.assignments)?;

        info!(
            total_allocations,
            sections = plan.sections,
            rooms = rooms.len(),
            students = students.len(),
            slot = %slot_id.0,
            subject = %subject_id.0,
            "exam seating allocated"
        );

        Ok(SeatAllocationSummary {
            total_allocations,
            sections: plan.sections,
            rooms: rooms.len(),
            students: students.len(),
        })
    }

    /// Seating chart for one (slot, subject) exam, for listing and export.
    pub fn chart(
        &self,
        slot_id: &SlotId,
        subject_id: &SubjectId,
    ) -> Result<Vec<SeatAssignment>, SeatAllocationError> {
        Ok(self.seats.list_scope(slot_id, subject_id)?)
    }
}

/// Error raised by the seat allocation service.
#[derive(Debug, thiserror::Error)]
pub enum SeatAllocationError {
    #[error("exam schedule {} not found", .0 .0)]
    SlotNotFound(SlotId),
    #[error("subject {} not found", .0 .0)]
    SubjectNotFound(SubjectId),
    #[error("no active rooms available for allocation")]
    NoActiveRooms,
    #[error("no students found for the specified subject")]
    NoMatchingStudents,
    #[error("not enough room capacity for all students ({seated} seated, {unseated} remaining)")]
    CapacityExhausted { seated: usize, unseated: usize },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
