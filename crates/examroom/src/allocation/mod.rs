//! Allocation core: pure planning engines for invigilation duties and exam
//! seating, services that persist their output through repository traits,
//! and axum routers exposing both operations.

pub mod domain;
pub mod duty;
pub mod repository;
pub mod seating;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentMarks, Designation, DutyAllocationSummary, DutyAssignment, DutySlot, Room, RoomId,
    SeatAllocationSummary, SeatAssignment, Shift, SlotId, StaffId, StaffMember, Student, StudentId,
    Subject, SubjectId,
};
pub use duty::{duty_router, plan_duties, DutyAllocationError, DutyAllocationService, DutyPlan};
pub use repository::{
    DutyAssignmentRepository, RepositoryError, RoomRepository, SeatAssignmentRepository,
    SlotRepository, StaffRepository, StudentRepository, SubjectRepository,
};
pub use seating::{
    plan_seating, seating_router, SeatAllocationError, SeatAllocationRequest,
    SeatAllocationService, SeatingPlan,
};
