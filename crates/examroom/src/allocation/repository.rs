use std::collections::BTreeMap;

use super::domain::{
    DutyAssignment, DutySlot, Room, SeatAssignment, SlotId, StaffId, StaffMember, Student, Subject,
    SubjectId,
};

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for the invigilator roster so allocation services can
/// be exercised against in-memory backends.
pub trait StaffRepository: Send + Sync {
    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError>;
    fn reset_duty_counts(&self) -> Result<(), RepositoryError>;
    fn set_duty_counts(&self, counts: &BTreeMap<StaffId, u32>) -> Result<(), RepositoryError>;
}

/// Examination room storage; `list_active` returns only rooms flagged active.
pub trait RoomRepository: Send + Sync {
    fn list_active(&self) -> Result<Vec<Room>, RepositoryError>;
}

/// Duty slot storage. `list_active` returns active slots ordered by date
/// ascending, stable within a date (declaration order).
pub trait SlotRepository: Send + Sync {
    fn list_active(&self) -> Result<Vec<DutySlot>, RepositoryError>;
    fn find(&self, id: &SlotId) -> Result<Option<DutySlot>, RepositoryError>;
}

/// Examinee storage. `list_matching` returns students for one semester and
/// branch, sorted by section then USN.
pub trait StudentRepository: Send + Sync {
    fn list_matching(&self, semester: u8, branch: &str) -> Result<Vec<Student>, RepositoryError>;
}

/// Subject lookup used to select the examinee set for a seating run.
pub trait SubjectRepository: Send + Sync {
    fn find(&self, id: &SubjectId) -> Result<Option<Subject>, RepositoryError>;
}

/// Duty assignment storage. A duty allocation run replaces the whole
/// collection, so the contract is bulk clear + bulk insert.
pub trait DutyAssignmentRepository: Send + Sync {
    fn clear(&self) -> Result<(), RepositoryError>;
    fn insert_batch(&self, assignments: Vec<DutyAssignment>) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<DutyAssignment>, RepositoryError>;
}

/// Seat assignment storage, scoped per (slot, subject) exam.
pub trait SeatAssignmentRepository: Send + Sync {
    fn clear_scope(&self, slot: &SlotId, subject: &SubjectId) -> Result<(), RepositoryError>;
    fn insert_batch(&self, assignments: Vec<SeatAssignment>) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<SeatAssignment>, RepositoryError>;
    fn list_scope(
        &self,
        slot: &SlotId,
        subject: &SubjectId,
    ) -> Result<Vec<SeatAssignment>, RepositoryError>;
}
