use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use crate::allocation::domain::{
    Designation, DutyAssignment, DutySlot, Room, RoomId, SeatAssignment, Shift, SlotId, StaffId,
    StaffMember, Student, StudentId, Subject, SubjectId,
};
use crate::allocation::repository::{
    DutyAssignmentRepository, RepositoryError, RoomRepository, SeatAssignmentRepository,
    SlotRepository, StaffRepository, StudentRepository, SubjectRepository,
};
use crate::allocation::{DutyAllocationService, SeatAllocationService};

pub(super) fn staff_member(
    id: &str,
    name: &str,
    designation: Designation,
    duty_count: u32,
) -> StaffMember {
    StaffMember {
        id: StaffId(id.to_string()),
        name: name.to_string(),
        designation,
        email: None,
        department: Some("CSE".to_string()),
        duty_count,
    }
}

pub(super) fn room(id: &str, number: &str, capacity: u32, is_active: bool) -> Room {
    Room {
        id: RoomId(id.to_string()),
        number: number.to_string(),
        capacity,
        is_active,
    }
}

pub(super) fn slot(id: &str, date: (i32, u32, u32), shift: Shift, is_active: bool) -> DutySlot {
    DutySlot {
        id: SlotId(id.to_string()),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid date"),
        shift,
        start_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
        end_time: NaiveTime::from_hms_opt(12, 0, 0).expect("valid time"),
        is_active,
    }
}

pub(super) fn student(id: &str, usn: &str, section: &str) -> Student {
    Student {
        id: StudentId(id.to_string()),
        usn: usn.to_string(),
        name: format!("Student {usn}"),
        section: section.to_string(),
        semester: 5,
        branch: "CSE".to_string(),
    }
}

pub(super) fn subject(id: &str, code: &str) -> Subject {
    Subject {
        id: SubjectId(id.to_string()),
        code: code.to_string(),
        name: "Operating Systems".to_string(),
        semester: 5,
        branch: "CSE".to_string(),
    }
}

#[derive(Default)]
pub(super) struct MemoryStaff {
    pub(super) members: Mutex<Vec<StaffMember>>,
}

impl MemoryStaff {
    pub(super) fn with(members: Vec<StaffMember>) -> Self {
        Self {
            members: Mutex::new(members),
        }
    }

    pub(super) fn snapshot(&self) -> Vec<StaffMember> {
        self.members.lock().expect("staff mutex poisoned").clone()
    }
}

impl StaffRepository for MemoryStaff {
    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError> {
        Ok(self.snapshot())
    }

    fn reset_duty_counts(&self) -> Result<(), RepositoryError> {
        let mut guard = self.members.lock().expect("staff mutex poisoned");
        for member in guard.iter_mut() {
            member.duty_count = 0;
        }
        Ok(())
    }

    fn set_duty_counts(&self, counts: &BTreeMap<StaffId, u32>) -> Result<(), RepositoryError> {
        let mut guard = self.members.lock().expect("staff mutex poisoned");
        for member in guard.iter_mut() {
            if let Some(count) = counts.get(&member.id) {
                member.duty_count = *count;
            }
        }
        Ok(())
    }
}

pub(super) struct MemoryRooms {
    pub(super) rooms: Vec<Room>,
}

impl RoomRepository for MemoryRooms {
    fn list_active(&self) -> Result<Vec<Room>, RepositoryError> {
        Ok(self
            .rooms
            .iter()
            .filter(|room| room.is_active)
            .cloned()
            .collect())
    }
}

pub(super) struct MemorySlots {
    pub(super) slots: Vec<DutySlot>,
}

impl SlotRepository for MemorySlots {
    fn list_active(&self) -> Result<Vec<DutySlot>, RepositoryError> {
        let mut active: Vec<DutySlot> = self
            .slots
            .iter()
            .filter(|slot| slot.is_active)
            .cloned()
            .collect();
        active.sort_by_key(|slot| slot.date);
        Ok(active)
    }

    fn find(&self, id: &SlotId) -> Result<Option<DutySlot>, RepositoryError> {
        Ok(self.slots.iter().find(|slot| &slot.id == id).cloned())
    }
}

pub(super) struct MemoryStudents {
    pub(super) students: Vec<Student>,
}

impl StudentRepository for MemoryStudents {
    fn list_matching(&self, semester: u8, branch: &str) -> Result<Vec<Student>, RepositoryError> {
        let mut matching: Vec<Student> = self
            .students
            .iter()
            .filter(|student| student.semester == semester && student.branch == branch)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.section.cmp(&b.section).then(a.usn.cmp(&b.usn)));
        Ok(matching)
    }
}

pub(super) struct MemorySubjects {
    pub(super) subjects: Vec<Subject>,
}

impl SubjectRepository for MemorySubjects {
    fn find(&self, id: &SubjectId) -> Result<Option<Subject>, RepositoryError> {
        Ok(self
            .subjects
            .iter()
            .find(|subject| &subject.id == id)
            .cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryDuties {
    pub(super) duties: Mutex<Vec<DutyAssignment>>,
}

impl MemoryDuties {
    pub(super) fn snapshot(&self) -> Vec<DutyAssignment> {
        self.duties.lock().expect("duty mutex poisoned").clone()
    }
}

impl DutyAssignmentRepository for MemoryDuties {
    fn clear(&self) -> Result<(), RepositoryError> {
        self.duties.lock().expect("duty mutex poisoned").clear();
        Ok(())
    }

    fn insert_batch(&self, assignments: Vec<DutyAssignment>) -> Result<(), RepositoryError> {
        self.duties
            .lock()
            .expect("duty mutex poisoned")
            .extend(assignments);
        Ok(())
    }

    fn list(&self) -> Result<Vec<DutyAssignment>, RepositoryError> {
        Ok(self.snapshot())
    }
}

#[derive(Default)]
pub(super) struct MemorySeats {
    pub(super) seats: Mutex<Vec<SeatAssignment>>,
}

impl MemorySeats {
    pub(super) fn with(seats: Vec<SeatAssignment>) -> Self {
        Self {
            seats: Mutex::new(seats),
        }
    }

    pub(super) fn snapshot(&self) -> Vec<SeatAssignment> {
        self.seats.lock().expect("seat mutex poisoned").clone()
    }
}

impl SeatAssignmentRepository for MemorySeats {
    fn clear_scope(&self, slot: &SlotId, subject: &SubjectId) -> Result<(), RepositoryError> {
        self.seats
            .lock()
            .expect("seat mutex poisoned")
            .retain(|seat| !(&seat.slot == slot && &seat.subject == subject));
        Ok(())
    }

    fn insert_batch(&self, assignments: Vec<SeatAssignment>) -> Result<(), RepositoryError> {
        self.seats
            .lock()
            .expect("seat mutex poisoned")
            .extend(assignments);
        Ok(())
    }

    fn list(&self) -> Result<Vec<SeatAssignment>, RepositoryError> {
        Ok(self.snapshot())
    }

    fn list_scope(
        &self,
        slot: &SlotId,
        subject: &SubjectId,
    ) -> Result<Vec<SeatAssignment>, RepositoryError> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|seat| &seat.slot == slot && &seat.subject == subject)
            .collect())
    }
}

/// Duty store whose writes always fail, for persistence-failure paths.
pub(super) struct UnavailableDuties;

impl DutyAssignmentRepository for UnavailableDuties {
    fn clear(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_batch(&self, _assignments: Vec<DutyAssignment>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<DutyAssignment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type TestDutyService =
    DutyAllocationService<MemoryStaff, MemoryRooms, MemorySlots, MemoryDuties>;

pub(super) type TestSeatService =
    SeatAllocationService<MemorySlots, MemorySubjects, MemoryRooms, MemoryStudents, MemorySeats>;

pub(super) fn build_duty_service(
    staff: Vec<StaffMember>,
    rooms: Vec<Room>,
    slots: Vec<DutySlot>,
) -> (TestDutyService, Arc<MemoryStaff>, Arc<MemoryDuties>) {
    let staff = Arc::new(MemoryStaff::with(staff));
    let duties = Arc::new(MemoryDuties::default());
    let service = DutyAllocationService::new(
        staff.clone(),
        Arc::new(MemoryRooms { rooms }),
        Arc::new(MemorySlots { slots }),
        duties.clone(),
    );
    (service, staff, duties)
}

pub(super) fn build_seat_service(
    slots: Vec<DutySlot>,
    subjects: Vec<Subject>,
    rooms: Vec<Room>,
    students: Vec<Student>,
) -> (TestSeatService, Arc<MemorySeats>) {
    build_seat_service_with_seats(slots, subjects, rooms, students, Vec::new())
}

pub(super) fn build_seat_service_with_seats(
    slots: Vec<DutySlot>,
    subjects: Vec<Subject>,
    rooms: Vec<Room>,
    students: Vec<Student>,
    existing_seats: Vec<SeatAssignment>,
) -> (TestSeatService, Arc<MemorySeats>) {
    let seats = Arc::new(MemorySeats::with(existing_seats));
    let service = SeatAllocationService::new(
        Arc::new(MemorySlots { slots }),
        Arc::new(MemorySubjects { subjects }),
        Arc::new(MemoryRooms { rooms }),
        Arc::new(MemoryStudents { students }),
        seats.clone(),
    );
    (service, seats)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
