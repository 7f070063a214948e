use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;

use examroom::allocation::domain::{
    Designation, DutyAssignment, DutySlot, Room, RoomId, SeatAssignment, Shift, SlotId, StaffId,
    StaffMember, Student, StudentId, Subject, SubjectId,
};
use examroom::allocation::repository::{
    DutyAssignmentRepository, RepositoryError, RoomRepository, SeatAssignmentRepository,
    SlotRepository, StaffRepository, StudentRepository, SubjectRepository,
};
use examroom::allocation::{DutyAllocationService, SeatAllocationService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type DutyService =
    DutyAllocationService<ExamRegistry, ExamRegistry, ExamRegistry, ExamRegistry>;
pub(crate) type SeatService =
    SeatAllocationService<ExamRegistry, ExamRegistry, ExamRegistry, ExamRegistry, ExamRegistry>;

/// In-memory backing store for every entity collection. One registry value
/// serves as all repository implementations, so the allocation services and
/// the CRUD routes share the same data.
#[derive(Default)]
pub(crate) struct ExamRegistry {
    staff: Mutex<Vec<StaffMember>>,
    rooms: Mutex<Vec<Room>>,
    slots: Mutex<Vec<DutySlot>>,
    students: Mutex<Vec<Student>>,
    subjects: Mutex<Vec<Subject>>,
    duties: Mutex<Vec<DutyAssignment>>,
    seats: Mutex<Vec<SeatAssignment>>,
    sequence: AtomicU64,
}

impl ExamRegistry {
    fn next_id(&self, prefix: &str) -> String {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{id:04}")
    }

    pub(crate) fn add_staff(&self, member: NewStaffMember) -> StaffMember {
        let record = StaffMember {
            id: StaffId(self.next_id("staff")),
            name: member.name,
            designation: member.designation,
            email: member.email,
            department: member.department,
            duty_count: 0,
        };
        self.staff
            .lock()
            .expect("staff mutex poisoned")
            .push(record.clone());
        record
    }

    pub(crate) fn add_room(&self, room: NewRoom) -> Room {
        let record = Room {
            id: RoomId(self.next_id("room")),
            number: room.number,
            capacity: room.capacity,
            is_active: room.is_active,
        };
        self.rooms
            .lock()
            .expect("room mutex poisoned")
            .push(record.clone());
        record
    }

    pub(crate) fn add_slot(&self, slot: NewSchedule) -> DutySlot {
        let record = DutySlot {
            id: SlotId(self.next_id("slot")),
            date: slot.date,
            shift: slot.shift,
            start_time: slot.start_time,
            end_time: slot.end_time,
            is_active: slot.is_active,
        };
        self.slots
            .lock()
            .expect("slot mutex poisoned")
            .push(record.clone());
        record
    }

    pub(crate) fn add_student(&self, student: NewStudent) -> Student {
        let record = Student {
            id: StudentId(self.next_id("student")),
            usn: student.usn,
            name: student.name,
            section: student.section,
            semester: student.semester,
            branch: student.branch,
        };
        self.students
            .lock()
            .expect("student mutex poisoned")
            .push(record.clone());
        record
    }

    pub(crate) fn add_subject(&self, subject: NewSubject) -> Subject {
        let record = Subject {
            id: SubjectId(self.next_id("subject")),
            code: subject.code,
            name: subject.name,
            semester: subject.semester,
            branch: subject.branch,
        };
        self.subjects
            .lock()
            .expect("subject mutex poisoned")
            .push(record.clone());
        record
    }

    pub(crate) fn all_staff(&self) -> Vec<StaffMember> {
        self.staff.lock().expect("staff mutex poisoned").clone()
    }

    pub(crate) fn all_rooms(&self) -> Vec<Room> {
        self.rooms.lock().expect("room mutex poisoned").clone()
    }

    pub(crate) fn all_slots(&self) -> Vec<DutySlot> {
        self.slots.lock().expect("slot mutex poisoned").clone()
    }

    pub(crate) fn all_students(&self) -> Vec<Student> {
        self.students.lock().expect("student mutex poisoned").clone()
    }

    pub(crate) fn all_subjects(&self) -> Vec<Subject> {
        self.subjects.lock().expect("subject mutex poisoned").clone()
    }

    pub(crate) fn all_duties(&self) -> Vec<DutyAssignment> {
        self.duties.lock().expect("duty mutex poisoned").clone()
    }

    pub(crate) fn seats_for(&self, slot: &SlotId, subject: &SubjectId) -> Vec<SeatAssignment> {
        self.seats
            .lock()
            .expect("seat mutex poisoned")
            .iter()
            .filter(|seat| &seat.slot == slot && &seat.subject == subject)
            .cloned()
            .collect()
    }
}

impl StaffRepository for ExamRegistry {
    fn list(&self) -> Result<Vec<StaffMember>, RepositoryError> {
        Ok(self.all_staff())
    }

    fn reset_duty_counts(&self) -> Result<(), RepositoryError> {
        for member in self.staff.lock().expect("staff mutex poisoned").iter_mut() {
            member.duty_count = 0;
        }
        Ok(())
    }

    fn set_duty_counts(&self, counts: &BTreeMap<StaffId, u32>) -> Result<(), RepositoryError> {
        for member in self.staff.lock().expect("staff mutex poisoned").iter_mut() {
            if let Some(count) = counts.get(&member.id) {
                member.duty_count = *count;
            }
        }
        Ok(())
    }
}

impl RoomRepository for ExamRegistry {
    fn list_active(&self) -> Result<Vec<Room>, RepositoryError> {
        Ok(self
            .all_rooms()
            .into_iter()
            .filter(|room| room.is_active)
            .collect())
    }
}

impl SlotRepository for ExamRegistry {
    fn list_active(&self) -> Result<Vec<DutySlot>, RepositoryError> {
        let mut active: Vec<DutySlot> = self
            .all_slots()
            .into_iter()
            .filter(|slot| slot.is_active)
            .collect();
        active.sort_by_key(|slot| slot.date);
        Ok(active)
    }

    fn find(&self, id: &SlotId) -> Result<Option<DutySlot>, RepositoryError> {
        Ok(self.all_slots().into_iter().find(|slot| &slot.id == id))
    }
}

impl StudentRepository for ExamRegistry {
    fn list_matching(&self, semester: u8, branch: &str) -> Result<Vec<Student>, RepositoryError> {
        let mut matching: Vec<Student> = self
            .all_students()
            .into_iter()
            .filter(|student| student.semester == semester && student.branch == branch)
            .collect();
        matching.sort_by(|a, b| a.section.cmp(&b.section).then(a.usn.cmp(&b.usn)));
        Ok(matching)
    }
}

impl SubjectRepository for ExamRegistry {
    fn find(&self, id: &SubjectId) -> Result<Option<Subject>, RepositoryError> {
        Ok(self
            .all_subjects()
            .into_iter()
            .find(|subject| &subject.id == id))
    }
}

impl DutyAssignmentRepository for ExamRegistry {
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
        Ok(self.all_duties())
    }
}

impl SeatAssignmentRepository for ExamRegistry {
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
        Ok(self.seats.lock().expect("seat mutex poisoned").clone())
    }

    fn list_scope(
        &self,
        slot: &SlotId,
        subject: &SubjectId,
    ) -> Result<Vec<SeatAssignment>, RepositoryError> {
        Ok(self.seats_for(slot, subject))
    }
}

/// Payload for registering an invigilator.
#[derive(Debug, Deserialize)]
pub(crate) struct NewStaffMember {
    pub(crate) name: String,
    pub(crate) designation: Designation,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) department: Option<String>,
}

/// Payload for registering an examination room.
#[derive(Debug, Deserialize)]
pub(crate) struct NewRoom {
    pub(crate) number: String,
    pub(crate) capacity: u32,
    #[serde(default = "default_active")]
    pub(crate) is_active: bool,
}

/// Payload for registering an exam schedule slot.
#[derive(Debug, Deserialize)]
pub(crate) struct NewSchedule {
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) date: NaiveDate,
    pub(crate) shift: Shift,
    #[serde(deserialize_with = "deserialize_time")]
    pub(crate) start_time: NaiveTime,
    #[serde(deserialize_with = "deserialize_time")]
    pub(crate) end_time: NaiveTime,
    #[serde(default = "default_active")]
    pub(crate) is_active: bool,
}

/// Payload for registering an examinee.
#[derive(Debug, Deserialize)]
pub(crate) struct NewStudent {
    pub(crate) usn: String,
    pub(crate) name: String,
    pub(crate) section: String,
    pub(crate) semester: u8,
    pub(crate) branch: String,
}

/// Payload for registering a subject.
#[derive(Debug, Deserialize)]
pub(crate) struct NewSubject {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) semester: u8,
    pub(crate) branch: String,
}

fn default_active() -> bool {
    true
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("failed to parse '{raw}' as HH:MM ({err})"))
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_time<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_time(&raw).map_err(serde::de::Error::custom)
}
