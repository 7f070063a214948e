use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for invigilating staff.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId(pub String);

/// Identifier wrapper for examination rooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub String);

/// Identifier wrapper for exam duty slots (date + shift).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub String);

/// Identifier wrapper for examinees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for subjects under examination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(pub String);

/// Staff seniority as an explicit total order. Variant order is the rotation
/// priority: the most senior designation sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Designation {
    Professor,
    AssociateProfessor,
    AssistantProfessor,
}

impl Designation {
    pub const fn label(self) -> &'static str {
        match self {
            Designation::Professor => "Professor",
            Designation::AssociateProfessor => "Associate Professor",
            Designation::AssistantProfessor => "Assistant Professor",
        }
    }
}

/// An invigilator on the examination cell roster.
///
/// `duty_count` is the running tally for the current allocation cycle; it is
/// reset to zero at the start of every duty allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub designation: Designation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default)]
    pub duty_count: u32,
}

/// An examination room. Only active rooms participate in allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub number: String,
    pub capacity: u32,
    pub is_active: bool,
}

/// Exam session within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shift {
    Morning,
    Afternoon,
    Evening,
}

impl Shift {
    pub const fn label(self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
            Shift::Evening => "Evening",
        }
    }
}

/// A duty slot: one invigilation window on one exam date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutySlot {
    pub id: SlotId,
    pub date: NaiveDate,
    pub shift: Shift,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
}

/// An examinee. The USN (university seat number) is the unique enrollment
/// code; seating within a section follows its lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub usn: String,
    pub name: String,
    pub section: String,
    pub semester: u8,
    pub branch: String,
}

/// Subject under examination; semester and branch select the examinee set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub code: String,
    pub name: String,
    pub semester: u8,
    pub branch: String,
}

/// One staff member invigilating one room for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyAssignment {
    pub staff: StaffId,
    pub room: RoomId,
    pub date: NaiveDate,
    pub shift: Shift,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Continuous internal assessment marks, entered after the exam. All unset
/// when a seat is first allocated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentMarks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cia1: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cia2: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cia3: Option<u8>,
}

/// One examinee seated in one room for one (slot, subject) exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub student: StudentId,
    pub room: RoomId,
    pub slot: SlotId,
    pub subject: SubjectId,
    pub seat_number: u32,
    pub attendance: bool,
    #[serde(default)]
    pub marks: AssessmentMarks,
}

/// Result view returned by a successful duty allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyAllocationSummary {
    pub total_allocations: usize,
    pub slots: usize,
    pub rooms: usize,
    pub staff: usize,
}

/// Result view returned by a successful seat allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAllocationSummary {
    pub total_allocations: usize,
    pub sections: usize,
    pub rooms: usize,
    pub students: usize,
}
