use super::super::domain::{
    AssessmentMarks, DutySlot, Room, SeatAssignment, Student, Subject,
};
use super::service::SeatAllocationError;

/// Outcome of a seating pass: one seat per matching examinee plus the number
/// of distinct sections packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingPlan {
    pub assignments: Vec<SeatAssignment>,
    pub sections: usize,
}

/// Section-preserving bin packing of examinees into rooms.
///
/// Rooms fill largest first. Sections are walked in first-seen order and
/// each section is seated in USN order through a single (room, seat) cursor,
/// so a section that outgrows the current room continues into the next one
/// rather than forcing a fresh room. Seat numbers are 1-based per room.
pub fn plan_seating(
    slot: &DutySlot,
    subject: &Subject,
    rooms: &[Room],
    students: &[Student],
) -> Result<SeatingPlan, SeatAllocationError> {
    if rooms.is_empty() {
        return Err(SeatAllocationError::NoActiveRooms);
    }
    if students.is_empty() {
        return Err(SeatAllocationError::NoMatchingStudents);
    }

    let mut ordered_rooms = rooms.to_vec();
    ordered_rooms.sort_by(|a, b| b.capacity.cmp(&a.capacity));

    let sections = group_by_section(students);
    let section_count = sections.len();

    let mut assignments = Vec::with_capacity(students.len());
    let mut room_index = 0usize;
    let mut seat_number = 1u32;

    for (_, members) in sections {
        for student in members {
            if seat_number > ordered_rooms[room_index].capacity {
                room_index += 1;
                seat_number = 1;
                if room_index >= ordered_rooms.len() {
                    return Err(SeatAllocationError::CapacityExhausted {
                        seated: assignments.len(),
                        unseated: students.len() - assignments.len(),
                    });
                }
            }

            assignments.push(SeatAssignment {
                student: student.id.clone(),
                room: ordered_rooms[room_index].id.clone(),
                slot: slot.id.clone(),
                subject: subject.id.clone(),
                seat_number,
                attendance: false,
                marks: AssessmentMarks::default(),
            });
            seat_number += 1;
        }
    }

    Ok(SeatingPlan {
        assignments,
        sections: section_count,
    })
}

/// Group students by section label in first-seen order, each section sorted
/// by USN ascending.
fn group_by_section(students: &[Student]) -> Vec<(String, Vec<&Student>)> {
    let mut sections: Vec<(String, Vec<&Student>)> = Vec::new();
    for student in students {
        match sections
            .iter_mut()
            .find(|(label, _)| label == &student.section)
        {
            Some((_, members)) => members.push(student),
            None => sections.push((student.section.clone(), vec![student])),
        }
    }
    for (_, members) in &mut sections {
        members.sort_by(|a, b| a.usn.cmp(&b.usn));
    }
    sections
}
