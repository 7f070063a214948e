use std::collections::HashMap;
use std::io::Write;

use tracing::warn;

use crate::allocation::domain::{Room, SeatAssignment, Student, Subject};

use super::ExportError;

pub const SEATING_CHART_HEADER: [&str; 12] = [
    "Room Number",
    "Seat Number",
    "USN",
    "Name",
    "Section",
    "Subject Code",
    "Subject Name",
    "CIA-1",
    "CIA-2",
    "CIA-3",
    "Attendance",
    "Invigilator",
];

fn mark_cell(mark: Option<u8>) -> String {
    mark.map(|value| value.to_string()).unwrap_or_default()
}

/// Render a seating chart as CSV, one row per seat, ordered by room number
/// then seat number. Room numbers are free-form strings and compare
/// lexicographically, so "102" sorts before "9". The invigilator column is
/// left blank for signatures. Returns the number of data rows written.
pub fn write_seating_chart<W: Write>(
    out: W,
    seats: &[SeatAssignment],
    students: &[Student],
    rooms: &[Room],
    subjects: &[Subject],
) -> Result<usize, ExportError> {
    let student_index: HashMap<_, _> = students
        .iter()
        .map(|student| (&student.id, student))
        .collect();
    let room_index: HashMap<_, _> = rooms.iter().map(|room| (&room.id, room)).collect();
    let subject_index: HashMap<_, _> = subjects
        .iter()
        .map(|subject| (&subject.id, subject))
        .collect();

    let mut ordered: Vec<&SeatAssignment> = seats.iter().collect();
    ordered.sort_by(|a, b| {
        let room_a = room_index.get(&a.room).map(|room| room.number.as_str());
        let room_b = room_index.get(&b.room).map(|room| room.number.as_str());
        room_a.cmp(&room_b).then(a.seat_number.cmp(&b.seat_number))
    });

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(SEATING_CHART_HEADER)?;

    let mut written = 0usize;
    for seat in ordered {
        let (student, room, subject) = match (
            student_index.get(&seat.student),
            room_index.get(&seat.room),
            subject_index.get(&seat.subject),
        ) {
            (Some(student), Some(room), Some(subject)) => (student, room, subject),
            _ => {
                warn!(
                    student = %seat.student.0,
                    room = %seat.room.0,
                    subject = %seat.subject.0,
                    "skipping seat row with missing cross-reference"
                );
                continue;
            }
        };

        writer.write_record([
            room.number.as_str(),
            &seat.seat_number.to_string(),
            student.usn.as_str(),
            student.name.as_str(),
            student.section.as_str(),
            subject.code.as_str(),
            subject.name.as_str(),
            &mark_cell(seat.marks.cia1),
            &mark_cell(seat.marks.cia2),
            &mark_cell(seat.marks.cia3),
            if seat.attendance { "Present" } else { "" },
            "",
        ])?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}
