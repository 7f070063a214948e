use std::collections::HashMap;
use std::io::Write;

use tracing::warn;

use crate::allocation::domain::{DutyAssignment, Room, StaffMember};

use super::ExportError;

pub const DUTY_SHEET_HEADER: [&str; 7] = [
    "Staff Name",
    "Designation",
    "Date",
    "Shift",
    "Room Number",
    "Start Time",
    "End Time",
];

/// Render the invigilation duty roster as CSV, one row per duty, ordered by
/// date then shift. Returns the number of data rows written.
pub fn write_duty_sheet<W: Write>(
    out: W,
    duties: &[DutyAssignment],
    staff: &[StaffMember],
    rooms: &[Room],
) -> Result<usize, ExportError> {
    let staff_index: HashMap<_, _> = staff.iter().map(|member| (&member.id, member)).collect();
    let room_index: HashMap<_, _> = rooms.iter().map(|room| (&room.id, room)).collect();

    let mut ordered: Vec<&DutyAssignment> = duties.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then(a.shift.cmp(&b.shift)));

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(DUTY_SHEET_HEADER)?;

    let mut written = 0usize;
    for duty in ordered {
        let (member, room) = match (staff_index.get(&duty.staff), room_index.get(&duty.room)) {
            (Some(member), Some(room)) => (member, room),
            _ => {
                warn!(
                    staff = %duty.staff.0,
                    room = %duty.room.0,
                    "skipping duty row with missing staff or room reference"
                );
                continue;
            }
        };

        writer.write_record([
            member.name.as_str(),
            member.designation.label(),
            &duty.date.format("%d-%m-%Y").to_string(),
            duty.shift.label(),
            room.number.as_str(),
            &duty.start_time.format("%H:%M").to_string(),
            &duty.end_time.format("%H:%M").to_string(),
        ])?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}
