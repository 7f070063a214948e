use crate::infra::{ExamRegistry, NewRoom, NewSchedule, NewStaffMember, NewStudent, NewSubject};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use examroom::allocation::domain::{Designation, Shift};
use examroom::allocation::{DutyAllocationService, SeatAllocationService};
use examroom::error::AppError;
use examroom::report::{write_duty_sheet, write_seating_chart};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// First examination date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) exam_date: Option<NaiveDate>,
    /// Skip the seating allocation portion of the demo.
    #[arg(long)]
    pub(crate) skip_seating: bool,
    /// Print the rendered CSV sheets after each allocation.
    #[arg(long)]
    pub(crate) print_sheets: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        exam_date,
        skip_seating,
        print_sheets,
    } = args;

    let exam_date = exam_date.unwrap_or_else(|| Local::now().date_naive());
    let second_date = exam_date + chrono::Duration::days(1);

    println!("Exam allocation demo");
    println!("Examination window: {exam_date} -> {second_date}");

    let registry = Arc::new(seeded_registry(exam_date, second_date));

    println!("\nInvigilation duty allocation");
    let duty_service = DutyAllocationService::new(
        registry.clone(),
        registry.clone(),
        registry.clone(),
        registry.clone(),
    );
    let summary = match duty_service.allocate() {
        Ok(summary) => summary,
        Err(err) => {
            println!("  Duty allocation failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} duties across {} schedules x {} rooms for {} staff",
        summary.total_allocations, summary.slots, summary.rooms, summary.staff
    );
    for member in registry.all_staff() {
        println!(
            "  - {} ({}): {} duties",
            member.name,
            member.designation.label(),
            member.duty_count
        );
    }

    if print_sheets {
        let mut buffer = Vec::new();
        write_duty_sheet(
            &mut buffer,
            &registry.all_duties(),
            &registry.all_staff(),
            &registry.all_rooms(),
        )?;
        println!("\nDuty sheet");
        print!("{}", String::from_utf8_lossy(&buffer));
    }

    if skip_seating {
        return Ok(());
    }

    println!("\nSeating allocation");
    let seat_service = SeatAllocationService::new(
        registry.clone(),
        registry.clone(),
        registry.clone(),
        registry.clone(),
        registry.clone(),
    );

    let Some(slot) = registry.all_slots().into_iter().next() else {
        println!("  No schedule seeded; nothing to allocate");
        return Ok(());
    };
    let Some(subject) = registry.all_subjects().into_iter().next() else {
        println!("  No subject seeded; nothing to allocate");
        return Ok(());
    };

    let summary = match seat_service.allocate(&slot.id, &subject.id) {
        Ok(summary) => summary,
        Err(err) => {
            println!("  Seat allocation failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} students from {} sections seated across {} rooms for {} ({})",
        summary.total_allocations, summary.sections, summary.rooms, subject.name, subject.code
    );

    let chart = match seat_service.chart(&slot.id, &subject.id) {
        Ok(chart) => chart,
        Err(err) => {
            println!("  Seating chart unavailable: {err}");
            return Ok(());
        }
    };
    let rooms = registry.all_rooms();
    for seat in &chart {
        let room_number = rooms
            .iter()
            .find(|room| room.id == seat.room)
            .map(|room| room.number.as_str())
            .unwrap_or("?");
        println!("  - room {room_number} seat {}", seat.seat_number);
    }

    if print_sheets {
        let mut buffer = Vec::new();
        write_seating_chart(
            &mut buffer,
            &chart,
            &registry.all_students(),
            &rooms,
            &registry.all_subjects(),
        )?;
        println!("\nSeating chart");
        print!("{}", String::from_utf8_lossy(&buffer));
    }

    Ok(())
}

fn seeded_registry(exam_date: NaiveDate, second_date: NaiveDate) -> ExamRegistry {
    let registry = ExamRegistry::default();

    for (name, designation) in [
        ("Anita Rao", Designation::Professor),
        ("Vikram Shetty", Designation::AssociateProfessor),
        ("Meera Iyer", Designation::AssistantProfessor),
        ("Rahul Nair", Designation::AssistantProfessor),
    ] {
        registry.add_staff(NewStaffMember {
            name: name.to_string(),
            designation,
            email: None,
            department: Some("CSE".to_string()),
        });
    }

    for (number, capacity) in [("101", 4), ("102", 3)] {
        registry.add_room(NewRoom {
            number: number.to_string(),
            capacity,
            is_active: true,
        });
    }

    let start_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();
    let end_time = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    for (date, shift) in [(exam_date, Shift::Morning), (second_date, Shift::Afternoon)] {
        registry.add_slot(NewSchedule {
            date,
            shift,
            start_time,
            end_time,
            is_active: true,
        });
    }

    for (index, section) in [(1, "A"), (2, "A"), (3, "A"), (4, "B"), (5, "B"), (6, "B")] {
        registry.add_student(NewStudent {
            usn: format!("1CR21CS00{index}"),
            name: format!("Student {index}"),
            section: section.to_string(),
            semester: 5,
            branch: "CSE".to_string(),
        });
    }

    registry.add_subject(NewSubject {
        code: "21CS53".to_string(),
        name: "Operating Systems".to_string(),
        semester: 5,
        branch: "CSE".to_string(),
    });

    registry
}
