use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::super::domain::{SlotId, SubjectId};
use super::super::repository::{
    RoomRepository, SeatAssignmentRepository, SlotRepository, StudentRepository, SubjectRepository,
};
use super::service::{SeatAllocationError, SeatAllocationService};

/// Request body selecting the exam to allocate seats for.
#[derive(Debug, Clone, Deserialize)]
pub struct SeatAllocationRequest {
    pub schedule_id: String,
    pub subject_id: String,
}

/// Query selecting one (schedule, subject) seating chart.
#[derive(Debug, Clone, Deserialize)]
pub struct SeatingChartQuery {
    pub schedule_id: String,
    pub subject_id: String,
}

/// Router builder exposing the seat allocation endpoints.
pub fn seating_router<L, B, R, T, A>(service: Arc<SeatAllocationService<L, B, R, T, A>>) -> Router
where
    L: SlotRepository + 'static,
    B: SubjectRepository + 'static,
    R: RoomRepository + 'static,
    T: StudentRepository + 'static,
    A: SeatAssignmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/seating/allocate",
            post(allocate_handler::<L, B, R, T, A>),
        )
        .route("/api/v1/seating", get(chart_handler::<L, B, R, T, A>))
        .with_state(service)
}

pub(crate) async fn allocate_handler<L, B, R, T, A>(
    State(service): State<Arc<SeatAllocationService<L, B, R, T, A>>>,
    axum::Json(request): axum::Json<SeatAllocationRequest>,
) -> Response
where
    L: SlotRepository + 'static,
    B: SubjectRepository + 'static,
    R: RoomRepository + 'static,
    T: StudentRepository + 'static,
    A: SeatAssignmentRepository + 'static,
{
    let slot_id = SlotId(request.schedule_id);
    let subject_id = SubjectId(request.subject_id);

    match service.allocate(&slot_id, &subject_id) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(
            error @ (SeatAllocationError::SlotNotFound(_)
            | SeatAllocationError::SubjectNotFound(_)),
        ) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(SeatAllocationError::CapacityExhausted { seated, unseated }) => {
            let payload = json!({
                "error": "not enough room capacity for all students",
                "allocated_students": seated,
                "remaining_students": unseated,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(
            error @ (SeatAllocationError::NoActiveRooms
            | SeatAllocationError::NoMatchingStudents),
        ) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn chart_handler<L, B, R, T, A>(
    State(service): State<Arc<SeatAllocationService<L, B, R, T, A>>>,
    Query(query): Query<SeatingChartQuery>,
) -> Response
where
    L: SlotRepository + 'static,
    B: SubjectRepository + 'static,
    R: RoomRepository + 'static,
    T: StudentRepository + 'static,
    A: SeatAssignmentRepository + 'static,
{
    let slot_id = SlotId(query.schedule_id);
    let subject_id = SubjectId(query.subject_id);

    match service.chart(&slot_id, &subject_id) {
        Ok(seats) => (StatusCode::OK, axum::Json(seats)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
