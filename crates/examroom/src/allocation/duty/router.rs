use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::super::repository::{
    DutyAssignmentRepository, RoomRepository, SlotRepository, StaffRepository,
};
use super::service::{DutyAllocationError, DutyAllocationService};

/// Router builder exposing the duty allocation endpoints.
pub fn duty_router<S, R, L, D>(service: Arc<DutyAllocationService<S, R, L, D>>) -> Router
where
    S: StaffRepository + 'static,
    R: RoomRepository + 'static,
    L: SlotRepository + 'static,
    D: DutyAssignmentRepository + 'static,
{
    Router::new()
        .route("/api/v1/duties/allocate", post(allocate_handler::<S, R, L, D>))
        .route("/api/v1/duties", get(roster_handler::<S, R, L, D>))
        .with_state(service)
}

pub(crate) async fn allocate_handler<S, R, L, D>(
    State(service): State<Arc<DutyAllocationService<S, R, L, D>>>,
) -> Response
where
    S: StaffRepository + 'static,
    R: RoomRepository + 'static,
    L: SlotRepository + 'static,
    D: DutyAssignmentRepository + 'static,
{
    match service.allocate() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(
            error @ (DutyAllocationError::NoStaff
            | DutyAllocationError::NoActiveRooms
            | DutyAllocationError::NoActiveSlots),
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

pub(crate) async fn roster_handler<S, R, L, D>(
    State(service): State<Arc<DutyAllocationService<S, R, L, D>>>,
) -> Response
where
    S: StaffRepository + 'static,
    R: RoomRepository + 'static,
    L: SlotRepository + 'static,
    D: DutyAssignmentRepository + 'static,
{
    match service.roster() {
        Ok(duties) => (StatusCode::OK, axum::Json(duties)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
