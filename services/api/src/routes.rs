use std::sync::Arc;

use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use examroom::allocation::domain::{SlotId, SubjectId};
use examroom::allocation::{duty_router, seating_router};
use examroom::error::AppError;
use examroom::report::{write_duty_sheet, write_seating_chart};

use crate::infra::{
    AppState, DutyService, ExamRegistry, NewRoom, NewSchedule, NewStaffMember, NewStudent,
    NewSubject, SeatService,
};

/// Assemble the full HTTP surface: allocation routers from the core crate,
/// service endpoints, entity CRUD, and CSV exports.
pub(crate) fn with_exam_routes(
    registry: Arc<ExamRegistry>,
    duty_service: Arc<DutyService>,
    seat_service: Arc<SeatService>,
) -> axum::Router {
    duty_router(duty_service)
        .merge(seating_router(seat_service))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/staff", get(list_staff).post(create_staff))
        .route("/api/v1/rooms", get(list_rooms).post(create_room))
        .route("/api/v1/schedules", get(list_schedules).post(create_schedule))
        .route("/api/v1/students", get(list_students).post(create_student))
        .route("/api/v1/subjects", get(list_subjects).post(create_subject))
        .route("/api/v1/exports/duty-roster", get(export_duty_roster))
        .route("/api/v1/exports/seating-chart", get(export_seating_chart))
        .layer(Extension(registry))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn list_staff(
    Extension(registry): Extension<Arc<ExamRegistry>>,
) -> impl IntoResponse {
    Json(registry.all_staff())
}

pub(crate) async fn create_staff(
    Extension(registry): Extension<Arc<ExamRegistry>>,
    Json(payload): Json<NewStaffMember>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        let body = json!({ "error": "name is required" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }
    let record = registry.add_staff(payload);
    (StatusCode::CREATED, Json(record)).into_response()
}

pub(crate) async fn list_rooms(
    Extension(registry): Extension<Arc<ExamRegistry>>,
) -> impl IntoResponse {
    Json(registry.all_rooms())
}

pub(crate) async fn create_room(
    Extension(registry): Extension<Arc<ExamRegistry>>,
    Json(payload): Json<NewRoom>,
) -> impl IntoResponse {
    if payload.capacity == 0 {
        let body = json!({ "error": "capacity must be a positive integer" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }
    let record = registry.add_room(payload);
    (StatusCode::CREATED, Json(record)).into_response()
}

pub(crate) async fn list_schedules(
    Extension(registry): Extension<Arc<ExamRegistry>>,
) -> impl IntoResponse {
    Json(registry.all_slots())
}

pub(crate) async fn create_schedule(
    Extension(registry): Extension<Arc<ExamRegistry>>,
    Json(payload): Json<NewSchedule>,
) -> impl IntoResponse {
    if payload.end_time <= payload.start_time {
        let body = json!({ "error": "end_time must be after start_time" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }
    let record = registry.add_slot(payload);
    (StatusCode::CREATED, Json(record)).into_response()
}

pub(crate) async fn list_students(
    Extension(registry): Extension<Arc<ExamRegistry>>,
) -> impl IntoResponse {
    Json(registry.all_students())
}

pub(crate) async fn create_student(
    Extension(registry): Extension<Arc<ExamRegistry>>,
    Json(payload): Json<NewStudent>,
) -> impl IntoResponse {
    if payload.usn.trim().is_empty() {
        let body = json!({ "error": "usn is required" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }
    if registry
        .all_students()
        .iter()
        .any(|student| student.usn == payload.usn)
    {
        let body = json!({ "error": "usn already registered" });
        return (StatusCode::CONFLICT, Json(body)).into_response();
    }
    let record = registry.add_student(payload);
    (StatusCode::CREATED, Json(record)).into_response()
}

pub(crate) async fn list_subjects(
    Extension(registry): Extension<Arc<ExamRegistry>>,
) -> impl IntoResponse {
    Json(registry.all_subjects())
}

pub(crate) async fn create_subject(
    Extension(registry): Extension<Arc<ExamRegistry>>,
    Json(payload): Json<NewSubject>,
) -> impl IntoResponse {
    if payload.code.trim().is_empty() {
        let body = json!({ "error": "code is required" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }
    let record = registry.add_subject(payload);
    (StatusCode::CREATED, Json(record)).into_response()
}

fn csv_attachment(filename: &str, body: Vec<u8>) -> axum::response::Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

pub(crate) async fn export_duty_roster(
    Extension(registry): Extension<Arc<ExamRegistry>>,
) -> Result<axum::response::Response, AppError> {
    let mut buffer = Vec::new();
    write_duty_sheet(
        &mut buffer,
        &registry.all_duties(),
        &registry.all_staff(),
        &registry.all_rooms(),
    )?;
    Ok(csv_attachment("duty_roster.csv", buffer))
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeatingExportQuery {
    pub(crate) schedule_id: String,
    pub(crate) subject_id: String,
}

pub(crate) async fn export_seating_chart(
    Extension(registry): Extension<Arc<ExamRegistry>>,
    Query(query): Query<SeatingExportQuery>,
) -> Result<axum::response::Response, AppError> {
    let slot_id = SlotId(query.schedule_id);
    let subject_id = SubjectId(query.subject_id);

    let mut buffer = Vec::new();
    write_seating_chart(
        &mut buffer,
        &registry.seats_for(&slot_id, &subject_id),
        &registry.all_students(),
        &registry.all_rooms(),
        &registry.all_subjects(),
    )?;
    Ok(csv_attachment("seating_chart.csv", buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use examroom::allocation::{DutyAllocationService, SeatAllocationService};
    use tower::ServiceExt;

    fn test_router() -> (axum::Router, Arc<ExamRegistry>) {
        let registry = Arc::new(ExamRegistry::default());
        let duty_service = Arc::new(DutyAllocationService::new(
            registry.clone(),
            registry.clone(),
            registry.clone(),
            registry.clone(),
        ));
        let seat_service = Arc::new(SeatAllocationService::new(
            registry.clone(),
            registry.clone(),
            registry.clone(),
            registry.clone(),
            registry.clone(),
        ));
        (
            with_exam_routes(registry.clone(), duty_service, seat_service),
            registry,
        )
    }

    async fn post_json(
        router: axum::Router,
        path: &str,
        payload: serde_json::Value,
    ) -> axum::response::Response {
        router
            .oneshot(
                axum::http::Request::post(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&payload).unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let (router, _) = test_router();
        let response = router
            .oneshot(
                axum::http::Request::get("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn staff_create_and_list_roundtrip() {
        let (router, registry) = test_router();
        let response = post_json(
            router.clone(),
            "/api/v1/staff",
            json!({ "name": "Anita Rao", "designation": "Professor" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(registry.all_staff().len(), 1);

        let list = router
            .oneshot(
                axum::http::Request::get("/api/v1/staff")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(list.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn room_with_zero_capacity_is_rejected() {
        let (router, registry) = test_router();
        let response = post_json(
            router,
            "/api/v1/rooms",
            json!({ "number": "101", "capacity": 0 }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(registry.all_rooms().is_empty());
    }

    #[tokio::test]
    async fn duplicate_usn_is_rejected() {
        let (router, _) = test_router();
        let student = json!({
            "usn": "1CR21CS001",
            "name": "Student 1",
            "section": "A",
            "semester": 5,
            "branch": "CSE",
        });

        let first = post_json(router.clone(), "/api/v1/students", student.clone()).await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = post_json(router, "/api/v1/students", student).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn duty_roster_export_returns_csv_attachment() {
        let (router, registry) = test_router();
        registry.add_staff(NewStaffMember {
            name: "Anita Rao".to_string(),
            designation: examroom::allocation::domain::Designation::Professor,
            email: None,
            department: None,
        });
        registry.add_room(NewRoom {
            number: "101".to_string(),
            capacity: 30,
            is_active: true,
        });
        registry.add_slot(NewSchedule {
            date: crate::infra::parse_date("2026-03-02").unwrap(),
            shift: examroom::allocation::domain::Shift::Morning,
            start_time: crate::infra::parse_time("09:00").unwrap(),
            end_time: crate::infra::parse_time("12:00").unwrap(),
            is_active: true,
        });

        let allocate = router
            .clone()
            .oneshot(
                axum::http::Request::post("/api/v1/duties/allocate")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(allocate.status(), StatusCode::OK);

        let response = router
            .oneshot(
                axum::http::Request::get("/api/v1/exports/duty-roster")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/csv"));
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("duty_roster.csv"));

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let sheet = String::from_utf8(body.to_vec()).expect("utf8 csv");
        assert!(sheet.contains("Anita Rao"));
        assert!(sheet.lines().count() >= 2);
    }

    #[tokio::test]
    async fn seating_chart_export_returns_csv_attachment() {
        let (router, registry) = test_router();
        registry.add_room(NewRoom {
            number: "101".to_string(),
            capacity: 30,
            is_active: true,
        });
        let slot = registry.add_slot(NewSchedule {
            date: crate::infra::parse_date("2026-03-02").unwrap(),
            shift: examroom::allocation::domain::Shift::Morning,
            start_time: crate::infra::parse_time("09:00").unwrap(),
            end_time: crate::infra::parse_time("12:00").unwrap(),
            is_active: true,
        });
        registry.add_student(NewStudent {
            usn: "1CR21CS001".to_string(),
            name: "Student 1".to_string(),
            section: "A".to_string(),
            semester: 5,
            branch: "CSE".to_string(),
        });
        let subject = registry.add_subject(NewSubject {
            code: "21CS53".to_string(),
            name: "Operating Systems".to_string(),
            semester: 5,
            branch: "CSE".to_string(),
        });

        let allocate = post_json(
            router.clone(),
            "/api/v1/seating/allocate",
            json!({ "schedule_id": slot.id.0.clone(), "subject_id": subject.id.0.clone() }),
        )
        .await;
        assert_eq!(allocate.status(), StatusCode::OK);

        let uri = format!(
            "/api/v1/exports/seating-chart?schedule_id={}&subject_id={}",
            slot.id.0, subject.id.0
        );
        let response = router
            .oneshot(
                axum::http::Request::get(&uri)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/csv"));
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("seating_chart.csv"));

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let sheet = String::from_utf8(body.to_vec()).expect("utf8 csv");
        assert!(sheet.contains("1CR21CS001"));
        assert_eq!(sheet.lines().count(), 2);
    }
}
