use crate::cli::ServeArgs;
use crate::infra::{AppState, ExamRegistry};
use crate::routes::with_exam_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use examroom::allocation::{DutyAllocationService, SeatAllocationService};
use examroom::config::AppConfig;
use examroom::error::AppError;
use examroom::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

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

    let app = with_exam_routes(registry, duty_service, seat_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "exam allocation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
