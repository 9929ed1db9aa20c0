use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProfileRepository, StaticRecommendationService};
use crate::routes::with_profile_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use matric_aps::config::AppConfig;
use matric_aps::error::AppError;
use matric_aps::profiles::ProfileService;
use matric_aps::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let profile_service = Arc::new(ProfileService::new(
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(StaticRecommendationService),
        config.intake.policy(),
    ));

    let app = with_profile_routes(profile_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        minimum_subjects = config.intake.minimum_subjects,
        "matric APS service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
