use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use matric_aps::error::AppError;
use matric_aps::profiles::{
    profile_router, ProfileRepository, ProfileService, RecommendationService,
};
use matric_aps::scoring::{aps_breakdown, ApsBreakdown, SubjectImporter};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    pub(crate) csv: String,
}

pub(crate) fn with_profile_routes<R, S>(service: Arc<ProfileService<R, S>>) -> axum::Router
where
    R: ProfileRepository + 'static,
    S: RecommendationService + 'static,
{
    profile_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/aps/import", axum::routing::post(import_endpoint))
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

/// Score a pasted `name,mark` CSV export without storing a profile.
pub(crate) async fn import_endpoint(
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ApsBreakdown>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let subjects = SubjectImporter::from_reader(reader)?;
    Ok(Json(aps_breakdown(&subjects)))
}
