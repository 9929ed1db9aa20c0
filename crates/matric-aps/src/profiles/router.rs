use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::{ProfileId, ProfileSubmission};
use super::repository::{ProfileRepository, RecommendationService, RepositoryError};
use super::service::{ProfileService, ProfileServiceError};
use crate::scoring::{aps_breakdown, level_of, ApsBreakdown, Subject};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelRequest {
    pub mark: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelResponse {
    pub mark: f64,
    pub level: i32,
}

/// Ad-hoc scoring payload. Levels default to the mapped mark when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub subjects: Vec<ScoreSubject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSubject {
    pub name: String,
    pub mark: f64,
    #[serde(default)]
    pub level: Option<i32>,
}

impl From<ScoreSubject> for Subject {
    fn from(value: ScoreSubject) -> Self {
        match value.level {
            Some(level) => Subject {
                name: value.name,
                mark: value.mark,
                level,
            },
            None => Subject::new(value.name, value.mark),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarkUpdate {
    pub mark: f64,
}

/// Router builder exposing scoring and profile endpoints.
pub fn profile_router<R, S>(service: Arc<ProfileService<R, S>>) -> Router
where
    R: ProfileRepository + 'static,
    S: RecommendationService + 'static,
{
    Router::new()
        .route("/api/v1/aps/level", post(level_handler))
        .route("/api/v1/aps/score", post(score_handler))
        .route("/api/v1/profiles", post(submit_handler::<R, S>))
        .route("/api/v1/profiles/:profile_id", get(profile_handler::<R, S>))
        .route(
            "/api/v1/profiles/:profile_id/subjects/:index",
            put(update_mark_handler::<R, S>),
        )
        .route(
            "/api/v1/profiles/:profile_id/analysis",
            post(analysis_handler::<R, S>),
        )
        .with_state(service)
}

pub(crate) async fn level_handler(Json(request): Json<LevelRequest>) -> Json<LevelResponse> {
    Json(LevelResponse {
        mark: request.mark,
        level: level_of(request.mark),
    })
}

pub(crate) async fn score_handler(Json(request): Json<ScoreRequest>) -> Json<ApsBreakdown> {
    let subjects: Vec<Subject> = request.subjects.into_iter().map(Subject::from).collect();
    Json(aps_breakdown(&subjects))
}

pub(crate) async fn submit_handler<R, S>(
    State(service): State<Arc<ProfileService<R, S>>>,
    Json(submission): Json<ProfileSubmission>,
) -> Response
where
    R: ProfileRepository + 'static,
    S: RecommendationService + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn profile_handler<R, S>(
    State(service): State<Arc<ProfileService<R, S>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    S: RecommendationService + 'static,
{
    match service.get(&ProfileId(profile_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_mark_handler<R, S>(
    State(service): State<Arc<ProfileService<R, S>>>,
    Path((profile_id, index)): Path<(String, usize)>,
    Json(update): Json<MarkUpdate>,
) -> Response
where
    R: ProfileRepository + 'static,
    S: RecommendationService + 'static,
{
    match service.update_mark(&ProfileId(profile_id), index, update.mark) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn analysis_handler<R, S>(
    State(service): State<Arc<ProfileService<R, S>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    S: RecommendationService + 'static,
{
    let id = ProfileId(profile_id);
    let outcome = {
        let id = id.clone();
        tokio::task::spawn_blocking(move || service.analyze(&id)).await
    };
    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            error!(profile_id = %id.0, error = %err, "analysis task failed");
            let payload = json!({ "error": "analysis task failed" });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
        }
    };

    match result {
        Ok(payload) => {
            let body = json!({
                "profile_id": id.0,
                "analysis": payload,
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: ProfileServiceError) -> Response {
    let status = match &err {
        ProfileServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProfileServiceError::Repository(RepositoryError::Conflict | RepositoryError::Stale) => {
            StatusCode::CONFLICT
        }
        ProfileServiceError::Repository(RepositoryError::NotFound)
        | ProfileServiceError::SubjectNotFound { .. } => StatusCode::NOT_FOUND,
        ProfileServiceError::Recommendation(_) => StatusCode::BAD_GATEWAY,
        ProfileServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
