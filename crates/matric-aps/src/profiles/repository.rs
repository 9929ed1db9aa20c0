use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{AnalysisRequest, ProfileId, StudentProfile};
use crate::scoring::Subject;

/// Repository record containing the scored profile and the latest recommendation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub profile: StudentProfile,
    pub submitted_at: DateTime<Utc>,
    pub analysis: Option<Value>,
}

impl ProfileRecord {
    pub fn view(&self) -> ProfileView {
        ProfileView {
            profile_id: self.profile.profile_id.clone(),
            name: self.profile.name.clone(),
            subjects: self.profile.subjects.clone(),
            aps_score: self.profile.aps_score,
            submitted_at: self.submitted_at,
            analysed: self.analysis.is_some(),
        }
    }
}

/// Storage abstraction so the service can be exercised without a real persistence layer.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError>;
    fn update(&self, record: ProfileRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError>;

    /// Store `analysis` only while the profile still matches `scored`.
    ///
    /// Must check and write under the same lock (or transaction) and return
    /// [`RepositoryError::Stale`] when the subjects or score have moved on.
    fn attach_analysis(
        &self,
        id: &ProfileId,
        scored: &AnalysisRequest,
        analysis: Value,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record changed while the request was in flight")]
    Stale,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook to the course, bursary, and career recommendation backend.
///
/// The payload is passed through untouched; its shape belongs to the backend,
/// but it must be a JSON object. Calls may block on network I/O; the router
/// runs them on the blocking thread pool.
pub trait RecommendationService: Send + Sync {
    fn recommend(&self, request: &AnalysisRequest) -> Result<Value, RecommendationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("recommendation backend unavailable: {0}")]
    Unavailable(String),
    #[error("recommendation backend returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// Public representation of a stored profile. The ID number is never echoed back.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub profile_id: ProfileId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub subjects: Vec<Subject>,
    pub aps_score: i32,
    pub submitted_at: DateTime<Utc>,
    pub analysed: bool,
}
