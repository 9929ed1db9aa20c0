use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::domain::{AnalysisRequest, ProfileId, ProfileSubmission};
use super::intake::{IntakeGuard, IntakePolicy, IntakeViolation};
use super::repository::{
    ProfileRecord, ProfileRepository, RecommendationError, RecommendationService, RepositoryError,
};
use crate::scoring::total_aps;

/// Service composing intake validation, APS scoring, storage, and the recommendation hook.
pub struct ProfileService<R, S> {
    guard: Arc<IntakeGuard>,
    repository: Arc<R>,
    recommender: Arc<S>,
}

static PROFILE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_profile_id() -> ProfileId {
    let id = PROFILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProfileId(format!("profile-{id:06}"))
}

impl<R, S> ProfileService<R, S>
where
    R: ProfileRepository + 'static,
    S: RecommendationService + 'static,
{
    pub fn new(repository: Arc<R>, recommender: Arc<S>, policy: IntakePolicy) -> Self {
        Self {
            guard: Arc::new(IntakeGuard::with_policy(policy)),
            repository,
            recommender,
        }
    }

    pub fn policy(&self) -> &IntakePolicy {
        self.guard.policy()
    }

    /// Validate and score a submission, returning the stored record.
    pub fn submit(
        &self,
        submission: ProfileSubmission,
    ) -> Result<ProfileRecord, ProfileServiceError> {
        let mut profile = self.guard.profile_from_submission(submission)?;
        profile.profile_id = next_profile_id();

        let record = ProfileRecord {
            profile,
            submitted_at: Utc::now(),
            analysis: None,
        };

        let stored = self.repository.insert(record)?;
        info!(
            profile_id = %stored.profile.profile_id.0,
            subjects = stored.profile.subjects.len(),
            aps = stored.profile.aps_score,
            "profile scored"
        );
        Ok(stored)
    }

    /// Change one subject's mark, re-deriving its level and the profile's APS.
    ///
    /// Any stored analysis was computed for the old score and is discarded.
    pub fn update_mark(
        &self,
        profile_id: &ProfileId,
        index: usize,
        mark: f64,
    ) -> Result<ProfileRecord, ProfileServiceError> {
        let mut record = self.get(profile_id)?;
        let subject = record
            .profile
            .subjects
            .get_mut(index)
            .ok_or(ProfileServiceError::SubjectNotFound { index })?;

        self.guard.check_mark(&subject.name, mark)?;
        subject.set_mark(mark);
        debug!(
            profile_id = %profile_id.0,
            subject = %subject.name,
            level = subject.level,
            "mark updated"
        );

        record.profile.aps_score = total_aps(&record.profile.subjects);
        record.analysis = None;

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Request recommendations for a stored profile and persist the payload.
    ///
    /// The payload is only stored if no mark changed while the backend was
    /// working; otherwise the call fails with [`RepositoryError::Stale`].
    pub fn analyze(&self, profile_id: &ProfileId) -> Result<Value, ProfileServiceError> {
        let record = self.get(profile_id)?;
        let request = AnalysisRequest::from(&record.profile);

        let payload = self.recommender.recommend(&request).map_err(|err| {
            warn!(profile_id = %profile_id.0, error = %err, "recommendation failed");
            err
        })?;
        if !payload.is_object() {
            warn!(profile_id = %profile_id.0, "recommendation payload is not an object");
            return Err(RecommendationError::InvalidResponse(
                "expected a JSON object".to_string(),
            )
            .into());
        }

        self.repository
            .attach_analysis(profile_id, &request, payload.clone())
            .map_err(|err| {
                if matches!(err, RepositoryError::Stale) {
                    warn!(
                        profile_id = %profile_id.0,
                        aps_score = request.aps_score,
                        "profile changed during analysis; payload discarded"
                    );
                }
                err
            })?;
        Ok(payload)
    }

    /// Fetch a profile for API responses.
    pub fn get(&self, profile_id: &ProfileId) -> Result<ProfileRecord, ProfileServiceError> {
        let record = self
            .repository
            .fetch(profile_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the profile service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
    #[error("profile has no subject at position {index}")]
    SubjectNotFound { index: usize },
}
