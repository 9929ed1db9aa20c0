use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::profiles::domain::{AnalysisRequest, ProfileId, ProfileSubmission, SubjectEntry};
use crate::profiles::repository::{
    ProfileRecord, ProfileRepository, RecommendationError, RecommendationService, RepositoryError,
};
use crate::profiles::{profile_router, IntakeGuard, IntakePolicy, ProfileService};

pub(super) fn submission() -> ProfileSubmission {
    ProfileSubmission {
        name: Some("Thandi Mokoena".to_string()),
        id_number: Some("0503125123086".to_string()),
        subjects: vec![
            SubjectEntry::new("Life Orientation", 80.0),
            SubjectEntry::new("Mathematics", 80.0),
            SubjectEntry::new("Physical Sciences", 70.0),
            SubjectEntry::new("English Home Language", 60.0),
            SubjectEntry::new("History", 50.0),
            SubjectEntry::new("Geography", 50.0),
            SubjectEntry::new("Accounting", 40.0),
            SubjectEntry::new("Visual Arts", 30.0),
        ],
    }
}

pub(super) fn short_submission() -> ProfileSubmission {
    let mut submission = submission();
    submission.subjects.truncate(2);
    submission
}

pub(super) fn guard() -> IntakeGuard {
    IntakeGuard::default()
}

pub(super) fn build_service() -> (
    ProfileService<MemoryRepository, StubRecommender>,
    Arc<MemoryRepository>,
    Arc<StubRecommender>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let recommender = Arc::new(StubRecommender::default());
    let service = ProfileService::new(
        repository.clone(),
        recommender.clone(),
        IntakePolicy::default(),
    );
    (service, repository, recommender)
}

pub(super) fn profile_router_with_service(
    service: ProfileService<MemoryRepository, StubRecommender>,
) -> axum::Router {
    profile_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ProfileId, ProfileRecord>>>,
}

impl ProfileRepository for MemoryRepository {
    fn insert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.profile.profile_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.profile.profile_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ProfileRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.profile.profile_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn attach_analysis(
        &self,
        id: &ProfileId,
        scored: &AnalysisRequest,
        analysis: Value,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if !scored.matches(&record.profile) {
            return Err(RepositoryError::Stale);
        }
        record.analysis = Some(analysis);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl ProfileRepository for ConflictRepository {
    fn insert(&self, _record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: ProfileRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Ok(None)
    }

    fn attach_analysis(
        &self,
        _id: &ProfileId,
        _scored: &AnalysisRequest,
        _analysis: Value,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableRepository;

impl ProfileRepository for UnavailableRepository {
    fn insert(&self, _record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn update(&self, _record: ProfileRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn fetch(&self, _id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn attach_analysis(
        &self,
        _id: &ProfileId,
        _scored: &AnalysisRequest,
        _analysis: Value,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }
}

/// Records every request and answers with a fixed summary.
#[derive(Default, Clone)]
pub(super) struct StubRecommender {
    requests: Arc<Mutex<Vec<AnalysisRequest>>>,
}

impl StubRecommender {
    pub(super) fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().expect("recommender mutex poisoned").clone()
    }
}

impl RecommendationService for StubRecommender {
    fn recommend(&self, request: &AnalysisRequest) -> Result<Value, RecommendationError> {
        self.requests
            .lock()
            .expect("recommender mutex poisoned")
            .push(request.clone());
        Ok(json!({
            "summary": { "title": format!("Career Analysis for APS {}", request.aps_score) },
            "courses": [],
        }))
    }
}

pub(super) struct OfflineRecommender;

impl RecommendationService for OfflineRecommender {
    fn recommend(&self, _request: &AnalysisRequest) -> Result<Value, RecommendationError> {
        Err(RecommendationError::Unavailable("timeout".to_string()))
    }
}

/// Answers with a list, which the service refuses to store.
pub(super) struct MalformedRecommender;

impl RecommendationService for MalformedRecommender {
    fn recommend(&self, request: &AnalysisRequest) -> Result<Value, RecommendationError> {
        Ok(json!([request.aps_score]))
    }
}

/// Blocks inside `recommend` until the test releases it, so edits can land mid-analysis.
pub(super) struct GatedRecommender {
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl GatedRecommender {
    /// Returns the recommender, the "entered" signal, and the release handle.
    pub(super) fn new() -> (Self, Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let recommender = Self {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        (recommender, entered_rx, release_tx)
    }
}

impl RecommendationService for GatedRecommender {
    fn recommend(&self, request: &AnalysisRequest) -> Result<Value, RecommendationError> {
        self.entered
            .lock()
            .expect("gate mutex poisoned")
            .send(())
            .map_err(|_| RecommendationError::Unavailable("gate closed".to_string()))?;
        self.release
            .lock()
            .expect("gate mutex poisoned")
            .recv()
            .map_err(|_| RecommendationError::Unavailable("gate closed".to_string()))?;
        Ok(json!({ "aps": request.aps_score }))
    }
}

/// Rewrites every stored score while the analysis is in flight.
pub(super) struct EditingRecommender {
    pub(super) repository: Arc<MemoryRepository>,
}

impl RecommendationService for EditingRecommender {
    fn recommend(&self, _request: &AnalysisRequest) -> Result<Value, RecommendationError> {
        let mut records = self
            .repository
            .records
            .lock()
            .expect("repository mutex poisoned");
        for record in records.values_mut() {
            record.profile.aps_score += 1;
        }
        Ok(json!({ "courses": [] }))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
