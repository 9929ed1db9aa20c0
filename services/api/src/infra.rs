use chrono::Utc;
use matric_aps::profiles::{
    AnalysisRequest, ProfileId, ProfileRecord, ProfileRepository, RecommendationError,
    RecommendationService, RepositoryError,
};
use matric_aps::scoring::Subject;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local profile store; profiles do not survive a restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<ProfileId, ProfileRecord>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
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
        if guard.contains_key(&record.profile.profile_id) {
            guard.insert(record.profile.profile_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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

/// Placeholder recommendation backend that answers with an empty plan for the given score.
#[derive(Default, Clone)]
pub(crate) struct StaticRecommendationService;

impl RecommendationService for StaticRecommendationService {
    fn recommend(&self, request: &AnalysisRequest) -> Result<Value, RecommendationError> {
        Ok(json!({
            "summary": {
                "title": format!("Career Analysis for APS {}", request.aps_score),
                "overview": "Comprehensive analysis based on your matric results.",
                "strengths": [],
                "limitations": [],
            },
            "courses": [],
            "bursaries": [],
            "careers": [],
            "actionPlan": [],
            "generatedAt": Utc::now().to_rfc3339(),
        }))
    }
}

/// Parse a `NAME=MARK` command-line subject.
pub(crate) fn parse_subject(raw: &str) -> Result<Subject, String> {
    let (name, mark) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=MARK, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing subject name in '{raw}'"));
    }
    let mark = mark
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse mark in '{raw}' ({err})"))?;
    Ok(Subject::new(name, mark))
}
