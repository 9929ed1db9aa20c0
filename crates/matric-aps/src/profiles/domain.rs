use serde::{Deserialize, Serialize};

use crate::scoring::Subject;

/// Identifier wrapper for stored student profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Results captured for one student, either extracted from a certificate or typed in by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    pub subjects: Vec<SubjectEntry>,
}

/// A subject as entered; the level is never taken from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectEntry {
    pub name: String,
    pub mark: f64,
}

impl SubjectEntry {
    pub fn new(name: impl Into<String>, mark: f64) -> Self {
        Self {
            name: name.into(),
            mark,
        }
    }
}

/// Validated student results with levels and APS derived from the marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub profile_id: ProfileId,
    pub name: Option<String>,
    pub id_number: Option<String>,
    pub subjects: Vec<Subject>,
    pub aps_score: i32,
}

/// Payload handed to the recommendation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub subjects: Vec<Subject>,
    pub aps_score: i32,
}

impl From<&StudentProfile> for AnalysisRequest {
    fn from(profile: &StudentProfile) -> Self {
        Self {
            subjects: profile.subjects.clone(),
            aps_score: profile.aps_score,
        }
    }
}

impl AnalysisRequest {
    /// Whether the profile still carries the subjects and score this request was built from.
    pub fn matches(&self, profile: &StudentProfile) -> bool {
        self.aps_score == profile.aps_score && self.subjects == profile.subjects
    }
}
