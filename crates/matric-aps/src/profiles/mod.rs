//! Student profile intake, scoring, and recommendation hand-off.
//!
//! Everything the scoring core leaves to its callers lives here: validating captured marks,
//! keeping levels in step with marks as they are edited, storing the scored profile, and
//! forwarding `(subjects, aps)` to the recommendation backend.

pub mod domain;
pub(crate) mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{AnalysisRequest, ProfileId, ProfileSubmission, StudentProfile, SubjectEntry};
pub use intake::{IntakeGuard, IntakePolicy, IntakeViolation};
pub use repository::{
    ProfileRecord, ProfileRepository, ProfileView, RecommendationError, RecommendationService,
    RepositoryError,
};
pub use router::profile_router;
pub use service::{ProfileService, ProfileServiceError};
