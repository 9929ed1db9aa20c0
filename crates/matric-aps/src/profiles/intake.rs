use super::domain::{ProfileId, ProfileSubmission, StudentProfile, SubjectEntry};
use crate::scoring::{total_aps, Subject};

/// Validation errors raised before a subject list is scored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("at least {required} subjects are required, found {found}")]
    TooFewSubjects { required: usize, found: usize },
    #[error("subject {index} has no name")]
    BlankSubjectName { index: usize },
    #[error("mark for {subject} must be between 0 and 100, found {mark}")]
    MarkOutOfRange { subject: String, mark: f64 },
    #[error("ID number must be 13 digits")]
    MalformedIdNumber,
}

const ID_NUMBER_LENGTH: usize = 13;
const MAX_MARK: f64 = 100.0;

/// Policy dial backing intake validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakePolicy {
    minimum_subjects: usize,
}

impl IntakePolicy {
    pub const DEFAULT_MINIMUM_SUBJECTS: usize = 3;

    pub fn new(minimum_subjects: usize) -> Self {
        let sanitized = if minimum_subjects == 0 {
            Self::DEFAULT_MINIMUM_SUBJECTS
        } else {
            minimum_subjects
        };

        Self {
            minimum_subjects: sanitized,
        }
    }

    pub fn minimum_subjects(&self) -> usize {
        self.minimum_subjects
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MINIMUM_SUBJECTS)
    }
}

/// Guard responsible for producing `StudentProfile` instances.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Validate a submission and score it. The returned profile carries a placeholder id.
    pub fn profile_from_submission(
        &self,
        submission: ProfileSubmission,
    ) -> Result<StudentProfile, IntakeViolation> {
        let ProfileSubmission {
            name,
            id_number,
            subjects,
        } = submission;

        if subjects.len() < self.policy.minimum_subjects {
            return Err(IntakeViolation::TooFewSubjects {
                required: self.policy.minimum_subjects,
                found: subjects.len(),
            });
        }

        let id_number = match id_number.map(|raw| raw.trim().to_string()) {
            Some(value) if value.is_empty() => None,
            Some(value) => {
                validate_id_number(&value)?;
                Some(value)
            }
            None => None,
        };

        let subjects = subjects
            .into_iter()
            .enumerate()
            .map(|(index, entry)| self.subject_from_entry(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let aps_score = total_aps(&subjects);

        Ok(StudentProfile {
            profile_id: ProfileId(String::new()),
            name: name
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            id_number,
            subjects,
            aps_score,
        })
    }

    pub fn check_mark(&self, subject: &str, mark: f64) -> Result<(), IntakeViolation> {
        if mark.is_finite() && (0.0..=MAX_MARK).contains(&mark) {
            Ok(())
        } else {
            Err(IntakeViolation::MarkOutOfRange {
                subject: subject.to_string(),
                mark,
            })
        }
    }

    fn subject_from_entry(
        &self,
        index: usize,
        entry: SubjectEntry,
    ) -> Result<Subject, IntakeViolation> {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(IntakeViolation::BlankSubjectName { index });
        }
        self.check_mark(name, entry.mark)?;
        Ok(Subject::new(name, entry.mark))
    }
}

fn validate_id_number(value: &str) -> Result<(), IntakeViolation> {
    if value.len() == ID_NUMBER_LENGTH && value.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(())
    } else {
        Err(IntakeViolation::MalformedIdNumber)
    }
}
