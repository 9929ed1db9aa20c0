use serde::{Deserialize, Serialize};

use super::level::level_of;

/// Normalized name of the subject that never counts toward the APS.
pub const LIFE_ORIENTATION: &str = "life orientation";

/// One examined subject with its percentage mark and derived achievement level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub mark: f64,
    pub level: i32,
}

impl Subject {
    /// Build a subject whose level is derived from `mark`.
    pub fn new(name: impl Into<String>, mark: f64) -> Self {
        Self {
            name: name.into(),
            mark,
            level: level_of(mark),
        }
    }

    /// Replace the mark and recompute the level from it.
    pub fn set_mark(&mut self, mark: f64) {
        self.mark = mark;
        self.level = level_of(mark);
    }

    /// Whether the stored level agrees with the level mapped from the mark.
    pub fn is_consistent(&self) -> bool {
        self.level == level_of(self.mark)
    }

    pub fn normalized_name(&self) -> String {
        normalize_subject_name(&self.name)
    }
}

/// Trim surrounding whitespace and case-fold a subject label for comparisons.
pub fn normalize_subject_name(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn is_life_orientation(subject: &Subject) -> bool {
    subject.normalized_name() == LIFE_ORIENTATION
}
