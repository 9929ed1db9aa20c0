use serde::{Deserialize, Serialize};

use super::subject::{is_life_orientation, Subject};

/// Number of best subjects that make up an admission point score.
pub const APS_SUBJECT_COUNT: usize = 6;

/// Explainable APS result: which subjects counted, which ranked below the cutoff, and which
/// were excluded outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApsBreakdown {
    pub total: i32,
    pub counted: Vec<Subject>,
    pub dropped: Vec<Subject>,
    pub excluded: Vec<Subject>,
}

/// Sum of the best six levels, Life Orientation excluded.
///
/// Levels are summed as given; the sum saturates rather than overflowing.
pub fn total_aps(subjects: &[Subject]) -> i32 {
    sum_levels(ranked_qualifying(subjects).into_iter().take(APS_SUBJECT_COUNT))
}

/// Same selection as [`total_aps`], keeping the partition of the input.
pub fn aps_breakdown(subjects: &[Subject]) -> ApsBreakdown {
    let excluded = subjects
        .iter()
        .filter(|subject| is_life_orientation(subject))
        .cloned()
        .collect();

    let mut ranked = ranked_qualifying(subjects).into_iter().cloned();
    let counted: Vec<Subject> = ranked.by_ref().take(APS_SUBJECT_COUNT).collect();
    let dropped = ranked.collect();

    ApsBreakdown {
        total: sum_levels(counted.iter()),
        counted,
        dropped,
        excluded,
    }
}

/// Qualifying subjects ordered by level, highest first. Ties keep input order.
fn ranked_qualifying(subjects: &[Subject]) -> Vec<&Subject> {
    let mut ranked: Vec<&Subject> = subjects
        .iter()
        .filter(|subject| !is_life_orientation(subject))
        .collect();
    ranked.sort_by(|a, b| b.level.cmp(&a.level));
    ranked
}

fn sum_levels<'a>(subjects: impl Iterator<Item = &'a Subject>) -> i32 {
    subjects.fold(0, |sum, subject| sum.saturating_add(subject.level))
}
