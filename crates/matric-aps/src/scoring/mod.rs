//! Admission point score (APS) engine.
//!
//! Pure functions over caller-owned subject lists: [`level_of`] maps a percentage mark onto
//! the national 1-7 achievement scale and [`total_aps`] sums the best six levels with Life
//! Orientation excluded. Nothing here validates input or holds state; validation lives with
//! the callers in [`crate::profiles`].

mod aggregate;
mod import;
mod level;
mod subject;

pub use aggregate::{aps_breakdown, total_aps, ApsBreakdown, APS_SUBJECT_COUNT};
pub use import::{SubjectImportError, SubjectImporter};
pub use level::{level_of, MAX_LEVEL, MIN_LEVEL};
pub use subject::{is_life_orientation, normalize_subject_name, Subject, LIFE_ORIENTATION};
