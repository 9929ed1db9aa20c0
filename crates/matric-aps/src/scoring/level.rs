/// Lowest achievement level on the national scale.
pub const MIN_LEVEL: i32 = 1;
/// Highest achievement level on the national scale.
pub const MAX_LEVEL: i32 = 7;

/// Inclusive lower bound of each band, highest band first.
const LEVEL_THRESHOLDS: [(f64, i32); 6] = [
    (80.0, 7),
    (70.0, 6),
    (60.0, 5),
    (50.0, 4),
    (40.0, 3),
    (30.0, 2),
];

/// Map a percentage mark to its achievement level (1-7).
///
/// Total over `f64`: marks below 30 (negative values and NaN included) land on level 1 and
/// anything at or above 80 lands on level 7. Range checks on the mark belong to the caller.
pub fn level_of(mark: f64) -> i32 {
    LEVEL_THRESHOLDS
        .iter()
        .find(|(threshold, _)| mark >= *threshold)
        .map(|(_, level)| *level)
        .unwrap_or(MIN_LEVEL)
}
