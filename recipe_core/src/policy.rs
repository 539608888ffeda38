//! Fixed matching and scaling policy

/// Minimum edit-distance similarity for a fuzzy ingredient match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.7;

/// Score assigned when one normalized name contains the other.
pub const SUBSTRING_MATCH_SCORE: f64 = 0.9;

/// Score assigned to an exact (normalized) match.
pub const EXACT_MATCH_SCORE: f64 = 1.0;

/// Absolute tolerance when snapping a decimal remainder to a culinary fraction.
pub const FRACTION_TOLERANCE: f64 = 0.05;

/// A recipe counts as a leftover match at or above this percentage.
pub const LEFTOVER_MATCH_PERCENTAGE: f64 = 80.0;

/// Smallest serving count a user may enter.
pub const MIN_SERVINGS: u32 = 1;

/// Largest serving count a user may enter.
pub const MAX_SERVINGS: u32 = 100;

/// Culinary fractions checked in this order; first entry within tolerance wins.
pub const COMMON_FRACTIONS: [(f64, &str); 5] = [
    (0.25, "1/4"),
    (0.33, "1/3"),
    (0.5, "1/2"),
    (0.67, "2/3"),
    (0.75, "3/4"),
];
