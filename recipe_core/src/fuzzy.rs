//! Fuzzy ingredient matching for the leftover scanner

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::Serialize;
use strsim::normalized_levenshtein;
use tracing::debug;

use crate::ingredient::{normalize, IngredientRef, Recipe, RecipeIngredient};
use crate::policy::{
    EXACT_MATCH_SCORE, FUZZY_MATCH_THRESHOLD, LEFTOVER_MATCH_PERCENTAGE, SUBSTRING_MATCH_SCORE,
};

/// Outcome of comparing one recipe ingredient against a pantry
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub matched: bool,
    pub score: f64,
    /// The pantry entry as the user supplied it.
    pub matched_with: Option<String>,
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self {
            matched: false,
            score: 0.0,
            matched_with: None,
        }
    }

    fn found(candidate: &str, score: f64) -> Self {
        Self {
            matched: true,
            score,
            matched_with: Some(candidate.to_string()),
        }
    }
}

/// A recipe ingredient paired with its match outcome
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientMatch {
    pub ingredient: RecipeIngredient,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Whole-recipe coverage by a pantry
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeMatchResult {
    /// Unrounded, 0..=100.
    pub percentage: f64,
    pub matched_count: usize,
    pub total_count: usize,
    pub matches: Vec<IngredientMatch>,
}

impl RecipeMatchResult {
    /// Result for a recipe that was never compared against a pantry.
    pub fn unscanned(total_count: usize) -> Self {
        Self {
            percentage: 0.0,
            matched_count: 0,
            total_count,
            matches: Vec::new(),
        }
    }

    pub fn display_percentage(&self) -> u32 {
        self.percentage.round() as u32
    }

    pub fn summary_label(&self) -> String {
        format!("{} of {} ingredients", self.matched_count, self.total_count)
    }

    pub fn is_leftover_match(&self) -> bool {
        self.percentage >= LEFTOVER_MATCH_PERCENTAGE
    }
}

/// Similarity of two names in [0, 1]
///
/// Identical names score 1.0 and containment scores a flat 0.9; anything
/// else falls back to normalized Levenshtein distance.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    normalized_similarity(&a, &b)
}

fn normalized_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return EXACT_MATCH_SCORE;
    }
    if a.contains(b) || b.contains(a) {
        return SUBSTRING_MATCH_SCORE;
    }
    // Both-empty is caught by the equality check above.
    normalized_levenshtein(a, b)
}

/// Match one recipe ingredient against the pantry
///
/// The first exact match ends the scan. Substring and fuzzy candidates only
/// replace the running best when they score strictly higher, so earlier
/// pantry entries win ties.
pub fn match_ingredient<'a, S: AsRef<str>>(
    ingredient: impl Into<IngredientRef<'a>>,
    pantry: &[S],
) -> MatchResult {
    let name = ingredient.into().normalized_name();
    if name.is_empty() || pantry.is_empty() {
        return MatchResult::no_match();
    }

    let mut best = MatchResult::no_match();
    for candidate in pantry {
        let candidate = candidate.as_ref();
        let normalized = normalize(candidate);
        if name == normalized {
            return MatchResult::found(candidate, EXACT_MATCH_SCORE);
        }

        let score = normalized_similarity(&name, &normalized);
        if score >= FUZZY_MATCH_THRESHOLD && score > best.score {
            best = MatchResult::found(candidate, score);
        }
    }

    best
}

/// Match every ingredient of a recipe and aggregate to a percentage
pub fn match_recipe<S: AsRef<str>>(recipe: &Recipe, pantry: &[S]) -> RecipeMatchResult {
    if recipe.ingredients.is_empty() {
        return RecipeMatchResult::unscanned(0);
    }

    let matches: Vec<IngredientMatch> = recipe
        .ingredients
        .iter()
        .map(|ingredient| IngredientMatch {
            ingredient: ingredient.clone(),
            result: match_ingredient(ingredient, pantry),
        })
        .collect();

    let total_count = matches.len();
    let matched_count = matches.iter().filter(|m| m.result.matched).count();
    let percentage = matched_count as f64 / total_count as f64 * 100.0;

    debug!(
        recipe = recipe.id.as_deref().unwrap_or("-"),
        matched_count, total_count, percentage, "Matched recipe against pantry"
    );

    RecipeMatchResult {
        percentage,
        matched_count,
        total_count,
        matches,
    }
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pymethods]
impl RecipeMatchResult {
    fn __repr__(&self) -> String {
        format!(
            "RecipeMatchResult(percentage={:.1}, matched={}/{})",
            self.percentage, self.matched_count, self.total_count
        )
    }
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "similarity")]
pub fn py_similarity(a: &str, b: &str) -> f64 {
    similarity(a, b)
}

/// A bare name or a `RecipeIngredient`, whichever Python passed in.
#[cfg(feature = "python")]
#[derive(FromPyObject)]
pub enum PyIngredientArg {
    Structured(RecipeIngredient),
    PlainName(String),
}

#[cfg(feature = "python")]
impl<'a> From<&'a PyIngredientArg> for IngredientRef<'a> {
    fn from(arg: &'a PyIngredientArg) -> Self {
        match arg {
            PyIngredientArg::Structured(ingredient) => IngredientRef::Structured(ingredient),
            PyIngredientArg::PlainName(name) => IngredientRef::PlainName(name),
        }
    }
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "match_ingredient")]
pub fn py_match_ingredient(
    ingredient: Option<PyIngredientArg>,
    pantry: Option<Vec<String>>,
) -> MatchResult {
    match (ingredient, pantry) {
        (Some(ingredient), Some(pantry)) => match_ingredient(&ingredient, &pantry),
        _ => MatchResult::no_match(),
    }
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "match_recipe")]
pub fn py_match_recipe(recipe: Recipe, pantry: Option<Vec<String>>) -> RecipeMatchResult {
    match pantry {
        Some(pantry) => match_recipe(&recipe, &pantry),
        None => RecipeMatchResult::unscanned(recipe.ingredients.len()),
    }
}
