//! Leftover scanner - which recipes can be cooked from what is on hand

use std::collections::HashSet;

#[cfg(feature = "python")]
use pyo3::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::error::PantryRejection;
use crate::fuzzy::{match_recipe, RecipeMatchResult};
use crate::ingredient::{normalize, Recipe};

/// Ingredients the user has available, normalized and de-duplicated
#[cfg_attr(feature = "python", pyclass)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pantry {
    items: Vec<String>,
}

impl Pantry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, returning its stored (normalized) form.
    pub fn add(&mut self, entry: &str) -> Result<&str, PantryRejection> {
        let entry = normalize(entry);
        if entry.is_empty() {
            return Err(PantryRejection::Empty);
        }
        if self.items.contains(&entry) {
            return Err(PantryRejection::Duplicate(entry));
        }
        self.items.push(entry);
        Ok(self.items.last().map(String::as_str).unwrap_or_default())
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Pantry {
    /// Blank and repeated entries are dropped.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut pantry = Pantry::new();
        for entry in iter {
            let _ = pantry.add(entry.as_ref());
        }
        pantry
    }
}

/// A recipe that cleared the leftover cutoff
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeftoverMatch<'a> {
    pub recipe: &'a Recipe,
    #[serde(flatten)]
    pub result: RecipeMatchResult,
}

/// Combine the public catalogue with the user's own recipes
///
/// Own recipes whose id already appears among the public ones are dropped.
/// Recipes without an id are always kept.
pub fn merge_recipe_sources(public: Vec<Recipe>, own: Vec<Recipe>) -> Vec<Recipe> {
    let public_ids: HashSet<String> = public.iter().filter_map(|r| r.id.clone()).collect();

    let mut merged = public;
    merged.extend(
        own.into_iter()
            .filter(|recipe| !matches!(&recipe.id, Some(id) if public_ids.contains(id))),
    );
    merged
}

/// Rank recipes by how much of each the pantry covers
///
/// Only recipes at or above the leftover cutoff are returned, best first.
/// Equal percentages keep their input order.
pub fn scan_leftovers<'a, S>(
    recipes: &'a [Recipe],
    pantry: &[S],
    config: &ScanConfig,
) -> Vec<LeftoverMatch<'a>>
where
    S: AsRef<str> + Sync,
{
    if pantry.is_empty() {
        debug!("Empty pantry, nothing to scan");
        return Vec::new();
    }

    let evaluate = |recipe: &'a Recipe| {
        let result = match_recipe(recipe, pantry);
        result.is_leftover_match().then_some(LeftoverMatch { recipe, result })
    };

    let parallel = recipes.len() >= config.parallel_min_recipes;
    debug!(candidates = recipes.len(), parallel, "Scanning recipes");

    let mut matches: Vec<LeftoverMatch<'a>> = if parallel {
        recipes.par_iter().filter_map(evaluate).collect()
    } else {
        recipes.iter().filter_map(evaluate).collect()
    };

    matches.sort_by(|a, b| b.result.percentage.total_cmp(&a.result.percentage));

    info!(
        candidates = recipes.len(),
        pantry = pantry.len(),
        found = matches.len(),
        "Leftover scan complete"
    );
    matches
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pymethods]
impl Pantry {
    #[new]
    #[pyo3(signature = (entries=Vec::new()))]
    fn py_new(entries: Vec<String>) -> Self {
        entries.into_iter().collect()
    }

    #[pyo3(name = "add")]
    fn py_add(&mut self, entry: &str) -> PyResult<String> {
        self.add(entry)
            .map(str::to_string)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
    }

    #[pyo3(name = "remove")]
    fn py_remove(&mut self, index: usize) -> Option<String> {
        self.remove(index)
    }

    #[pyo3(name = "clear")]
    fn py_clear(&mut self) {
        self.clear()
    }

    #[getter]
    fn get_items(&self) -> Vec<String> {
        self.items.clone()
    }

    fn __len__(&self) -> usize {
        self.items.len()
    }

    fn __repr__(&self) -> String {
        format!("Pantry({:?})", self.items)
    }
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "merge_recipe_sources")]
pub fn py_merge_recipe_sources(public: Vec<Recipe>, own: Vec<Recipe>) -> Vec<Recipe> {
    merge_recipe_sources(public, own)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "scan_leftovers")]
pub fn py_scan_leftovers(
    recipes: Vec<Recipe>,
    pantry: Vec<String>,
) -> Vec<(Recipe, RecipeMatchResult)> {
    scan_leftovers(&recipes, &pantry, &ScanConfig::load())
        .into_iter()
        .map(|m| (m.recipe.clone(), m.result))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::RecipeIngredient;
    use crate::policy::LEFTOVER_MATCH_PERCENTAGE;
    use pretty_assertions::assert_eq;

    fn recipe(id: &str, names: &[&str]) -> Recipe {
        Recipe::new(names.iter().map(|n| RecipeIngredient::named(*n)).collect(), 2).with_id(id)
    }

    fn ids(matches: &[LeftoverMatch<'_>]) -> Vec<String> {
        matches.iter().filter_map(|m| m.recipe.id.clone()).collect()
    }

    #[test]
    fn test_pantry_normalizes_and_rejects() {
        let mut pantry = Pantry::new();
        assert_eq!(pantry.add("  Tomatoes "), Ok("tomatoes"));
        assert_eq!(pantry.add("   "), Err(PantryRejection::Empty));
        assert_eq!(pantry.add("TOMATOES"), Err(PantryRejection::Duplicate("tomatoes".to_string())));
        assert_eq!(pantry.add("basil"), Ok("basil"));
        assert_eq!(pantry.items(), ["tomatoes", "basil"]);

        assert_eq!(pantry.remove(5), None);
        assert_eq!(pantry.remove(0), Some("tomatoes".to_string()));
        assert_eq!(pantry.items(), ["basil"]);

        pantry.clear();
        assert!(pantry.is_empty());
    }

    #[test]
    fn test_pantry_from_iter_drops_blank_and_repeats() {
        let pantry: Pantry = ["egg", "", "Egg", "milk"].into_iter().collect();
        assert_eq!(pantry.items(), ["egg", "milk"]);
    }

    #[test]
    fn test_merge_prefers_public_copy() {
        let public = vec![recipe("a", &["egg"]), recipe("b", &["milk"])];
        let own = vec![
            recipe("b", &["butter"]),
            recipe("c", &["flour"]),
            Recipe::new(vec![RecipeIngredient::named("salt")], 1),
        ];

        let merged = merge_recipe_sources(public, own);
        let merged_ids: Vec<Option<&str>> = merged.iter().map(|r| r.id.as_deref()).collect();
        assert_eq!(merged_ids, vec![Some("a"), Some("b"), Some("c"), None]);
        assert_eq!(merged[1].ingredients[0].name, "milk");
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let recipes = vec![
            recipe("half", &["egg", "bacon"]),
            recipe("four-fifths", &["egg", "milk", "flour", "sugar", "vanilla"]),
            recipe("full", &["egg", "milk"]),
            recipe("full-too", &["milk"]),
        ];
        let pantry = ["egg", "milk", "flour", "sugar"];

        let matches = scan_leftovers(&recipes, &pantry, &ScanConfig::sequential());
        assert_eq!(ids(&matches), vec!["full", "full-too", "four-fifths"]);
        assert_eq!(matches[2].result.percentage, LEFTOVER_MATCH_PERCENTAGE);
    }

    #[test]
    fn test_scan_with_empty_pantry_finds_nothing() {
        let recipes = vec![recipe("a", &["egg"])];
        let empty: [&str; 0] = [];
        assert!(scan_leftovers(&recipes, &empty, &ScanConfig::default()).is_empty());
    }

    #[test]
    fn test_parallel_scan_matches_sequential() {
        let recipes: Vec<Recipe> = (0..50)
            .map(|i| match i % 3 {
                0 => recipe(&format!("r{i}"), &["egg", "milk"]),
                1 => recipe(&format!("r{i}"), &["egg", "milk", "flour", "yeast", "salt"]),
                _ => recipe(&format!("r{i}"), &["egg", "saffron"]),
            })
            .collect();
        let pantry = ["eggs", "whole milk", "flour", "salt"];

        let sequential = scan_leftovers(&recipes, &pantry, &ScanConfig::sequential());
        let parallel = scan_leftovers(&recipes, &pantry, &ScanConfig { parallel_min_recipes: 1 });
        assert_eq!(ids(&sequential), ids(&parallel));
        assert_eq!(sequential.len(), 34);
    }
}
