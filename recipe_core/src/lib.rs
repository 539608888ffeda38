//! Recipe Core - ingredient matching and servings scaling for the recipe app
//!
//! Provides fuzzy pantry matching, the leftover scanner, quantity scaling with
//! culinary fractions, common-food filtering and recipe/ingredient file import.

pub mod common_foods;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod import;
pub mod ingredient;
pub mod policy;
pub mod scaler;
pub mod scanner;

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub use common_foods::{filter_common_foods, is_common_food, shopping_items, ShoppingItem};
pub use config::ScanConfig;
pub use error::{ImportError, PantryRejection, ServingsError};
pub use fuzzy::{
    match_ingredient, match_recipe, similarity, IngredientMatch, MatchResult, RecipeMatchResult,
};
pub use import::{load_pantry_lines, load_recipes_json, parse_ingredient_file};
pub use ingredient::{normalize, IngredientRef, Recipe, RecipeIngredient};
pub use scaler::{parse_servings, scale_all, scale_ingredient, scale_recipe};
pub use scanner::{merge_recipe_sources, scan_leftovers, LeftoverMatch, Pantry};

/// Recipe Core Python Module
#[cfg(feature = "python")]
#[pymodule]
fn recipe_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Matching
    m.add_function(wrap_pyfunction!(fuzzy::py_similarity, m)?)?;
    m.add_function(wrap_pyfunction!(fuzzy::py_match_ingredient, m)?)?;
    m.add_function(wrap_pyfunction!(fuzzy::py_match_recipe, m)?)?;

    // Leftover scanner
    m.add_function(wrap_pyfunction!(scanner::py_merge_recipe_sources, m)?)?;
    m.add_function(wrap_pyfunction!(scanner::py_scan_leftovers, m)?)?;

    // Scaling
    m.add_function(wrap_pyfunction!(scaler::py_scale_ingredient, m)?)?;
    m.add_function(wrap_pyfunction!(scaler::py_scale_all, m)?)?;
    m.add_function(wrap_pyfunction!(scaler::py_parse_servings, m)?)?;

    // Shopping list
    m.add_function(wrap_pyfunction!(common_foods::py_filter_common_foods, m)?)?;
    m.add_function(wrap_pyfunction!(common_foods::py_shopping_items, m)?)?;

    // Import
    m.add_function(wrap_pyfunction!(import::py_load_recipes_json, m)?)?;
    m.add_function(wrap_pyfunction!(import::py_parse_ingredient_file, m)?)?;

    // Register classes
    m.add_class::<ingredient::RecipeIngredient>()?;
    m.add_class::<ingredient::Recipe>()?;
    m.add_class::<fuzzy::MatchResult>()?;
    m.add_class::<fuzzy::IngredientMatch>()?;
    m.add_class::<fuzzy::RecipeMatchResult>()?;
    m.add_class::<scanner::Pantry>()?;
    m.add_class::<common_foods::ShoppingItem>()?;

    Ok(())
}
