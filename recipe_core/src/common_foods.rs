//! Common pantry staples that never go on a shopping list

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::Serialize;

use crate::ingredient::{normalize, IngredientRef, RecipeIngredient};

pub const RECIPE_CATEGORY: &str = "recipe";

/// Shopping-list line drafted from a recipe
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub name: String,
    pub quantity: String,
    pub category: String,
}

fn common_names<S: AsRef<str>>(common_foods: &[S]) -> Vec<String> {
    common_foods
        .iter()
        .map(|food| normalize(food.as_ref()))
        .filter(|food| !food.is_empty())
        .collect()
}

fn contains_any(name: &str, common: &[String]) -> bool {
    let name = normalize(name);
    common.iter().any(|food| name.contains(food.as_str()))
}

/// Whether the ingredient's name contains any common food
pub fn is_common_food<'a, S: AsRef<str>>(
    ingredient: impl Into<IngredientRef<'a>>,
    common_foods: &[S],
) -> bool {
    contains_any(ingredient.into().name(), &common_names(common_foods))
}

/// Drop every ingredient that contains a common food, keeping order
pub fn filter_common_foods<T, S>(ingredients: &[T], common_foods: &[S]) -> Vec<T>
where
    T: Clone,
    for<'a> &'a T: Into<IngredientRef<'a>>,
    S: AsRef<str>,
{
    let common = common_names(common_foods);
    ingredients
        .iter()
        .filter(|ingredient| !contains_any((*ingredient).into().name(), &common))
        .cloned()
        .collect()
}

/// Draft shopping-list items for the non-staple ingredients of a recipe
pub fn shopping_items<S: AsRef<str>>(
    ingredients: &[RecipeIngredient],
    servings: u32,
    common_foods: &[S],
) -> Vec<ShoppingItem> {
    let quantity = if servings > 0 {
        format!("for {servings} servings")
    } else {
        String::new()
    };

    filter_common_foods(ingredients, common_foods)
        .into_iter()
        .map(|ingredient| ShoppingItem {
            name: ingredient.name,
            quantity: quantity.clone(),
            category: RECIPE_CATEGORY.to_string(),
        })
        .collect()
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "filter_common_foods")]
pub fn py_filter_common_foods(
    ingredients: Vec<RecipeIngredient>,
    common_foods: Option<Vec<String>>,
) -> Vec<RecipeIngredient> {
    filter_common_foods(&ingredients, &common_foods.unwrap_or_default())
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "shopping_items")]
pub fn py_shopping_items(
    ingredients: Vec<RecipeIngredient>,
    servings: u32,
    common_foods: Option<Vec<String>>,
) -> Vec<ShoppingItem> {
    shopping_items(&ingredients, servings, &common_foods.unwrap_or_default())
}
