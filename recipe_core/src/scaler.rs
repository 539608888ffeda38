//! Servings scaling of ingredient quantities
//!
//! Quantities are free text. Plain decimals are scaled and snapped to the
//! nearest common culinary fraction; fractions and mixed numbers are scaled
//! and written back as plain decimals; anything else passes through.

use std::sync::LazyLock;

#[cfg(feature = "python")]
use pyo3::prelude::*;
use regex::Regex;
use tracing::debug;

use crate::error::ServingsError;
use crate::ingredient::{Recipe, RecipeIngredient};
use crate::policy::{COMMON_FRACTIONS, FRACTION_TOLERANCE, MAX_SERVINGS, MIN_SERVINGS};

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)$").expect("valid decimal pattern"));

/// Optional whole part, then numerator/denominator. Unanchored.
static FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)?\s*(\d+)/(\d+)").expect("valid fraction pattern"));

/// How a quantity string was understood
#[derive(Debug, Clone, Copy, PartialEq)]
enum Quantity {
    Decimal(f64),
    Fraction(f64),
}

fn parse_quantity(text: &str) -> Option<Quantity> {
    let text = text.trim();
    if DECIMAL_RE.is_match(text) {
        return text
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Quantity::Decimal);
    }

    let caps = FRACTION_RE.captures(text)?;
    let whole = match caps.get(1) {
        Some(m) => m.as_str().parse::<f64>().ok()?,
        None => 0.0,
    };
    let numerator = caps[2].parse::<f64>().ok()?;
    let denominator = caps[3].parse::<f64>().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(Quantity::Fraction(whole + numerator / denominator))
}

/// Two decimal places, no trailing zeros: 2.50 -> "2.5", 2.00 -> "2".
fn format_decimal(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    rounded.to_string()
}

/// Replace a decimal remainder with a culinary fraction when one is close.
fn snap_to_fraction(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    let Ok(value) = text.parse::<f64>() else {
        return text;
    };

    let whole = value.floor();
    let remainder = value - whole;
    COMMON_FRACTIONS
        .iter()
        .find(|(fraction, _)| (remainder - fraction).abs() < FRACTION_TOLERANCE)
        .map(|(_, label)| {
            if whole > 0.0 {
                format!("{whole} {label}")
            } else {
                label.to_string()
            }
        })
        .unwrap_or(text)
}

/// Rescale one ingredient from `original_servings` to `new_servings`
///
/// Zero servings on either side leave the ingredient untouched, as does an
/// unchanged serving count.
pub fn scale_ingredient(
    ingredient: &RecipeIngredient,
    original_servings: u32,
    new_servings: u32,
) -> RecipeIngredient {
    if original_servings == 0 || new_servings == 0 || original_servings == new_servings {
        return ingredient.clone();
    }

    let factor = f64::from(new_servings) / f64::from(original_servings);
    let quantity = match parse_quantity(&ingredient.quantity) {
        Some(Quantity::Decimal(value)) => snap_to_fraction(format_decimal(value * factor)),
        Some(Quantity::Fraction(value)) => format_decimal(value * factor),
        None => ingredient.quantity.clone(),
    };

    RecipeIngredient {
        quantity,
        ..ingredient.clone()
    }
}

/// Rescale a whole ingredient list, preserving order and length
pub fn scale_all(
    ingredients: &[RecipeIngredient],
    original_servings: u32,
    new_servings: u32,
) -> Vec<RecipeIngredient> {
    debug!(
        count = ingredients.len(),
        original_servings, new_servings, "Scaling ingredients"
    );
    ingredients
        .iter()
        .map(|ingredient| scale_ingredient(ingredient, original_servings, new_servings))
        .collect()
}

/// Rescale a recipe's ingredients to `new_servings`
pub fn scale_recipe(recipe: &Recipe, new_servings: u32) -> Vec<RecipeIngredient> {
    scale_all(&recipe.ingredients, recipe.servings, new_servings)
}

/// Validate a user-entered serving count
pub fn parse_servings(text: &str) -> Result<u32, ServingsError> {
    let servings: i64 = text
        .trim()
        .parse()
        .map_err(|_| ServingsError::NotANumber(text.trim().to_string()))?;

    if servings < i64::from(MIN_SERVINGS) {
        return Err(ServingsError::TooFew);
    }
    if servings > i64::from(MAX_SERVINGS) {
        return Err(ServingsError::TooMany);
    }
    Ok(servings as u32)
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
fn servings_arg(servings: i64) -> u32 {
    u32::try_from(servings).unwrap_or(0)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "scale_ingredient")]
pub fn py_scale_ingredient(
    ingredient: Option<RecipeIngredient>,
    original_servings: i64,
    new_servings: i64,
) -> Option<RecipeIngredient> {
    let (original, new) = (servings_arg(original_servings), servings_arg(new_servings));
    ingredient.map(|i| scale_ingredient(&i, original, new))
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "scale_all")]
pub fn py_scale_all(
    ingredients: Option<Vec<RecipeIngredient>>,
    original_servings: i64,
    new_servings: i64,
) -> Option<Vec<RecipeIngredient>> {
    let (original, new) = (servings_arg(original_servings), servings_arg(new_servings));
    ingredients.map(|list| scale_all(&list, original, new))
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "parse_servings")]
pub fn py_parse_servings(text: &str) -> PyResult<u32> {
    parse_servings(text).map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scaled(quantity: &str, original: u32, new: u32) -> String {
        scale_ingredient(&RecipeIngredient::new("x", quantity, Some("cup")), original, new).quantity
    }

    #[test]
    fn test_whole_numbers_scale_cleanly() {
        let flour = RecipeIngredient::new("flour", "2", Some("cups"));
        assert_eq!(
            scale_ingredient(&flour, 4, 8),
            RecipeIngredient::new("flour", "4", Some("cups"))
        );
    }

    #[test]
    fn test_decimals_snap_to_fractions() {
        assert_eq!(scaled("1", 4, 6), "1 1/2");
        assert_eq!(scaled("3", 4, 1), "3/4");
        assert_eq!(scaled("1", 4, 1), "1/4");
        assert_eq!(scaled("0.5", 3, 2), "1/3");
        assert_eq!(scaled("2", 3, 1), "2/3");
        assert_eq!(scaled("1", 3, 4), "1 1/3");
        assert_eq!(scaled("7", 3, 1), "2 1/3");
    }

    #[test]
    fn test_fraction_tolerance_is_exclusive() {
        // 0.2 sits just inside 0.05 of 1/4
        assert_eq!(scaled("1", 5, 1), "1/4");
        // the remainder of 1.2 is 0.19999..., just outside
        assert_eq!(scaled("6", 5, 1), "1.2");
        // 0.55 is a hair more than 0.05 from 1/2
        assert_eq!(scaled("11", 20, 1), "0.55");
    }

    #[test]
    fn test_decimals_without_close_fraction_stay_decimal() {
        assert_eq!(scaled("1", 10, 1), "0.1");
        assert_eq!(scaled("1.2", 1, 2), "2.4");
    }

    #[test]
    fn test_fractions_scale_to_plain_decimals() {
        assert_eq!(scaled("1/2", 2, 3), "0.75");
        assert_eq!(scaled("1 1/2", 2, 4), "3");
        assert_eq!(scaled("3/4", 1, 2), "1.5");
        assert_eq!(scaled("about 1/3", 1, 3), "1");
    }

    #[test]
    fn test_unparseable_quantities_pass_through() {
        assert_eq!(scaled("a pinch", 4, 8), "a pinch");
        assert_eq!(scaled("", 4, 8), "");
        assert_eq!(scaled("1/0", 4, 8), "1/0");
        assert_eq!(scaled("NaN", 4, 8), "NaN");
        assert_eq!(scaled("inf", 4, 8), "inf");
    }

    #[test]
    fn test_invalid_servings_are_identity() {
        let salt = RecipeIngredient::new("salt", "1.5", Some("tsp"));
        assert_eq!(scale_ingredient(&salt, 0, 4), salt);
        assert_eq!(scale_ingredient(&salt, 4, 0), salt);
    }

    #[test]
    fn test_same_servings_round_trip() {
        let ingredients = vec![
            RecipeIngredient::new("flour", "2", Some("cups")),
            RecipeIngredient::new("milk", "1.5", Some("cups")),
            RecipeIngredient::new("basil", "1/2", Some("cup")),
            RecipeIngredient::new("salt", "a pinch", None),
        ];
        assert_eq!(scale_all(&ingredients, 4, 4), ingredients);
    }

    #[test]
    fn test_scale_all_preserves_order_names_and_units() {
        let ingredients = vec![
            RecipeIngredient::new("tomato", "3", None),
            RecipeIngredient::new("basil", "1/2", Some("cup")),
        ];
        let result = scale_all(&ingredients, 2, 4);
        assert_eq!(
            result,
            vec![
                RecipeIngredient::new("tomato", "6", None),
                RecipeIngredient::new("basil", "1", Some("cup")),
            ]
        );
    }

    #[test]
    fn test_scale_recipe_uses_recipe_servings() {
        let recipe = Recipe::new(vec![RecipeIngredient::new("rice", "1", Some("cup"))], 2);
        assert_eq!(scale_recipe(&recipe, 5)[0].quantity, "2 1/2");
    }

    #[test]
    fn test_format_decimal_strips_zeros() {
        assert_eq!(format_decimal(2.0), "2");
        assert_eq!(format_decimal(2.5), "2.5");
        assert_eq!(format_decimal(0.1 + 0.2), "0.3");
        assert_eq!(format_decimal(-0.001), "0");
    }

    #[test]
    fn test_parse_servings() {
        assert_eq!(parse_servings(" 4 "), Ok(4));
        assert_eq!(parse_servings("100"), Ok(100));
        assert_eq!(parse_servings("0"), Err(ServingsError::TooFew));
        assert_eq!(parse_servings("-3"), Err(ServingsError::TooFew));
        assert_eq!(parse_servings("101"), Err(ServingsError::TooMany));
        assert_eq!(parse_servings("four"), Err(ServingsError::NotANumber("four".to_string())));
    }
}
