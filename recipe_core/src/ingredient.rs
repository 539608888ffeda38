//! Recipe and ingredient records shared by the matcher, scaler and scanner

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

/// One line of a recipe's ingredient list
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IngredientRepr")]
pub struct RecipeIngredient {
    pub name: String,
    /// Free text: "2", "1.5", "1/2", "1 1/2" or anything else ("a pinch").
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>, unit: Option<&str>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            unit: unit.map(str::to_string),
        }
    }

    /// Ingredient with only a name, as entered in quick-add lists.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// "<quantity> <unit> <name>" with empty parts skipped.
    pub fn display_line(&self) -> String {
        [
            self.quantity.trim(),
            self.unit.as_deref().unwrap_or("").trim(),
            self.name.trim(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Accepts both `"egg"` and `{"name": "egg", "quantity": 2}` on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientRepr {
    Name(String),
    Record {
        #[serde(default)]
        name: String,
        #[serde(default, deserialize_with = "quantity_text")]
        quantity: String,
        #[serde(default)]
        unit: Option<String>,
    },
}

impl From<IngredientRepr> for RecipeIngredient {
    fn from(repr: IngredientRepr) -> Self {
        match repr {
            IngredientRepr::Name(name) => RecipeIngredient::named(name),
            IngredientRepr::Record { name, quantity, unit } => {
                RecipeIngredient { name, quantity, unit }
            }
        }
    }
}

fn quantity_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Quantity {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Quantity>::deserialize(deserializer)? {
        Some(Quantity::Text(text)) => text,
        Some(Quantity::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

fn default_servings() -> u32 {
    1
}

/// Servings as found in recipe files
///
/// Missing, null, zero and empty values count as one serving. Negative,
/// fractional or unreadable values become 0, which the scaler treats as
/// "leave quantities alone", so one bad record never fails a whole file.
fn servings_value<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Servings {
        Whole(i64),
        Float(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    fn whole(value: i64) -> u32 {
        match value {
            0 => default_servings(),
            _ => u32::try_from(value).unwrap_or(0),
        }
    }

    Ok(match Option::<Servings>::deserialize(deserializer)? {
        None => default_servings(),
        Some(Servings::Whole(value)) => whole(value),
        Some(Servings::Float(value)) if value.fract() == 0.0 && value.abs() < 1e12 => {
            whole(value as i64)
        }
        Some(Servings::Float(_)) | Some(Servings::Other(_)) => 0,
        Some(Servings::Text(text)) => match text.trim() {
            "" => default_servings(),
            text => text.parse::<i64>().map(whole).unwrap_or(0),
        },
    })
}

/// Recipe as supplied by the surrounding application
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_servings", deserialize_with = "servings_value")]
    pub servings: u32,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    pub fn new(ingredients: Vec<RecipeIngredient>, servings: u32) -> Self {
        Self {
            id: None,
            title: None,
            servings,
            ingredients,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Either a bare ingredient name or a full ingredient record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IngredientRef<'a> {
    PlainName(&'a str),
    Structured(&'a RecipeIngredient),
}

impl<'a> IngredientRef<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            IngredientRef::PlainName(name) => name,
            IngredientRef::Structured(ingredient) => &ingredient.name,
        }
    }

    pub fn normalized_name(&self) -> String {
        normalize(self.name())
    }
}

impl<'a> From<&'a str> for IngredientRef<'a> {
    fn from(name: &'a str) -> Self {
        IngredientRef::PlainName(name)
    }
}

impl<'a> From<&'a String> for IngredientRef<'a> {
    fn from(name: &'a String) -> Self {
        IngredientRef::PlainName(name)
    }
}

impl<'a> From<&'a RecipeIngredient> for IngredientRef<'a> {
    fn from(ingredient: &'a RecipeIngredient) -> Self {
        IngredientRef::Structured(ingredient)
    }
}

/// Lowercase and trim, the comparison form for every ingredient name.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pymethods]
impl RecipeIngredient {
    #[new]
    #[pyo3(signature = (name, quantity=String::new(), unit=None))]
    fn py_new(name: String, quantity: String, unit: Option<String>) -> Self {
        Self { name, quantity, unit }
    }

    fn __repr__(&self) -> String {
        format!("RecipeIngredient('{}')", self.display_line())
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl Recipe {
    #[new]
    #[pyo3(signature = (ingredients, servings=1, id=None, title=None))]
    fn py_new(
        ingredients: Vec<RecipeIngredient>,
        servings: u32,
        id: Option<String>,
        title: Option<String>,
    ) -> Self {
        Self {
            id,
            title,
            servings,
            ingredients,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Recipe(title={:?}, servings={}, ingredients={})",
            self.title,
            self.servings,
            self.ingredients.len()
        )
    }
}
