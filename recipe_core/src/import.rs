//! File import for recipe collections, ingredient sheets and pantry lists

use std::fs::read_to_string;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
#[cfg(feature = "python")]
use pyo3::prelude::*;
use tracing::{info, warn};

use crate::error::ImportError;
use crate::ingredient::{Recipe, RecipeIngredient};

/// Load a JSON array of recipes
pub fn load_recipes_json(path: impl AsRef<Path>) -> Result<Vec<Recipe>, ImportError> {
    let path = path.as_ref();
    let recipes: Vec<Recipe> = serde_json::from_str(&read_to_string(path)?)?;
    info!("Loaded {} recipes from {}", recipes.len(), path.display());
    Ok(recipes)
}

/// Load a pantry list, one ingredient per line; blank lines and `#` comments are skipped
pub fn load_pantry_lines(path: impl AsRef<Path>) -> Result<Vec<String>, ImportError> {
    Ok(read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Parse an ingredient sheet (CSV or Excel) by extension
pub fn parse_ingredient_file(path: impl AsRef<Path>) -> Result<Vec<RecipeIngredient>, ImportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xls" | "ods" => parse_ingredient_excel(path),
        "csv" => parse_ingredient_csv(path),
        _ => Err(ImportError::UnsupportedFormat(extension)),
    }
}

/// Column index mapping
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColumnMapping {
    pub name: usize,
    pub quantity: Option<usize>,
    pub unit: Option<usize>,
}

/// Detect column indices from header names
fn detect_columns(headers: &[String]) -> Result<ColumnMapping, ImportError> {
    let mut mapping = ColumnMapping::default();
    let mut name_found = false;

    for (i, header) in headers.iter().enumerate() {
        match header.to_lowercase().trim() {
            "name" | "ingredient" | "ingredients" | "item" => {
                mapping.name = i;
                name_found = true;
            }
            "quantity" | "amount" | "qty" => mapping.quantity = Some(i),
            "unit" | "units" => mapping.unit = Some(i),
            _ => {}
        }
    }

    if !name_found {
        return Err(ImportError::MissingColumn("Name"));
    }
    Ok(mapping)
}

/// Build an ingredient from one row of cell text, skipping rows without a name
fn row_to_ingredient(
    mapping: &ColumnMapping,
    cell: impl Fn(usize) -> Option<String>,
) -> Option<RecipeIngredient> {
    let name = cell(mapping.name).unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some(RecipeIngredient {
        name,
        quantity: mapping.quantity.and_then(&cell).unwrap_or_default(),
        unit: mapping.unit.and_then(&cell).filter(|u| !u.is_empty()),
    })
}

/// Parse the first sheet of a workbook
pub fn parse_ingredient_excel(
    path: impl AsRef<Path>,
) -> Result<Vec<RecipeIngredient>, ImportError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| ImportError::Excel(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::Excel("No sheets found in workbook".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::Excel(e.to_string()))?;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or(ImportError::EmptyFile)?;
    let headers: Vec<String> = header_row.iter().map(get_cell_string).collect();
    let mapping = detect_columns(&headers)?;

    let ingredients: Vec<RecipeIngredient> = rows
        .filter_map(|row| row_to_ingredient(&mapping, |i| row.get(i).map(get_cell_string)))
        .collect();

    info!("Parsed {} ingredients from {}", ingredients.len(), path.display());
    Ok(ingredients)
}

/// Parse a CSV ingredient sheet with a header row
pub fn parse_ingredient_csv(path: impl AsRef<Path>) -> Result<Vec<RecipeIngredient>, ImportError> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::EmptyFile);
    }
    let mapping = detect_columns(&headers)?;

    let mut ingredients = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable CSV row {}: {e}", line + 2);
                continue;
            }
        };
        let cell = |i: usize| record.get(i).map(|s| s.trim().to_string());
        if let Some(ingredient) = row_to_ingredient(&mapping, cell) {
            ingredients.push(ingredient);
        }
    }

    info!("Parsed {} ingredients from {}", ingredients.len(), path.display());
    Ok(ingredients)
}

/// Helper to extract string from a spreadsheet cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "load_recipes_json")]
pub fn py_load_recipes_json(path: &str) -> PyResult<Vec<Recipe>> {
    load_recipes_json(path).map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "parse_ingredient_file")]
pub fn py_parse_ingredient_file(path: &str) -> PyResult<Vec<RecipeIngredient>> {
    parse_ingredient_file(path)
        .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_detect_columns() {
        let headers: Vec<String> = ["Qty", " Ingredient ", "Units", "Notes"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            detect_columns(&headers).unwrap(),
            ColumnMapping {
                name: 1,
                quantity: Some(0),
                unit: Some(2)
            }
        );
    }

    #[test]
    fn test_detect_columns_requires_name() {
        let headers = vec!["quantity".to_string(), "unit".to_string()];
        assert!(matches!(detect_columns(&headers), Err(ImportError::MissingColumn("Name"))));
    }

    #[test]
    fn test_parse_csv() {
        let file = temp_file(
            ".csv",
            "name,quantity,unit\nflour,2,cups\n,1,cup\n  salt  ,a pinch,\nbasil,1/2\n",
        );
        let ingredients = parse_ingredient_file(file.path()).unwrap();
        assert_eq!(
            ingredients,
            vec![
                RecipeIngredient::new("flour", "2", Some("cups")),
                RecipeIngredient::new("salt", "a pinch", None),
                RecipeIngredient::new("basil", "1/2", None),
            ]
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_file(".txt", "name\nflour\n");
        assert!(matches!(
            parse_ingredient_file(file.path()),
            Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn test_load_recipes_json() {
        let file = temp_file(
            ".json",
            r#"[{"id": "1", "servings": 2,
                 "ingredients": ["egg", {"name": "milk", "quantity": 1}]}]"#,
        );
        let recipes = load_recipes_json(file.path()).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].ingredients[1], RecipeIngredient::new("milk", "1", None));
    }

    #[test]
    fn test_bad_servings_do_not_fail_the_file() {
        let file = temp_file(
            ".json",
            r#"[
                {"id": "a", "servings": -1, "ingredients": ["egg"]},
                {"id": "b", "servings": 2.5, "ingredients": ["milk"]},
                {"id": "c", "servings": "4", "ingredients": ["flour"]},
                {"id": "d", "ingredients": ["sugar"]}
            ]"#,
        );
        let recipes = load_recipes_json(file.path()).unwrap();
        let servings: Vec<u32> = recipes.iter().map(|r| r.servings).collect();
        assert_eq!(servings, vec![0, 0, 4, 1]);
    }

    #[test]
    fn test_load_recipes_json_malformed() {
        let file = temp_file(".json", "{not json");
        assert!(matches!(load_recipes_json(file.path()), Err(ImportError::Json(_))));
    }

    #[test]
    fn test_load_pantry_lines() {
        let file = temp_file(".txt", "# fridge\ntomatoes\n\n  basil leaves \n");
        assert_eq!(load_pantry_lines(file.path()).unwrap(), vec!["tomatoes", "basil leaves"]);
    }
}
