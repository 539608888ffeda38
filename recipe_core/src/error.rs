use std::io;

use thiserror::Error;

use crate::policy::{MAX_SERVINGS, MIN_SERVINGS};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read file: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed recipe JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Excel(String),

    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("Missing required '{0}' column in file header")]
    MissingColumn(&'static str),

    #[error("Empty file - no header row")]
    EmptyFile,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServingsError {
    #[error("Servings must be a whole number, got '{0}'")]
    NotANumber(String),

    #[error("Servings must be at least {}", MIN_SERVINGS)]
    TooFew,

    #[error("Servings must be no more than {}", MAX_SERVINGS)]
    TooMany,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PantryRejection {
    #[error("Please enter an ingredient")]
    Empty,

    #[error("Ingredient already added: {0}")]
    Duplicate(String),
}
