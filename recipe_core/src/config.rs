use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub const PARALLEL_MIN_ENV: &str = "RECIPE_CORE_PARALLEL_MIN";
pub const DEFAULT_PARALLEL_MIN: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Candidate count at which the scanner fans out over the rayon pool.
    pub parallel_min_recipes: usize,
}

impl ScanConfig {
    pub fn load() -> Self {
        Self::load_with(|key| env::var(key).ok())
    }

    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            parallel_min_recipes: try_load(&lookup, PARALLEL_MIN_ENV, DEFAULT_PARALLEL_MIN),
        }
    }

    pub fn sequential() -> Self {
        Self {
            parallel_min_recipes: usize::MAX,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel_min_recipes: DEFAULT_PARALLEL_MIN,
        }
    }
}

fn try_load<T>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
        default
    })
}
