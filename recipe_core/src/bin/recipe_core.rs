//! Recipe Core CLI - leftover scanning and servings scaling over local files

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use recipe_core::policy::LEFTOVER_MATCH_PERCENTAGE;
use recipe_core::{
    load_pantry_lines, load_recipes_json, parse_ingredient_file, parse_servings, scale_all,
    scan_leftovers, similarity, Pantry, ScanConfig,
};

#[derive(Parser)]
#[command(name = "recipe-core")]
#[command(about = "Ingredient matching and servings scaling", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find recipes that can be cooked from what is on hand
    Scan {
        /// JSON array of recipes
        #[arg(long)]
        recipes: PathBuf,

        /// Comma-separated pantry ingredients
        #[arg(long, value_delimiter = ',')]
        pantry: Vec<String>,

        /// File with one pantry ingredient per line
        #[arg(long)]
        pantry_file: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rescale an ingredient list to a new number of servings
    Scale {
        /// JSON recipes file (use with --id) or a CSV/XLSX ingredient sheet
        #[arg(long)]
        file: PathBuf,

        /// Recipe id when scaling from a recipes file
        #[arg(long)]
        id: Option<String>,

        /// Original servings (defaults to the recipe's own)
        #[arg(long)]
        from: Option<String>,

        /// Target servings
        #[arg(long)]
        to: String,
    },

    /// Similarity score between two ingredient names
    Similarity { a: String, b: String },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            recipes,
            pantry,
            pantry_file,
            json,
        } => scan(recipes, pantry, pantry_file, json),
        Commands::Scale { file, id, from, to } => scale(file, id, from, to),
        Commands::Similarity { a, b } => {
            println!("{:.3}", similarity(&a, &b));
            Ok(())
        }
    }
}

fn scan(
    recipes: PathBuf,
    entries: Vec<String>,
    pantry_file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let recipes = load_recipes_json(&recipes)
        .with_context(|| format!("loading {}", recipes.display()))?;

    let mut entries = entries;
    if let Some(path) = pantry_file {
        let lines =
            load_pantry_lines(&path).with_context(|| format!("loading {}", path.display()))?;
        entries.extend(lines);
    }
    let pantry: Pantry = entries.iter().collect();
    if pantry.is_empty() {
        bail!("Please add at least one ingredient");
    }

    let config = ScanConfig::load();
    let matches = scan_leftovers(&recipes, pantry.items(), &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No recipes found with {LEFTOVER_MATCH_PERCENTAGE}% or more matching ingredients");
        return Ok(());
    }

    for m in &matches {
        let title = m
            .recipe
            .title
            .as_deref()
            .or(m.recipe.id.as_deref())
            .unwrap_or("(untitled)");
        println!(
            "{:>3}%  {}  ({})",
            m.result.display_percentage(),
            title,
            m.result.summary_label()
        );
    }
    Ok(())
}

fn scale(file: PathBuf, id: Option<String>, from: Option<String>, to: String) -> Result<()> {
    let to = parse_servings(&to)?;
    let from = from.as_deref().map(parse_servings).transpose()?;

    let is_json = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let (ingredients, original) = if is_json {
        let recipes =
            load_recipes_json(&file).with_context(|| format!("loading {}", file.display()))?;
        let recipe = match id.as_deref() {
            Some(id) => recipes.into_iter().find(|r| r.id.as_deref() == Some(id)),
            None => recipes.into_iter().next(),
        };
        let Some(recipe) = recipe else {
            bail!("Recipe not found in {}", file.display());
        };
        let original = from.unwrap_or(recipe.servings);
        (recipe.ingredients, original)
    } else {
        let ingredients = parse_ingredient_file(&file)
            .with_context(|| format!("loading {}", file.display()))?;
        let Some(original) = from else {
            bail!("--from is required when scaling an ingredient sheet");
        };
        (ingredients, original)
    };

    info!("Scaling {} ingredients from {} to {} servings", ingredients.len(), original, to);
    for ingredient in scale_all(&ingredients, original, to) {
        println!("{}", ingredient.display_line());
    }
    Ok(())
}
