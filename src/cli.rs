use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::{MealError, Result};
use crate::models::{MealPreset, TargetVector};
use crate::planner::constants::{
    DEFAULT_CARB_G, DEFAULT_FAT_G, DEFAULT_PROTEIN_G, MAX_SELECTED_FOODS,
};

/// Meal Builder: pick gram quantities of chosen foods to hit a macro target.
#[derive(Parser, Debug)]
#[command(name = "meal_builder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the food catalog (CSV, or JSON by extension).
    #[arg(short, long, default_value = "foods.csv", global = true)]
    pub file: PathBuf,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Macro target: a named preset or explicit grams.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Use a preset meal template.
    #[arg(long, value_enum, conflicts_with_all = ["protein", "carbs", "fat"])]
    pub preset: Option<MealPreset>,

    /// Target protein (g).
    #[arg(long, default_value_t = DEFAULT_PROTEIN_G)]
    pub protein: f64,

    /// Target carbohydrate (g).
    #[arg(long, default_value_t = DEFAULT_CARB_G)]
    pub carbs: f64,

    /// Target fat (g).
    #[arg(long, default_value_t = DEFAULT_FAT_G)]
    pub fat: f64,
}

impl TargetArgs {
    /// Resolve to a validated target.
    pub fn target(&self) -> Result<TargetVector> {
        match self.preset {
            Some(preset) => Ok(preset.target()),
            None => TargetVector::checked(self.protein, self.carbs, self.fat),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactively pick foods and a target, then solve.
    Build,

    /// Solve quantities for the named foods without prompting.
    Solve {
        /// Food name (repeat for each food, in order).
        #[arg(long = "food", required = true)]
        foods: Vec<String>,

        #[command(flatten)]
        target: TargetArgs,

        /// Client name used in the report.
        #[arg(long, default_value = "Client")]
        client: String,

        /// Write the meal table as CSV.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Write the full report as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// List catalog foods matching a query.
    Search {
        /// Text to match against name or brand.
        #[arg(default_value = "")]
        query: String,

        /// Minimum protein per 100 g.
        #[arg(long, default_value_t = 0.0)]
        min_protein: f64,
    },

    /// List preset meal templates.
    Presets,
}

/// Reject a `--food` list longer than the selection cap.
pub fn check_food_count(foods: &[String]) -> Result<()> {
    if foods.len() > MAX_SELECTED_FOODS {
        return Err(MealError::InvalidInput(format!(
            "at most {} foods per meal, got {}",
            MAX_SELECTED_FOODS,
            foods.len()
        )));
    }
    Ok(())
}

impl Default for Command {
    fn default() -> Self {
        Command::Build
    }
}
