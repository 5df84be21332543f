use tracing::{debug, info};

use crate::error::{MealError, Result};
use crate::models::{NutrientDensity, QuantitySolution, TargetVector};
use crate::planner::constants::{MAX_ITERATIONS_PER_FOOD, MIN_ITERATIONS, TOLERANCE_SCALE};
use crate::planner::nnls::{nnls, ColumnMatrix};
use crate::planner::totals::{macro_diff, meal_totals};

/// Number of macro rows in the system (protein, carbs, fat).
const MACRO_ROWS: usize = 3;

/// Tunable limits for the quantity solve.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub max_iterations_per_food: usize,
    pub min_iterations: usize,
    pub tolerance_scale: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations_per_food: MAX_ITERATIONS_PER_FOOD,
            min_iterations: MIN_ITERATIONS,
            tolerance_scale: TOLERANCE_SCALE,
        }
    }
}

impl SolverConfig {
    /// Iteration cap for a selection of `foods` items.
    pub fn iteration_cap(&self, foods: usize) -> usize {
        (self.max_iterations_per_food * foods).max(self.min_iterations)
    }
}

/// Build the 3 x n macro matrix: column `j` holds food `j`'s protein, carb
/// and fat densities.
pub fn macro_matrix(selection: &[NutrientDensity]) -> ColumnMatrix {
    ColumnMatrix::from_columns(MACRO_ROWS, selection.iter().map(NutrientDensity::macros))
}

/// Solve for non-negative grams with the default configuration.
pub fn solve(selection: &[NutrientDensity], target: &TargetVector) -> Result<QuantitySolution> {
    solve_with_config(selection, target, &SolverConfig::default())
}

/// Solve for non-negative grams of each selected food so that the mixture's
/// macros are as close as possible (least squares) to `target`.
///
/// Fails with `InvalidSelection` on an empty selection and with
/// `SolveFailed` on non-finite input or when the iteration cap is reached.
pub fn solve_with_config(
    selection: &[NutrientDensity],
    target: &TargetVector,
    config: &SolverConfig,
) -> Result<QuantitySolution> {
    if selection.is_empty() {
        return Err(MealError::InvalidSelection);
    }

    let a = macro_matrix(selection);
    let b = target.as_array();

    if !a.is_finite() || b.iter().any(|v| !v.is_finite()) {
        return Err(MealError::SolveFailed {
            reason: "densities and target must be finite".to_string(),
            last_iterate: None,
        });
    }

    debug!(
        "Solving {} foods for target P:{} C:{} F:{}",
        selection.len(),
        target.protein_g,
        target.carbs_g,
        target.fat_g
    );

    let outcome = nnls(
        &a,
        &b,
        config.tolerance_scale,
        config.iteration_cap(selection.len()),
    )?;

    let grams = outcome.x;
    let totals = meal_totals(selection, &grams);
    let diff = macro_diff(target, &totals);

    info!(
        "Solved {} foods in {} iterations (residual {:.3} g)",
        selection.len(),
        outcome.iterations,
        outcome.residual_norm
    );

    Ok(QuantitySolution {
        grams,
        totals,
        diff,
        residual_norm: outcome.residual_norm,
        iterations: outcome.iterations,
    })
}
