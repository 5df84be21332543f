use serde::{Deserialize, Serialize};

use crate::models::{NormalizedFood, TargetVector};
use crate::planner::totals::meal_rows;

/// Energy and macros achieved by a set of quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Target minus achieved, per macro.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroDiff {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Result of one solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySolution {
    /// Grams per selected food, in selection order. Never negative.
    pub grams: Vec<f64>,
    pub totals: MacroTotals,
    pub diff: MacroDiff,
    /// Euclidean norm of the macro residual.
    pub residual_norm: f64,
    /// Outer iterations the solver used.
    pub iterations: usize,
}

/// One line of the meal report: a food and its contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRow {
    pub name: String,
    pub grams: f64,
    pub kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Everything needed to render or export one solved meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealReport {
    pub client: String,
    pub target: TargetVector,
    pub rows: Vec<MealRow>,
    pub solution: QuantitySolution,
}

impl MealReport {
    pub fn new(
        client: impl Into<String>,
        target: TargetVector,
        foods: &[&NormalizedFood],
        solution: QuantitySolution,
    ) -> Self {
        Self {
            client: client.into(),
            target,
            rows: meal_rows(foods, &solution.grams),
            solution,
        }
    }

    /// Default export file name for this client.
    pub fn export_file_name(&self) -> String {
        let client = self.client.trim();
        let stem = if client.is_empty() { "meal_plan" } else { client };
        format!("{}_meal.csv", stem.replace(['/', '\\'], "_"))
    }
}
