use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{MealError, Result};
use crate::planner::constants::{DEFAULT_CARB_G, DEFAULT_FAT_G, DEFAULT_PROTEIN_G};

/// Macro goal for a single solve, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetVector {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl TargetVector {
    pub fn new(protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    /// Build a target from user input, rejecting negative or non-finite values.
    pub fn checked(protein_g: f64, carbs_g: f64, fat_g: f64) -> Result<Self> {
        for (label, value) in [("protein", protein_g), ("carbs", carbs_g), ("fat", fat_g)] {
            if !value.is_finite() || value < 0.0 {
                return Err(MealError::InvalidInput(format!(
                    "target {} must be a non-negative number, got {}",
                    label, value
                )));
            }
        }
        Ok(Self::new(protein_g, carbs_g, fat_g))
    }

    /// Protein, carbohydrate and fat, in solver row order.
    #[inline]
    pub fn as_array(&self) -> [f64; 3] {
        [self.protein_g, self.carbs_g, self.fat_g]
    }

    /// Energy implied by the macros (4/4/9 kcal per gram).
    pub fn implied_kcal(&self) -> f64 {
        4.0 * self.protein_g + 4.0 * self.carbs_g + 9.0 * self.fat_g
    }
}

impl Default for TargetVector {
    fn default() -> Self {
        Self::new(DEFAULT_PROTEIN_G, DEFAULT_CARB_G, DEFAULT_FAT_G)
    }
}

/// Named meal templates with fixed macro targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealPreset {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealPreset {
    pub const ALL: [MealPreset; 4] = [
        MealPreset::Breakfast,
        MealPreset::Lunch,
        MealPreset::Dinner,
        MealPreset::Snack,
    ];

    pub fn target(self) -> TargetVector {
        match self {
            MealPreset::Breakfast => TargetVector::new(23.0, 30.0, 13.0),
            MealPreset::Lunch => TargetVector::new(26.0, 35.0, 9.0),
            MealPreset::Dinner => TargetVector::new(20.0, 30.0, 9.0),
            MealPreset::Snack => TargetVector::new(20.0, 20.0, 4.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MealPreset::Breakfast => "Breakfast (~395 kcal, 30C/23P/13F)",
            MealPreset::Lunch => "Lunch (~435 kcal, 35C/26P/9F)",
            MealPreset::Dinner => "Dinner (~435 kcal, 30C/20P/9F)",
            MealPreset::Snack => "Snack (~200 kcal, 20C/20P/4F)",
        }
    }
}
