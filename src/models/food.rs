use serde::{Deserialize, Serialize};

use crate::planner::constants::FALLBACK_BASIS_GRAMS;

/// One catalog row: nutrient amounts for a single reference serving.
///
/// All numeric fields are finite and non-negative. A `serving_grams` of 0
/// means the serving mass is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub serving_grams: f64,
}

impl FoodRecord {
    /// Whether the serving mass is known.
    #[inline]
    pub fn has_serving_mass(&self) -> bool {
        self.serving_grams > 0.0
    }

    /// Canonical key for lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Nutrient content per gram of food.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientDensity {
    pub kcal_per_g: f64,
    pub prot_per_g: f64,
    pub carb_per_g: f64,
    pub fat_per_g: f64,
}

impl NutrientDensity {
    /// Derive per-gram densities from a record.
    ///
    /// Divides by the serving mass when it is known, otherwise treats the
    /// stated amounts as per 100 g.
    pub fn from_record(record: &FoodRecord) -> Self {
        let divisor = if record.has_serving_mass() {
            record.serving_grams
        } else {
            FALLBACK_BASIS_GRAMS
        };

        Self {
            kcal_per_g: record.calories / divisor,
            prot_per_g: record.protein_g / divisor,
            carb_per_g: record.carbs_g / divisor,
            fat_per_g: record.fat_g / divisor,
        }
    }

    /// Protein, carbohydrate and fat densities, in solver row order.
    #[inline]
    pub fn macros(&self) -> [f64; 3] {
        [self.prot_per_g, self.carb_per_g, self.fat_per_g]
    }

    /// Protein grams per 100 g of food.
    #[inline]
    pub fn protein_per_100g(&self) -> f64 {
        self.prot_per_g * 100.0
    }
}

/// A catalog row together with its cached densities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFood {
    pub record: FoodRecord,
    pub density: NutrientDensity,
}

impl NormalizedFood {
    pub fn new(record: FoodRecord) -> Self {
        let density = NutrientDensity::from_record(&record);
        Self { record, density }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Whether the densities were derived with the per-100 g fallback.
    #[inline]
    pub fn uses_fallback_basis(&self) -> bool {
        !self.record.has_serving_mass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(serving_grams: f64) -> FoodRecord {
        FoodRecord {
            name: "Greek Yogurt".to_string(),
            brand: None,
            calories: 150.0,
            protein_g: 15.0,
            carbs_g: 6.0,
            fat_g: 7.5,
            serving_grams,
        }
    }

    #[test]
    fn test_density_with_serving_mass() {
        let density = NutrientDensity::from_record(&sample_record(150.0));
        assert!((density.kcal_per_g - 1.0).abs() < 1e-9);
        assert!((density.prot_per_g - 0.1).abs() < 1e-9);
        assert!((density.carb_per_g - 0.04).abs() < 1e-9);
        assert!((density.fat_per_g - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_density_falls_back_to_per_100g() {
        let density = NutrientDensity::from_record(&sample_record(0.0));
        assert!((density.kcal_per_g - 1.5).abs() < 1e-9);
        assert!((density.prot_per_g - 0.15).abs() < 1e-9);
        assert!((density.protein_per_100g() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_macros_order() {
        let food = NormalizedFood::new(sample_record(100.0));
        assert_eq!(food.density.macros(), [0.15, 0.06, 0.075]);
        assert!(!food.uses_fallback_basis());
    }

    #[test]
    fn test_key_is_lowercase() {
        assert_eq!(sample_record(100.0).key(), "greek yogurt");
    }
}
