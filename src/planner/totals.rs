use crate::models::{MacroDiff, MacroTotals, MealRow, NormalizedFood, NutrientDensity, TargetVector};

/// Round to `decimals` places. Negative zero comes back as `0.0`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor + 0.0
}

/// Energy and macros achieved by `grams` of each food.
///
/// `densities` and `grams` are positionally aligned.
pub fn meal_totals(densities: &[NutrientDensity], grams: &[f64]) -> MacroTotals {
    densities
        .iter()
        .zip(grams)
        .fold(MacroTotals::default(), |mut acc, (d, &g)| {
            acc.kcal += d.kcal_per_g * g;
            acc.protein_g += d.prot_per_g * g;
            acc.carbs_g += d.carb_per_g * g;
            acc.fat_g += d.fat_per_g * g;
            acc
        })
}

/// Target minus achieved, per macro.
pub fn macro_diff(target: &TargetVector, totals: &MacroTotals) -> MacroDiff {
    MacroDiff {
        protein_g: target.protein_g - totals.protein_g,
        carbs_g: target.carbs_g - totals.carbs_g,
        fat_g: target.fat_g - totals.fat_g,
    }
}

/// Per-food contributions for reporting, in selection order.
pub fn meal_rows(foods: &[&NormalizedFood], grams: &[f64]) -> Vec<MealRow> {
    foods
        .iter()
        .zip(grams)
        .map(|(food, &g)| MealRow {
            name: food.name().to_string(),
            grams: g,
            kcal: food.density.kcal_per_g * g,
            protein_g: food.density.prot_per_g * g,
            carbs_g: food.density.carb_per_g * g,
            fat_g: food.density.fat_per_g * g,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn density(kcal: f64, p: f64, c: f64, f: f64) -> NutrientDensity {
        NutrientDensity {
            kcal_per_g: kcal,
            prot_per_g: p,
            carb_per_g: c,
            fat_per_g: f,
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.34, 1), 12.3);
        assert_eq!(round_to(12.36, 1), 12.4);
        assert_eq!(round_to(199.6, 0), 200.0);
    }

    #[test]
    fn test_round_to_drops_negative_zero() {
        assert!(round_to(-0.0, 1).is_sign_positive());
        assert!(round_to(-0.04, 1).is_sign_positive());
        assert_eq!(format!("{:+.1}", round_to(-1e-12, 1)), "+0.0");
        assert_eq!(round_to(-0.06, 1), -0.1);
    }

    #[test]
    fn test_meal_totals_sums_contributions() {
        let densities = [density(4.0, 1.0, 0.0, 0.0), density(9.0, 0.0, 0.0, 1.0)];
        let totals = meal_totals(&densities, &[10.0, 2.0]);
        assert_eq!(totals.kcal, 58.0);
        assert_eq!(totals.protein_g, 10.0);
        assert_eq!(totals.carbs_g, 0.0);
        assert_eq!(totals.fat_g, 2.0);
    }

    #[test]
    fn test_macro_diff_is_target_minus_actual() {
        let totals = MacroTotals {
            kcal: 100.0,
            protein_g: 12.0,
            carbs_g: 25.0,
            fat_g: 3.0,
        };
        let diff = macro_diff(&TargetVector::new(10.0, 30.0, 3.0), &totals);
        assert_eq!(diff.protein_g, -2.0);
        assert_eq!(diff.carbs_g, 5.0);
        assert_eq!(diff.fat_g, 0.0);
    }
}
