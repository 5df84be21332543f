mod food;
mod solution;
mod target;

pub use food::{FoodRecord, NormalizedFood, NutrientDensity};
pub use solution::{MacroDiff, MacroTotals, MealReport, MealRow, QuantitySolution};
pub use target::{MealPreset, TargetVector};
