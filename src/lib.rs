pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{MealError, Result};
pub use models::{FoodRecord, NormalizedFood, NutrientDensity, QuantitySolution, TargetVector};
pub use planner::{normalize, solve};
