use thiserror::Error;

#[derive(Debug, Error)]
pub enum MealError {
    #[error("Food not found: {0}")]
    FoodNotFound(String),

    #[error("Invalid selection: at least one food must be selected")]
    InvalidSelection,

    #[error("Solve failed: {reason}")]
    SolveFailed {
        reason: String,
        /// Last iterate of the solver, when one was produced.
        last_iterate: Option<Vec<f64>>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog contains no foods")]
    EmptyCatalog,
}

pub type Result<T> = std::result::Result<T, MealError>;
