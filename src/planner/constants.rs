/// Serving mass assumed when a record's serving size is unknown.
///
/// Amounts on such rows are read as "per 100 g".
pub const FALLBACK_BASIS_GRAMS: f64 = 100.0;

/// Default manual targets (grams).
pub const DEFAULT_PROTEIN_G: f64 = 25.0;
pub const DEFAULT_CARB_G: f64 = 30.0;
pub const DEFAULT_FAT_G: f64 = 13.0;

/// Maximum number of foods a meal may combine.
pub const MAX_SELECTED_FOODS: usize = 6;

// ─────────────────────────────────────────────────────────────────────────────
// Solver
// ─────────────────────────────────────────────────────────────────────────────

/// Outer active-set iterations allowed per selected food.
pub const MAX_ITERATIONS_PER_FOOD: usize = 30;

/// Lower bound on the outer iteration cap.
pub const MIN_ITERATIONS: usize = 30;

/// Multiplier on machine epsilon for the optimality tolerance.
pub const TOLERANCE_SCALE: f64 = 10.0;

// ─────────────────────────────────────────────────────────────────────────────
// Catalog lookup
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum Jaro-Winkler score for a fuzzy name match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.85;

/// Minimum Jaro-Winkler score for a suggestion in interactive picking.
pub const FUZZY_SUGGEST_THRESHOLD: f64 = 0.7;

// ─────────────────────────────────────────────────────────────────────────────
// Report formatting
// ─────────────────────────────────────────────────────────────────────────────

/// Decimal places for grams and macro grams in reports.
pub const GRAMS_DECIMALS: u32 = 1;

/// Decimal places for energy in reports.
pub const KCAL_DECIMALS: u32 = 0;
