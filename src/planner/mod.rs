pub mod constants;
pub mod nnls;
pub mod normalize;
pub mod solver;
pub mod totals;

pub use constants::*;
pub use normalize::{normalize, normalize_all, parse_amount, RawRow};
pub use solver::{macro_matrix, solve, solve_with_config, SolverConfig};
pub use totals::{macro_diff, meal_rows, meal_totals, round_to};
