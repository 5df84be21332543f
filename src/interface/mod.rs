pub mod prompts;
pub mod render;

pub use prompts::{
    prompt_client_name, prompt_foods, prompt_number, prompt_path, prompt_search, prompt_target,
    prompt_yes_no,
};
pub use render::{display_food_list, display_meal_report, display_presets};
