use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{MealError, Result};
use crate::models::{MealPreset, NormalizedFood, TargetVector};
use crate::planner::constants::{
    DEFAULT_CARB_G, DEFAULT_FAT_G, DEFAULT_PROTEIN_G, FUZZY_SUGGEST_THRESHOLD, MAX_SELECTED_FOODS,
};

/// Prompt for a non-negative number with a default.
pub fn prompt_number(prompt: &str, default: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| MealError::InvalidInput(format!("Invalid number: {}", input)))?;

    if !value.is_finite() || value < 0.0 {
        return Err(MealError::InvalidInput(
            "Value must be a non-negative number".to_string(),
        ));
    }

    Ok(value)
}

/// Prompt for the client's name.
pub fn prompt_client_name() -> Result<String> {
    Ok(Input::new()
        .with_prompt("Client name")
        .default("Test Client".to_string())
        .interact_text()?)
}

/// Prompt for a preset template or manual macro targets.
pub fn prompt_target() -> Result<TargetVector> {
    let mut options: Vec<&str> = vec!["Manual"];
    options.extend(MealPreset::ALL.iter().map(|p| p.label()));

    let selection = Select::new()
        .with_prompt("Choose template")
        .items(&options)
        .default(0)
        .interact()?;

    if selection > 0 {
        return Ok(MealPreset::ALL[selection - 1].target());
    }

    let protein = prompt_number("Target protein (g)", DEFAULT_PROTEIN_G)?;
    let carbs = prompt_number("Target carbs (g)", DEFAULT_CARB_G)?;
    let fat = prompt_number("Target fat (g)", DEFAULT_FAT_G)?;
    TargetVector::checked(protein, carbs, fat)
}

/// Prompt for search text and a minimum protein filter.
pub fn prompt_search() -> Result<(String, f64)> {
    let query: String = Input::new()
        .with_prompt("Search foods (Enter for all)")
        .allow_empty(true)
        .interact_text()?;
    let min_protein = prompt_number("Filter: min protein per 100g", 0.0)?;
    Ok((query.trim().to_string(), min_protein))
}

/// Candidates for a typed name: substring matches, else fuzzy matches.
fn match_candidates<'a>(foods: &[&'a NormalizedFood], input: &str) -> Vec<&'a NormalizedFood> {
    let needle = input.to_lowercase();

    let substring: Vec<&NormalizedFood> = foods
        .iter()
        .copied()
        .filter(|f| f.record.key().contains(&needle))
        .collect();
    if !substring.is_empty() {
        return substring;
    }

    let mut scored: Vec<(&NormalizedFood, f64)> = foods
        .iter()
        .map(|f| (*f, jaro_winkler(&f.record.key(), &needle)))
        .filter(|(_, score)| *score > FUZZY_SUGGEST_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(f, _)| f).collect()
}

/// Prompt for the meal's foods, in order, with fuzzy matching.
pub fn prompt_foods<'a>(available: &[&'a NormalizedFood]) -> Result<Vec<&'a NormalizedFood>> {
    let mut selected: Vec<&NormalizedFood> = Vec::new();

    while selected.len() < MAX_SELECTED_FOODS {
        let input: String = Input::new()
            .with_prompt(format!(
                "Add food {}/{} (or press Enter to finish)",
                selected.len() + 1,
                MAX_SELECTED_FOODS
            ))
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            break;
        }

        // Try exact match first (case-insensitive)
        let exact = available
            .iter()
            .copied()
            .find(|f| f.record.key() == input.to_lowercase());

        let chosen = if let Some(food) = exact {
            Some(food)
        } else {
            let candidates = match_candidates(available, input);
            match candidates.len() {
                0 => {
                    println!("No matching food found for '{}'", input);
                    None
                }
                1 => {
                    let food = candidates[0];
                    let confirm = Confirm::new()
                        .with_prompt(format!("Did you mean '{}'?", food.name()))
                        .default(true)
                        .interact()?;
                    confirm.then_some(food)
                }
                _ => {
                    let options: Vec<&NormalizedFood> = candidates.into_iter().take(8).collect();
                    let mut labels: Vec<String> = options
                        .iter()
                        .map(|f| format!("{} ({:.0} kcal per serving)", f.name(), f.record.calories))
                        .collect();
                    labels.push("None of these".to_string());

                    let choice = Select::new()
                        .with_prompt("Which did you mean?")
                        .items(&labels)
                        .default(0)
                        .interact()?;
                    options.get(choice).copied()
                }
            }
        };

        if let Some(food) = chosen {
            if selected.iter().any(|s| std::ptr::eq(*s, food)) {
                println!("'{}' is already in the meal", food.name());
            } else {
                selected.push(food);
                println!("Added: {}", food.name());
            }
        }
    }

    Ok(selected)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Prompt for a file path with a default.
pub fn prompt_path(prompt: &str, default: &str) -> Result<String> {
    Ok(Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?)
}
