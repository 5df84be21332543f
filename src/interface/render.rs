use crate::models::{MealPreset, MealReport, NormalizedFood};
use crate::planner::constants::{GRAMS_DECIMALS, KCAL_DECIMALS};
use crate::planner::totals::round_to;
use crate::state::{export_record, format_amount};

/// Display the solved meal as a table with totals and differences.
pub fn display_meal_report(report: &MealReport) {
    if report.rows.is_empty() {
        println!("No foods selected.");
        return;
    }

    let totals = &report.solution.totals;
    let diff = &report.solution.diff;

    println!();
    println!("=== Meal for {} ===", report.client);
    println!();

    let name_width = report
        .rows
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(10)
        .max(4);

    println!(
        "{:<width$}  {:>8}  {:>6}  {:>9}  {:>7}  {:>5}",
        "name",
        "grams",
        "kcal",
        "protein_g",
        "carbs_g",
        "fat_g",
        width = name_width
    );

    for row in &report.rows {
        let [name, grams, kcal, protein, carbs, fat] = export_record(row);
        println!(
            "{:<width$}  {:>8}  {:>6}  {:>9}  {:>7}  {:>5}",
            name,
            grams,
            kcal,
            protein,
            carbs,
            fat,
            width = name_width
        );
    }

    println!();
    println!("--- Totals ---");
    println!(
        "Calories: {} kcal | Protein: {} g | Carbs: {} g | Fat: {} g",
        format_amount(totals.kcal, KCAL_DECIMALS),
        format_amount(totals.protein_g, GRAMS_DECIMALS),
        format_amount(totals.carbs_g, GRAMS_DECIMALS),
        format_amount(totals.fat_g, GRAMS_DECIMALS)
    );
    println!();
    println!("--- Macro differences (target - actual) ---");
    println!(
        "Protein: {} g | Carbs: {} g | Fat: {} g",
        signed_grams(diff.protein_g),
        signed_grams(diff.carbs_g),
        signed_grams(diff.fat_g)
    );
    println!();
}

/// Signed macro difference, so a met target shows as `+0.0`.
fn signed_grams(value: f64) -> String {
    format!("{:+.*}", GRAMS_DECIMALS as usize, round_to(value, GRAMS_DECIMALS))
}

/// Display a list of catalog foods with per-100 g macros.
pub fn display_food_list(foods: &[&NormalizedFood], title: &str) {
    if foods.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, foods.len());
    println!();

    for food in foods {
        let d = &food.density;
        let brand = food
            .record
            .brand
            .as_deref()
            .map(|b| format!(" [{}]", b))
            .unwrap_or_default();
        println!(
            "  {}{} - {:.0} kcal, P:{:.1} C:{:.1} F:{:.1} per 100 g{}",
            food.name(),
            brand,
            d.kcal_per_g * 100.0,
            d.prot_per_g * 100.0,
            d.carb_per_g * 100.0,
            d.fat_per_g * 100.0,
            if food.uses_fallback_basis() { " (no serving size)" } else { "" }
        );
    }

    println!();
}

/// Display the preset meal templates.
pub fn display_presets() {
    println!();
    println!("=== Preset meal templates ===");
    println!();
    for preset in MealPreset::ALL {
        let t = preset.target();
        println!(
            "  {:<10} P:{:>4.0} C:{:>4.0} F:{:>4.0}  {}",
            format!("{:?}", preset).to_lowercase(),
            t.protein_g,
            t.carbs_g,
            t.fat_g,
            preset.label()
        );
    }
    println!();
}
