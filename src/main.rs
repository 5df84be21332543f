use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::Level;

use meal_builder_rs::cli::{check_food_count, Cli, Command, TargetArgs};
use meal_builder_rs::error::{MealError, Result};
use meal_builder_rs::interface::{
    display_food_list, display_meal_report, display_presets, prompt_client_name, prompt_foods,
    prompt_path, prompt_search, prompt_target, prompt_yes_no,
};
use meal_builder_rs::models::{MealReport, NormalizedFood, TargetVector};
use meal_builder_rs::planner::solve;
use meal_builder_rs::state::{densities, write_meal_csv, write_report_json, Catalog, CatalogCache};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or_default();
    let mut cache = CatalogCache::new();

    match command {
        Command::Build => cmd_build(&mut cache, &cli.file),
        Command::Solve {
            foods,
            target,
            client,
            export,
            json,
        } => cmd_solve(&mut cache, &cli.file, &foods, &target, &client, export, json),
        Command::Search { query, min_protein } => {
            cmd_search(&mut cache, &cli.file, &query, min_protein)
        }
        Command::Presets => {
            display_presets();
            Ok(())
        }
    }
}

/// Load the catalog through the cache, rejecting an empty one.
fn load<'a>(cache: &'a mut CatalogCache, path: &Path) -> Result<&'a Catalog> {
    if !path.exists() {
        eprintln!("Food catalog not found: {}", path.display());
        eprintln!("Pass a CSV or JSON catalog with --file.");
    }

    let catalog = cache.get_or_load(path)?;
    if catalog.is_empty() {
        return Err(MealError::EmptyCatalog);
    }
    Ok(catalog)
}

/// Solve, then build the report for display and export.
fn build_report(
    client: &str,
    target: TargetVector,
    selection: &[&NormalizedFood],
) -> Result<MealReport> {
    let solution = solve(&densities(selection), &target)?;
    tracing::debug!(
        "Residual {:.4} g after {} iterations",
        solution.residual_norm,
        solution.iterations
    );
    Ok(MealReport::new(client, target, selection, solution))
}

/// Interactive meal building.
fn cmd_build(cache: &mut CatalogCache, path: &Path) -> Result<()> {
    let catalog = load(cache, path)?;
    println!("Loaded {} foods", catalog.len());
    println!();

    let client = prompt_client_name()?;
    let target = prompt_target()?;
    println!(
        "Target: P {:.1} g | C {:.1} g | F {:.1} g (~{:.0} kcal)",
        target.protein_g,
        target.carbs_g,
        target.fat_g,
        target.implied_kcal()
    );
    println!();

    let (query, min_protein) = prompt_search()?;
    let available = catalog.filter(&query, min_protein);
    if available.is_empty() {
        println!("No foods match that search.");
        return Ok(());
    }
    println!("{} foods match", available.len());

    let selection = prompt_foods(&available)?;
    if selection.is_empty() {
        println!("Pick at least one food.");
        return Ok(());
    }
    display_food_list(&selection, "Selected foods");

    let report = build_report(&client, target, &selection)?;
    display_meal_report(&report);

    if prompt_yes_no("Download meal CSV?", true)? {
        let out = prompt_path("Export path", &report.export_file_name())?;
        write_meal_csv(&out, &report.rows)?;
        println!("Wrote {}", out);
    }

    Ok(())
}

/// Non-interactive solve for named foods.
fn cmd_solve(
    cache: &mut CatalogCache,
    path: &Path,
    foods: &[String],
    target: &TargetArgs,
    client: &str,
    export: Option<PathBuf>,
    json: Option<PathBuf>,
) -> Result<()> {
    check_food_count(foods)?;
    let catalog = load(cache, path)?;
    let target = target.target()?;

    let selection = match catalog.select(foods) {
        Ok(selection) => selection,
        Err(MealError::FoodNotFound(name)) => {
            let suggestions = catalog.suggestions(&name, 5);
            if !suggestions.is_empty() {
                let names: Vec<&str> = suggestions.iter().map(|f| f.name()).collect();
                eprintln!("Did you mean: {}?", names.join(", "));
            }
            return Err(MealError::FoodNotFound(name));
        }
        Err(e) => return Err(e),
    };

    let report = build_report(client, target, &selection)?;
    display_meal_report(&report);

    if let Some(out) = export {
        write_meal_csv(&out, &report.rows)?;
        println!("Wrote {}", out.display());
    }
    if let Some(out) = json {
        write_report_json(&out, &report)?;
        println!("Wrote {}", out.display());
    }

    Ok(())
}

/// List foods matching a query.
fn cmd_search(cache: &mut CatalogCache, path: &Path, query: &str, min_protein: f64) -> Result<()> {
    let catalog = load(cache, path)?;
    let matches = catalog.filter(query, min_protein);
    let title = if query.is_empty() {
        "Foods".to_string()
    } else {
        format!("Foods matching '{}'", query)
    };
    display_food_list(&matches, &title);
    Ok(())
}
