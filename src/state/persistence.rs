use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::models::{MealReport, MealRow};
use crate::planner::constants::{GRAMS_DECIMALS, KCAL_DECIMALS};
use crate::planner::normalize::RawRow;
use crate::planner::totals::round_to;
use crate::state::columns::reconcile_headers;
use crate::state::manager::Catalog;

/// On-disk catalog encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Csv,
    Json,
}

impl CatalogFormat {
    /// `.json` files are JSON; everything else is read as CSV.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => CatalogFormat::Json,
            _ => CatalogFormat::Csv,
        }
    }
}

/// Header export columns, in order.
pub const EXPORT_HEADER: [&str; 6] = ["name", "grams", "kcal", "protein_g", "carbs_g", "fat_g"];

fn parse_csv_rows(content: &str) -> Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let roles = reconcile_headers(&headers);

    let mut rows = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        let mut row = RawRow::new(index);
        for (role, cell) in roles.iter().zip(record.iter()) {
            if let Some(key) = role.key() {
                row.push(key, cell);
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_json_rows(content: &str) -> Result<Vec<RawRow>> {
    let objects: Vec<serde_json::Map<String, Value>> = serde_json::from_str(content)?;

    let rows = objects
        .iter()
        .enumerate()
        .map(|(index, object)| {
            let headers: Vec<&str> = object.keys().map(String::as_str).collect();
            let roles = reconcile_headers(&headers);
            let mut row = RawRow::new(index);
            for (role, value) in roles.iter().zip(object.values()) {
                if let (Some(key), Some(text)) = (role.key(), cell_text(value)) {
                    row.push(key, text);
                }
            }
            row
        })
        .collect();
    Ok(rows)
}

/// Parse catalog content into reconciled raw rows.
///
/// Only a structurally unreadable file is an error; bad cells are left for
/// the normalizer to zero out.
pub fn parse_catalog(content: &str, format: CatalogFormat) -> Result<Vec<RawRow>> {
    match format {
        CatalogFormat::Csv => parse_csv_rows(content),
        CatalogFormat::Json => parse_json_rows(content),
    }
}

/// Parse and normalize catalog bytes read from `path`.
///
/// The format is chosen from the path's extension.
pub fn catalog_from_bytes(path: &Path, content: &[u8]) -> Result<Catalog> {
    let text = String::from_utf8_lossy(content);
    let rows = parse_catalog(&text, CatalogFormat::from_path(path))?;
    let catalog = Catalog::from_rows(&rows);
    info!("Loaded {} foods from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Load and normalize a catalog file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    catalog_from_bytes(path, &fs::read(path)?)
}

/// Format an amount with `round_to`, keeping trailing zeros.
pub fn format_amount(value: f64, decimals: u32) -> String {
    format!("{:.*}", decimals as usize, round_to(value, decimals))
}

/// Format one report row: grams and macros to 1 decimal, kcal to integer.
pub fn export_record(row: &MealRow) -> [String; 6] {
    [
        row.name.clone(),
        format_amount(row.grams, GRAMS_DECIMALS),
        format_amount(row.kcal, KCAL_DECIMALS),
        format_amount(row.protein_g, GRAMS_DECIMALS),
        format_amount(row.carbs_g, GRAMS_DECIMALS),
        format_amount(row.fat_g, GRAMS_DECIMALS),
    ]
}

/// Write the meal rows as CSV.
pub fn write_meal_csv<P: AsRef<Path>>(path: P, rows: &[MealRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(EXPORT_HEADER)?;
    for row in rows {
        wtr.write_record(export_record(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the full report as pretty JSON.
pub fn write_report_json<P: AsRef<Path>>(path: P, report: &MealReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_rows_are_reconciled() {
        let csv = "Food Name,KCAL,Protein (g),Carbs,Fat,Serving (g)\n\
                   Chicken Breast,165,31,0,3.6,100\n";
        let rows = parse_catalog(csv, CatalogFormat::Csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("calories"), Some("165"));
        assert_eq!(rows[0].get("protein_g"), Some("31"));
        assert_eq!(rows[0].get("serving_grams"), Some("100"));
        // "Food Name" is not an alias, so the first column is used.
        assert_eq!(rows[0].get("name"), Some("Chicken Breast"));
    }

    #[test]
    fn test_short_csv_row_is_tolerated() {
        let csv = "name,calories,protein\nRice,130\n";
        let rows = parse_catalog(csv, CatalogFormat::Csv).unwrap();
        assert_eq!(rows[0].get("protein_g"), None);
    }

    #[test]
    fn test_json_rows() {
        let json = r#"[
            {"foodname": "Egg", "kcal": 78, "protein": "6.3", "fat": 5.3, "serving_g": 50, "note": null}
        ]"#;
        let rows = parse_catalog(json, CatalogFormat::Json).unwrap();
        assert_eq!(rows[0].get("name"), Some("Egg"));
        assert_eq!(rows[0].get("calories"), Some("78"));
        assert_eq!(rows[0].get("protein_g"), Some("6.3"));
        assert_eq!(rows[0].get("note"), None);
    }

    #[test]
    fn test_json_keeps_source_column_order() {
        let json = r#"[{"food": "Banana", "category": "Fruit", "kcal": 90}]"#;
        let csv = "food,category,kcal\nBanana,Fruit,90\n";

        let json_rows = parse_catalog(json, CatalogFormat::Json).unwrap();
        let csv_rows = parse_catalog(csv, CatalogFormat::Csv).unwrap();
        let from_json = crate::planner::normalize(&json_rows[0]);
        let from_csv = crate::planner::normalize(&csv_rows[0]);

        assert_eq!(from_json.record.name, "Banana");
        assert_eq!(from_json, from_csv);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(CatalogFormat::from_path("foods.JSON"), CatalogFormat::Json);
        assert_eq!(CatalogFormat::from_path("foods.csv"), CatalogFormat::Csv);
        assert_eq!(CatalogFormat::from_path("foods"), CatalogFormat::Csv);
    }

    #[test]
    fn test_load_catalog_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"name,calories,protein,carbs,fat,serving_grams\nOats,150,5,27,2.5,40\nBad,n/a,,,,\n")
            .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        let bad = catalog.find_exact("bad").unwrap();
        assert_eq!(bad.record.calories, 0.0);
        assert_eq!(bad.density.kcal_per_g, 0.0);
    }

    #[test]
    fn test_export_rounding() {
        let row = MealRow {
            name: "Oats".to_string(),
            grams: 52.37,
            kcal: 196.4,
            protein_g: 6.54,
            carbs_g: 35.3,
            fat_g: 3.27,
        };
        assert_eq!(export_record(&row), ["Oats", "52.4", "196", "6.5", "35.3", "3.3"]);
    }

    #[test]
    fn test_export_never_writes_negative_zero() {
        let row = MealRow {
            name: "Oil".to_string(),
            grams: 0.0,
            kcal: -0.0,
            protein_g: -0.0,
            carbs_g: -1e-13,
            fat_g: 0.0,
        };
        assert_eq!(export_record(&row), ["Oil", "0.0", "0", "0.0", "0.0", "0.0"]);
    }

    #[test]
    fn test_write_meal_csv() {
        let out = NamedTempFile::new().unwrap();
        let rows = vec![MealRow {
            name: "Rice".to_string(),
            grams: 100.0,
            kcal: 130.0,
            protein_g: 2.7,
            carbs_g: 28.0,
            fat_g: 0.3,
        }];
        write_meal_csv(out.path(), &rows).unwrap();

        let written = fs::read_to_string(out.path()).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("name,grams,kcal,protein_g,carbs_g,fat_g"));
        assert_eq!(lines.next(), Some("Rice,100.0,130,2.7,28.0,0.3"));
    }
}
