use tracing::{debug, warn};

use crate::models::{FoodRecord, NormalizedFood};

pub const COL_NAME: &str = "name";
pub const COL_BRAND: &str = "brand";
pub const COL_CALORIES: &str = "calories";
pub const COL_PROTEIN: &str = "protein_g";
pub const COL_CARBS: &str = "carbs_g";
pub const COL_FAT: &str = "fat_g";
pub const COL_SERVING: &str = "serving_grams";

/// Canonical numeric columns, in record order.
pub const NUMERIC_COLUMNS: [&str; 5] =
    [COL_CALORIES, COL_PROTEIN, COL_CARBS, COL_FAT, COL_SERVING];

/// A catalog row whose column names are already reconciled.
///
/// Fields keep their source column order; unrecognized columns are kept
/// under their original header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub index: usize,
    fields: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            fields: Vec::new(),
        }
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse a numeric cell, degrading anything unusable to 0.
///
/// Missing, blank, unparseable, non-finite and negative values all become 0.
pub fn parse_amount(value: Option<&str>) -> f64 {
    let Some(raw) = value else {
        return 0.0;
    };

    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Resolve the display name for a row.
///
/// Prefers the `name` column, then the first non-blank textual column,
/// then a positional identifier.
fn resolve_name(row: &RawRow) -> String {
    if let Some(name) = row.get(COL_NAME).map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    row.fields()
        .filter(|(key, _)| !NUMERIC_COLUMNS.contains(key))
        .map(|(_, value)| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("row-{}", row.index))
}

/// Turn one raw row into a record with its per-gram densities.
///
/// Never fails: malformed cells become zero.
pub fn normalize(row: &RawRow) -> NormalizedFood {
    let brand = row
        .get(COL_BRAND)
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string);

    let record = FoodRecord {
        name: resolve_name(row),
        brand,
        calories: parse_amount(row.get(COL_CALORIES)),
        protein_g: parse_amount(row.get(COL_PROTEIN)),
        carbs_g: parse_amount(row.get(COL_CARBS)),
        fat_g: parse_amount(row.get(COL_FAT)),
        serving_grams: parse_amount(row.get(COL_SERVING)),
    };

    NormalizedFood::new(record)
}

/// Normalize every row of a catalog, preserving order.
pub fn normalize_all(rows: &[RawRow]) -> Vec<NormalizedFood> {
    let foods: Vec<NormalizedFood> = rows.iter().map(normalize).collect();

    let fallback_rows = foods.iter().filter(|f| f.uses_fallback_basis()).count();
    if fallback_rows > 0 {
        warn!(
            "{} of {} rows have no serving mass; their amounts are read as per 100 g",
            fallback_rows,
            foods.len()
        );
    }
    debug!("Normalized {} rows", foods.len());

    foods
}
