use std::cmp::Ordering;
use std::collections::HashMap;

use strsim::jaro_winkler;
use tracing::warn;

use crate::error::{MealError, Result};
use crate::models::{NormalizedFood, NutrientDensity};
use crate::planner::constants::{FUZZY_MATCH_THRESHOLD, FUZZY_SUGGEST_THRESHOLD};
use crate::planner::normalize::{normalize_all, RawRow};

/// An immutable, normalized food catalog.
///
/// Rows keep their source order. Lookups by name are case-insensitive and
/// resolve to the first row with that name.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    foods: Vec<NormalizedFood>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(foods: Vec<NormalizedFood>) -> Self {
        let mut index = HashMap::new();
        for (i, food) in foods.iter().enumerate() {
            index.entry(food.record.key()).or_insert(i);
        }
        Self { foods, index }
    }

    /// Normalize raw rows into a catalog.
    pub fn from_rows(rows: &[RawRow]) -> Self {
        Self::new(normalize_all(rows))
    }

    /// Exact, case-insensitive lookup.
    pub fn find_exact(&self, name: &str) -> Option<&NormalizedFood> {
        self.index
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.foods[i])
    }

    /// Candidates ranked by Jaro-Winkler similarity, best first.
    fn ranked(&self, name: &str, threshold: f64) -> Vec<(&NormalizedFood, f64)> {
        let needle = name.trim().to_lowercase();
        let mut candidates: Vec<(&NormalizedFood, f64)> = self
            .foods
            .iter()
            .map(|f| (f, jaro_winkler(&f.record.key(), &needle)))
            .filter(|(_, score)| *score >= threshold)
            .collect();
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        candidates
    }

    /// Look up a food by name, falling back to the closest fuzzy match.
    pub fn find(&self, name: &str) -> Result<&NormalizedFood> {
        if let Some(food) = self.find_exact(name) {
            return Ok(food);
        }

        match self.ranked(name, FUZZY_MATCH_THRESHOLD).first() {
            Some((food, score)) => {
                warn!(
                    "No exact match for '{}'; using '{}' (similarity {:.2})",
                    name,
                    food.name(),
                    score
                );
                Ok(*food)
            }
            None => Err(MealError::FoodNotFound(name.to_string())),
        }
    }

    /// Up to `limit` names similar to `name`, for interactive suggestions.
    pub fn suggestions(&self, name: &str, limit: usize) -> Vec<&NormalizedFood> {
        self.ranked(name, FUZZY_SUGGEST_THRESHOLD)
            .into_iter()
            .take(limit)
            .map(|(f, _)| f)
            .collect()
    }

    /// Resolve an ordered list of names to foods.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&NormalizedFood>> {
        names.iter().map(|n| self.find(n.as_ref())).collect()
    }

    /// Case-insensitive substring match on name or brand.
    ///
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&NormalizedFood> {
        let needle = query.trim().to_lowercase();
        self.foods
            .iter()
            .filter(|f| {
                needle.is_empty()
                    || f.record.key().contains(&needle)
                    || f
                        .record
                        .brand
                        .as_ref()
                        .is_some_and(|b| b.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Search plus a minimum protein content per 100 g.
    pub fn filter(&self, query: &str, min_protein_per_100g: f64) -> Vec<&NormalizedFood> {
        self.search(query)
            .into_iter()
            .filter(|f| {
                min_protein_per_100g <= 0.0
                    || f.density.protein_per_100g() >= min_protein_per_100g
            })
            .collect()
    }

    /// Count of foods in the catalog.
    pub fn len(&self) -> usize {
        self.foods.len()
    }

    /// Check if the catalog has no foods.
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

/// Densities of a selection, in order.
pub fn densities(selection: &[&NormalizedFood]) -> Vec<NutrientDensity> {
    selection.iter().map(|f| f.density).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::normalize::{COL_BRAND, COL_NAME, COL_PROTEIN, COL_SERVING};

    fn row(index: usize, name: &str, protein: &str, brand: Option<&str>) -> RawRow {
        let mut row = RawRow::new(index)
            .with_field(COL_NAME, name)
            .with_field(COL_PROTEIN, protein)
            .with_field(COL_SERVING, "100");
        if let Some(brand) = brand {
            row.push(COL_BRAND, brand);
        }
        row
    }

    fn sample_catalog() -> Catalog {
        Catalog::from_rows(&[
            row(0, "Chicken Breast", "31", None),
            row(1, "Brown Rice", "2.6", Some("Uncle Ben's")),
            row(2, "Whey Protein", "80", Some("Optimum")),
            row(3, "chicken breast", "25", None),
        ])
    }

    #[test]
    fn test_find_exact_case_insensitive() {
        let catalog = sample_catalog();
        assert!(catalog.find_exact("CHICKEN BREAST").is_some());
        assert!(catalog.find_exact(" brown rice ").is_some());
        assert!(catalog.find_exact("banana").is_none());
    }

    #[test]
    fn test_duplicate_names_resolve_to_first_row() {
        let catalog = sample_catalog();
        let chicken = catalog.find_exact("chicken breast").unwrap();
        assert_eq!(chicken.record.protein_g, 31.0);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_find_fuzzy() {
        let catalog = sample_catalog();
        assert_eq!(catalog.find("Chiken Breast").unwrap().name(), "Chicken Breast");
        assert!(matches!(
            catalog.find("Olive Oil"),
            Err(MealError::FoodNotFound(_))
        ));
    }

    #[test]
    fn test_search_name_and_brand() {
        let catalog = sample_catalog();
        assert_eq!(catalog.search("rice").len(), 1);
        assert_eq!(catalog.search("optimum").len(), 1);
        assert_eq!(catalog.search("").len(), 4);
    }

    #[test]
    fn test_filter_min_protein() {
        let catalog = sample_catalog();
        let high: Vec<&str> = catalog.filter("", 30.0).into_iter().map(|f| f.name()).collect();
        assert_eq!(high, vec!["Chicken Breast", "Whey Protein"]);
    }

    #[test]
    fn test_select_preserves_order() {
        let catalog = sample_catalog();
        let selection = catalog.select(&["whey protein", "brown rice"]).unwrap();
        assert_eq!(selection[0].name(), "Whey Protein");
        assert!((densities(&selection)[1].prot_per_g - 0.026).abs() < 1e-12);
    }
}
