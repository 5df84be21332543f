use crate::planner::normalize::{
    COL_BRAND, COL_CALORIES, COL_CARBS, COL_FAT, COL_NAME, COL_PROTEIN, COL_SERVING,
};

/// Accepted header spellings per canonical column, in priority order.
const ALIASES: [(&str, &[&str]); 7] = [
    (COL_CALORIES, &["calories", "kcal"]),
    (COL_PROTEIN, &["protein", "protein_g", "protein (g)"]),
    (
        COL_CARBS,
        &["carbs", "carbohydrate", "carbs_g", "carbs (g)", "carbohydrate_g"],
    ),
    (COL_FAT, &["fat", "fat_g", "fat (g)"]),
    (
        COL_SERVING,
        &["serving_grams", "servinggrams", "serving_g", "serving (g)", "grams"],
    ),
    (COL_BRAND, &["brand"]),
    (COL_NAME, &["name", "foodname"]),
];

/// How a source column maps onto a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRole {
    /// Recognized as a canonical column.
    Canonical(&'static str),
    /// Kept under its trimmed original header.
    Raw(String),
    /// Dropped: it spells a canonical column that another header already claimed.
    Shadowed,
}

impl ColumnRole {
    /// Key to store the cell under, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            ColumnRole::Canonical(name) => Some(*name),
            ColumnRole::Raw(header) => Some(header.as_str()),
            ColumnRole::Shadowed => None,
        }
    }
}

fn is_canonical_spelling(lower: &str) -> bool {
    ALIASES
        .iter()
        .any(|(canonical, aliases)| *canonical == lower || aliases.contains(&lower))
}

/// Map source headers onto canonical column names.
///
/// Headers are trimmed and compared case-insensitively. For each canonical
/// column the first alias present wins. Without a name alias, the first
/// column becomes the name column unless it was already claimed.
pub fn reconcile_headers<S: AsRef<str>>(headers: &[S]) -> Vec<ColumnRole> {
    let trimmed: Vec<&str> = headers.iter().map(|h| h.as_ref().trim()).collect();
    let lower: Vec<String> = trimmed.iter().map(|h| h.to_lowercase()).collect();
    let mut roles: Vec<Option<ColumnRole>> = vec![None; headers.len()];

    for (canonical, aliases) in ALIASES {
        let hit = aliases.iter().find_map(|alias| {
            lower
                .iter()
                .position(|h| h == alias)
                .filter(|&i| roles[i].is_none())
        });

        match hit {
            Some(i) => roles[i] = Some(ColumnRole::Canonical(canonical)),
            None if canonical == COL_NAME && !roles.is_empty() && roles[0].is_none() => {
                roles[0] = Some(ColumnRole::Canonical(COL_NAME));
            }
            None => {}
        }
    }

    roles
        .into_iter()
        .enumerate()
        .map(|(i, role)| {
            role.unwrap_or_else(|| {
                if is_canonical_spelling(&lower[i]) {
                    ColumnRole::Shadowed
                } else {
                    ColumnRole::Raw(trimmed[i].to_string())
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(headers: &[&str]) -> Vec<Option<String>> {
        reconcile_headers(headers)
            .iter()
            .map(|r| r.key().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_aliases_are_case_insensitive_and_trimmed() {
        let got = keys(&[" Name ", "KCAL", "Protein (g)", "Carbohydrate", "Fat", "Grams"]);
        let expected: Vec<Option<String>> = [
            COL_NAME,
            COL_CALORIES,
            COL_PROTEIN,
            COL_CARBS,
            COL_FAT,
            COL_SERVING,
        ]
        .iter()
        .map(|s| Some(s.to_string()))
        .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_first_column_becomes_name() {
        let roles = reconcile_headers(&["Food Description", "calories", "Category"]);
        assert_eq!(roles[0], ColumnRole::Canonical(COL_NAME));
        assert_eq!(roles[1], ColumnRole::Canonical(COL_CALORIES));
        assert_eq!(roles[2], ColumnRole::Raw("Category".to_string()));
    }

    #[test]
    fn test_earlier_alias_wins_and_duplicate_is_shadowed() {
        let roles = reconcile_headers(&["name", "protein_g", "protein"]);
        assert_eq!(roles[2], ColumnRole::Canonical(COL_PROTEIN));
        assert_eq!(roles[1], ColumnRole::Shadowed);
    }

    #[test]
    fn test_foodname_alias() {
        let roles = reconcile_headers(&["id", "FoodName", "brand"]);
        assert_eq!(roles[0], ColumnRole::Raw("id".to_string()));
        assert_eq!(roles[1], ColumnRole::Canonical(COL_NAME));
        assert_eq!(roles[2], ColumnRole::Canonical(COL_BRAND));
    }
}
