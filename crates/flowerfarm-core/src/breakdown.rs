//! # Grouping
//!
//! Application-side regrouping of flat query results.
//!
//! ## Day Breakdown
//! ```text
//! Store rows (sorted by crop name, variety name):
//!   Dahlia  | NULL           | 5
//!   Zinnia  | NULL           | 5          ┌───────────────────────────────┐
//!   Zinnia  | Queen Red Lime | 5    ──►   │ Dahlia  total 5               │
//!                                         │   (mixed)          5          │
//!                                         │ Zinnia  total 10              │
//!                                         │   (mixed)          5          │
//!                                         │   Queen Red Lime   5          │
//!                                         └───────────────────────────────┘
//! ```
//!
//! ## Import Deduplication
//! Parsed rows collapse into species → distinct varieties, both in
//! first-seen order. Matching is exact and case-sensitive.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{DayBreakdownGroup, DayBreakdownRow, DayBreakdownVariety, ParsedCropRow};

/// Nests (crop, variety) sums under their crop.
///
/// Rows keep their order; a crop's group appears where its first row does.
/// `crop_total` is the sum of the group's variety entries.
pub fn group_day_breakdown(rows: Vec<DayBreakdownRow>) -> Vec<DayBreakdownGroup> {
    let mut groups: Vec<DayBreakdownGroup> = Vec::new();

    for row in rows {
        let entry = DayBreakdownVariety {
            variety_name: row.variety_name,
            stems_cut: row.stems_cut,
        };

        match groups.iter_mut().find(|g| g.crop_name == row.crop_name) {
            Some(group) => {
                group.crop_total += entry.stems_cut;
                group.varieties.push(entry);
            }
            None => groups.push(DayBreakdownGroup {
                crop_name: row.crop_name,
                crop_total: entry.stems_cut,
                varieties: vec![entry],
            }),
        }
    }

    groups
}

/// A species and the distinct, non-empty variety names seen for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesGroup {
    pub species: String,
    pub varieties: Vec<String>,
}

/// Deduplicates parsed import rows into species groups.
///
/// ```rust
/// use flowerfarm_core::breakdown::group_species;
/// use flowerfarm_core::ParsedCropRow;
///
/// let row = |s: &str, v: Option<&str>| ParsedCropRow {
///     species: s.into(),
///     variety: v.map(Into::into),
/// };
/// let groups = group_species(&[row("Rose", Some("Red")), row("Rose", Some("Red")), row("Tulip", None)]);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].varieties, vec!["Red".to_string()]);
/// assert!(groups[1].varieties.is_empty());
/// ```
pub fn group_species(rows: &[ParsedCropRow]) -> Vec<SpeciesGroup> {
    let mut groups: Vec<SpeciesGroup> = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for row in rows {
        let species = row.species.trim();
        if species.is_empty() {
            continue;
        }

        let index = match groups.iter().position(|g| g.species == species) {
            Some(i) => i,
            None => {
                groups.push(SpeciesGroup {
                    species: species.to_string(),
                    varieties: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let Some(variety) = row.variety.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        if seen.insert((species.to_string(), variety.to_string())) {
            groups[index].varieties.push(variety.to_string());
        }
    }

    groups
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(crop: &str, variety: Option<&str>, stems: i64) -> DayBreakdownRow {
        DayBreakdownRow {
            crop_name: crop.to_string(),
            variety_name: variety.map(str::to_string),
            stems_cut: stems,
        }
    }

    fn parsed(species: &str, variety: Option<&str>) -> ParsedCropRow {
        ParsedCropRow {
            species: species.to_string(),
            variety: variety.map(str::to_string),
        }
    }

    #[test]
    fn test_breakdown_nests_and_totals() {
        let groups = group_day_breakdown(vec![
            row("cropA", None, 5),
            row("cropA", Some("varietyX"), 5),
            row("cropB", Some("Y"), 2),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].crop_name, "cropA");
        assert_eq!(groups[0].crop_total, 10);
        assert_eq!(
            groups[0].varieties,
            vec![
                DayBreakdownVariety { variety_name: None, stems_cut: 5 },
                DayBreakdownVariety { variety_name: Some("varietyX".to_string()), stems_cut: 5 },
            ]
        );
        assert_eq!(groups[1].crop_total, 2);
    }

    #[test]
    fn test_breakdown_total_matches_varieties() {
        let groups = group_day_breakdown(vec![
            row("Zinnia", Some("A"), 3),
            row("Zinnia", Some("B"), 4),
            row("Zinnia", Some("C"), 11),
        ]);
        let sum: i64 = groups[0].varieties.iter().map(|v| v.stems_cut).sum();
        assert_eq!(groups[0].crop_total, sum);
    }

    #[test]
    fn test_breakdown_empty() {
        assert!(group_day_breakdown(Vec::new()).is_empty());
    }

    #[test]
    fn test_species_dedup_is_case_sensitive() {
        let groups = group_species(&[
            parsed("Rose", Some("Red")),
            parsed("Rose", Some("red")),
            parsed("rose", Some("Red")),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].varieties, vec!["Red".to_string(), "red".to_string()]);
        assert_eq!(groups[1].species, "rose");
    }

    #[test]
    fn test_species_keeps_first_seen_order() {
        let groups = group_species(&[
            parsed("Zinnia", Some("B")),
            parsed("Dahlia", None),
            parsed("Zinnia", Some("A")),
            parsed("Zinnia", Some("B")),
        ]);
        assert_eq!(groups[0].species, "Zinnia");
        assert_eq!(groups[0].varieties, vec!["B".to_string(), "A".to_string()]);
        assert_eq!(groups[1].species, "Dahlia");
    }

    #[test]
    fn test_species_skips_blank_values() {
        let groups = group_species(&[parsed("  ", Some("Red")), parsed("Rose", Some("  "))]);
        assert_eq!(groups, vec![SpeciesGroup { species: "Rose".to_string(), varieties: vec![] }]);
    }
}
