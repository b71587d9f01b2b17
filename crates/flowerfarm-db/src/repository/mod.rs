//! # Repository Module
//!
//! The Query Layer: per-entity data access for Flower Farm.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Query Layer Map                                      │
//! │                                                                         │
//! │  Command                                                               │
//! │       │                                                                 │
//! │       │  db.recent().list_for_recording(Some("zin"), 30, 0)            │
//! │       ▼                                                                 │
//! │  CropRepository          list / add / update / delete / find_by_name   │
//! │  VarietyRepository       list / add / update / delete / find_by_name   │
//! │  HarvestRepository       list / add_batch / add_record / update / del  │
//! │  RecentCropRepository    mark_used / list_for_recording / list_recent  │
//! │  ReportRepository        daily_total / daily_summaries / day_breakdown │
//! │                          / export_rows                                  │
//! │       │                                                                 │
//! │       │  SQL (runtime-checked, FromRow mapping)                        │
//! │       ▼                                                                 │
//! │  SQLite Database (single shared connection)                            │
//! │                                                                         │
//! │  Every write commits on its own. Multi-statement operations (batch     │
//! │  insert, per-field updates) are not wrapped in a transaction.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`crop::CropRepository`] - Crop CRUD and name search
//! - [`variety::VarietyRepository`] - Varieties scoped to a crop
//! - [`harvest::HarvestRepository`] - Harvest record writes and filtered listing
//! - [`recent::RecentCropRepository`] - Recency marks and the paged recording list
//! - [`report::ReportRepository`] - Daily aggregates, day breakdown, export rows

pub mod crop;
pub mod harvest;
pub mod recent;
pub mod report;
pub mod variety;

use chrono::{DateTime, Utc};

use crate::error::DbError;

/// Formats a UTC instant the way SQLite's `datetime('now')` does (plus
/// milliseconds), so values written from Rust and column defaults share
/// one text format.
pub(crate) fn sql_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Builds a `LIKE` pattern for a case-insensitive substring search.
///
/// Returns `None` for an absent or blank search, meaning "no filter".
/// `%`, `_` and `\` in the input match literally; queries using the
/// pattern must declare `ESCAPE '\'`.
pub(crate) fn search_pattern(search: Option<&str>) -> Option<String> {
    let search = search?.trim();
    if search.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

/// Converts an insert/update error, filling in the offending value of a
/// unique violation.
pub(crate) fn constraint_error(err: sqlx::Error, value: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } => DbError::duplicate(field, value),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern_blank_is_none() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("")), None);
        assert_eq!(search_pattern(Some("   ")), None);
    }

    #[test]
    fn test_search_pattern_trims_and_wraps() {
        assert_eq!(search_pattern(Some(" zin ")).as_deref(), Some("%zin%"));
    }

    #[test]
    fn test_sql_timestamp_matches_sqlite_format() {
        use chrono::TimeZone;

        let at = Utc.with_ymd_and_hms(2026, 6, 1, 7, 5, 9).unwrap();
        assert_eq!(sql_timestamp(at), "2026-06-01 07:05:09.000");
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(
            search_pattern(Some(r"50%_a\b")).as_deref(),
            Some(r"%50\%\_a\\b%")
        );
    }
}
