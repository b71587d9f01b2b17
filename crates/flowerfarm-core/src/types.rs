//! # Domain Types
//!
//! Core domain types used throughout Flower Farm.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │      Crop       │◄──│     Variety     │   │   HarvestRecord     │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │   │  id                 │   │
//! │  │  name (unique)  │   │  crop_id (FK)   │   │  crop_id (FK)       │   │
//! │  │  price_per_stem │   │  name           │   │  variety_id (FK?)   │   │
//! │  │  created_at     │   │  price_per_stem?│   │  harvest_date       │   │
//! │  └────────▲────────┘   └─────────────────┘   │  stems_cut/wasted   │   │
//! │           │                                   └─────────────────────┘   │
//! │  ┌────────┴────────┐                                                    │
//! │  │ RecentCropMark  │   one row per crop, upserted on every selection   │
//! │  │  crop_id (PK)   │                                                    │
//! │  │  last_used_at   │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity uses the integer identity assigned by the store. Harvest
//! dates are calendar dates (`YYYY-MM-DD`), never timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Crop
// =============================================================================

/// A species being grown (e.g., "Zinnia").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Crop {
    /// Store-assigned identity.
    pub id: i64,

    /// Display name, unique across crops, stored trimmed.
    pub name: String,

    /// Price of a single stem.
    pub price_per_stem: f64,

    /// When the crop was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Partial update for a crop. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropUpdate {
    pub name: Option<String>,
    pub price_per_stem: Option<f64>,
}

// =============================================================================
// Variety
// =============================================================================

/// A named cultivar within a crop (e.g., "Queen Red Lime").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Variety {
    pub id: i64,

    /// Owning crop. (crop_id, name) is unique.
    pub crop_id: i64,

    pub name: String,

    /// Variety-specific price; `None` falls back to the crop price.
    pub price_per_stem: Option<f64>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Partial update for a variety.
///
/// `price_per_stem: Some(None)` clears the variety price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarietyUpdate {
    pub name: Option<String>,
    pub price_per_stem: Option<Option<f64>>,
}

// =============================================================================
// Harvest Record
// =============================================================================

/// One logged quantity of stems for a crop/variety on a date.
///
/// Several records per (crop, variety, date) are normal: each save on the
/// recording screen appends rows and the aggregates sum them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HarvestRecord {
    pub id: i64,
    pub crop_id: i64,

    /// `None` for a mixed harvest, or after the variety was deleted.
    pub variety_id: Option<i64>,

    #[ts(as = "String")]
    pub harvest_date: NaiveDate,

    pub stems_cut: i64,
    pub stems_wasted: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// One item of a batch insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewHarvestItem {
    pub crop_id: i64,
    pub variety_id: Option<i64>,
    pub stems_cut: i64,
    #[serde(default)]
    pub stems_wasted: i64,
}

impl NewHarvestItem {
    /// Creates an item with no wasted stems.
    pub fn cut(crop_id: i64, variety_id: Option<i64>, stems_cut: i64) -> Self {
        NewHarvestItem {
            crop_id,
            variety_id,
            stems_cut,
            stems_wasted: 0,
        }
    }
}

/// Partial update for a harvest record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestUpdate {
    pub stems_cut: Option<i64>,
    pub stems_wasted: Option<i64>,
}

/// Conjunctive filter for listing harvest records.
///
/// Every `Some` field adds one `AND` clause; an empty filter lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestFilter {
    pub crop_id: Option<i64>,
    pub variety_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

// =============================================================================
// Recency
// =============================================================================

/// Last time a crop was picked for recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecentCropMark {
    pub crop_id: i64,
    #[ts(as = "String")]
    pub last_used_at: DateTime<Utc>,
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a list plus whether another page exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Builds a page from a query that asked for `limit + 1` rows.
    ///
    /// ## Over-fetch Rule
    /// ```text
    /// rows.len() <= limit  →  page = rows,          has_more = false
    /// rows.len() >  limit  →  page = rows[..limit], has_more = true
    /// ```
    /// The extra row only signals that more data exists; it is discarded,
    /// so no separate COUNT query is needed.
    pub fn from_overfetch(mut rows: Vec<T>, limit: usize) -> Self {
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        Page {
            page: rows,
            has_more,
        }
    }

    /// An empty final page.
    pub fn empty() -> Self {
        Page {
            page: Vec::new(),
            has_more: false,
        }
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Total stems cut on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailySummary {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub stems_cut: i64,
}

/// Raw (crop, variety) sum for one date, as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DayBreakdownRow {
    pub crop_name: String,
    pub variety_name: Option<String>,
    pub stems_cut: i64,
}

/// Variety-level subtotal within a day breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DayBreakdownVariety {
    /// `None` is the mixed (no variety) entry.
    pub variety_name: Option<String>,
    pub stems_cut: i64,
}

/// Crop-level group of a day breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DayBreakdownGroup {
    pub crop_name: String,
    /// Always the sum of `varieties[].stems_cut`.
    pub crop_total: i64,
    pub varieties: Vec<DayBreakdownVariety>,
}

// =============================================================================
// Import / Export
// =============================================================================

/// One row of the harvest export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct HarvestExportRow {
    pub harvest_date: NaiveDate,
    pub crop_name: String,
    pub variety_name: Option<String>,
    pub stems_cut: i64,
    pub stems_wasted: i64,
}

/// A species/variety pair read from an import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCropRow {
    pub species: String,
    pub variety: Option<String>,
}

/// Outcome of a crop/variety import.
///
/// Structural problems (empty file, no Species column) and failures are
/// reported in `error`; the import never raises.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ImportResult {
    pub crops_added: u32,
    pub varieties_added: u32,
    pub skipped: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportResult {
    /// A zero-count result carrying an error message.
    pub fn failed(message: impl Into<String>) -> Self {
        ImportResult {
            error: Some(message.into()),
            ..ImportResult::default()
        }
    }
}

/// Outcome of a harvest export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExportResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportResult {
    /// A failed export.
    pub fn failed(message: impl Into<String>) -> Self {
        ExportResult {
            success: false,
            file_path: None,
            error: Some(message.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_exact_limit_has_no_more() {
        let page = Page::from_overfetch(vec![1, 2, 3], 3);
        assert_eq!(page.page, vec![1, 2, 3]);
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_extra_row_is_trimmed() {
        let page = Page::from_overfetch(vec![1, 2, 3, 4], 3);
        assert_eq!(page.page, vec![1, 2, 3]);
        assert!(page.has_more);
    }

    #[test]
    fn test_page_short_read() {
        let page: Page<i32> = Page::from_overfetch(vec![], 30);
        assert!(page.page.is_empty());
        assert!(!page.has_more);
        assert_eq!(page, Page::empty());
    }

    #[test]
    fn test_new_harvest_item_defaults_wasted() {
        let item: NewHarvestItem =
            serde_json::from_str(r#"{"cropId":1,"varietyId":null,"stemsCut":12}"#).unwrap();
        assert_eq!(item, NewHarvestItem::cut(1, None, 12));
    }

    #[test]
    fn test_import_result_wire_shape() {
        let json = serde_json::to_value(ImportResult {
            crops_added: 2,
            varieties_added: 5,
            skipped: 1,
            error: None,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"cropsAdded": 2, "varietiesAdded": 5, "skipped": 1})
        );
    }

    #[test]
    fn test_export_result_failed() {
        let result = ExportResult::failed("disk full");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("disk full"));
        assert!(result.file_path.is_none());
    }
}
