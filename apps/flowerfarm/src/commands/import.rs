//! # Import Command
//!
//! Adds crops and varieties from a CSV file chosen by the user.
//!
//! ## Import Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DocumentPicker::pick(IMPORT_MIME_TYPES)                               │
//! │        │                                                                │
//! │        ├── cancelled ─────────────► { 0, 0, 0 }  no error               │
//! │        ▼                                                                │
//! │  read file ──── fails ────────────► { 0, 0, 0, error }                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  parse_crop_variety_csv ── no rows ► { 0, 0, 0, "No data found..." }    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  group_species (trim, dedupe, first-seen order)                        │
//! │        │                                                                │
//! │        ▼  per species                                                   │
//! │  crop exists? ── no ──► add (price 0), crops_added += 1                 │
//! │        │                                                                │
//! │        ▼  per variety                                                   │
//! │  variety exists? ── yes ► skipped += 1                                  │
//! │                  ── no ──► add, varieties_added += 1                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Existing crops are reused, not counted as skipped. A database failure
//! part way keeps the counts reached so far and sets `error`; rows written
//! before the failure stay.

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::state::DbState;
use flowerfarm_core::breakdown::group_species;
use flowerfarm_core::csv::parse_crop_variety_csv;
use flowerfarm_core::{ImportResult, IMPORT_MIME_TYPES};
use flowerfarm_db::DbError;

/// Message returned when the file has no usable rows.
pub const NO_DATA_MESSAGE: &str = "No data found. CSV should have Species and Variety columns.";

/// Lets the user choose a document to import.
pub trait DocumentPicker: Send + Sync {
    /// Asks for one document of the given MIME types.
    ///
    /// ## Returns
    /// * `Ok(Some(path))` - A readable copy of the chosen document
    /// * `Ok(None)` - The user cancelled
    fn pick(
        &self,
        mime_types: &'static [&'static str],
    ) -> impl Future<Output = std::io::Result<Option<PathBuf>>> + Send;
}

#[derive(Debug, Error)]
enum ImportError {
    #[error("Could not read file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Imports crops and varieties from a picked CSV file.
///
/// Never fails: problems are reported in [`ImportResult::error`].
pub async fn import_crops<P: DocumentPicker>(db: &DbState, picker: &P) -> ImportResult {
    debug!("import_crops command");

    let text = match read_picked(picker).await {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!("Import cancelled");
            return ImportResult::default();
        }
        Err(e) => {
            warn!(error = %e, "Import failed");
            return ImportResult::failed(e.to_string());
        }
    };

    import_crops_from_text(db, &text).await
}

/// Imports crops and varieties from CSV text.
pub async fn import_crops_from_text(db: &DbState, text: &str) -> ImportResult {
    let rows = parse_crop_variety_csv(text);
    if rows.is_empty() {
        return ImportResult::failed(NO_DATA_MESSAGE);
    }

    let mut result = ImportResult::default();
    if let Err(e) = apply_rows(db, &group_species(&rows), &mut result).await {
        warn!(error = %e, "Import stopped");
        result.error = Some(e.to_string());
        return result;
    }

    info!(
        crops_added = result.crops_added,
        varieties_added = result.varieties_added,
        skipped = result.skipped,
        "Import complete"
    );
    result
}

async fn read_picked<P: DocumentPicker>(picker: &P) -> Result<Option<String>, ImportError> {
    let Some(path) = picker.pick(IMPORT_MIME_TYPES).await? else {
        return Ok(None);
    };
    debug!(?path, "Reading import file");
    Ok(Some(tokio::fs::read_to_string(&path).await?))
}

async fn apply_rows(
    db: &DbState,
    groups: &[flowerfarm_core::breakdown::SpeciesGroup],
    result: &mut ImportResult,
) -> Result<(), ImportError> {
    let crops = db.inner().crops();
    let varieties = db.inner().varieties();

    for group in groups {
        let crop_id = match crops.find_by_name(&group.species).await? {
            Some(crop) => crop.id,
            None => {
                let id = crops.add(&group.species, 0.0).await?;
                result.crops_added += 1;
                id
            }
        };

        for name in &group.varieties {
            if varieties.find_by_name(crop_id, name).await?.is_some() {
                result.skipped += 1;
            } else {
                varieties.add(crop_id, name, None).await?;
                result.varieties_added += 1;
            }
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use super::*;
    use crate::commands::crop::{add_crop, list_crops};
    use crate::commands::test_support;
    use crate::commands::variety::list_varieties;

    /// Picker returning a fixed answer and recording the MIME types asked for.
    struct FixedPicker {
        path: Option<PathBuf>,
        asked: Mutex<Vec<&'static str>>,
    }

    impl FixedPicker {
        fn new(path: Option<PathBuf>) -> Self {
            FixedPicker {
                path,
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    impl DocumentPicker for FixedPicker {
        async fn pick(&self, mime_types: &'static [&'static str]) -> std::io::Result<Option<PathBuf>> {
            self.asked.lock().unwrap().extend_from_slice(mime_types);
            Ok(self.path.clone())
        }
    }

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_cancel_returns_zero_counts() {
        let db = test_support::db().await;
        let picker = FixedPicker::new(None);

        let result = import_crops(&db, &picker).await;
        assert_eq!(result, ImportResult::default());
        assert_eq!(
            *picker.asked.lock().unwrap(),
            vec!["text/csv", "text/comma-separated-values", "application/csv", "text/plain"]
        );
    }

    #[tokio::test]
    async fn test_import_counts_and_dedupes() {
        let db = test_support::db().await;
        let existing = add_crop(&db, "Dahlia", Some(2.5)).await.unwrap();
        db.inner()
            .varieties()
            .add(existing.id, "Cafe au Lait", None)
            .await
            .unwrap();

        let file = csv_file(
            "Species,Variety\n\
             Zinnia,Queen Red Lime\n\
             Zinnia, Queen Red Lime \n\
             Zinnia,Oklahoma Salmon\n\
             Dahlia,Cafe au Lait\n\
             Dahlia,Wizard of Oz\n\
             Amaranth,\n",
        );
        let picker = FixedPicker::new(Some(file.path().to_path_buf()));

        let result = import_crops(&db, &picker).await;
        assert_eq!(result.error, None);
        assert_eq!(result.crops_added, 2);
        assert_eq!(result.varieties_added, 3);
        assert_eq!(result.skipped, 1);

        let names: Vec<String> = list_crops(&db, None).await.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Amaranth", "Dahlia", "Zinnia"]);

        let dahlia = list_varieties(&db, Some(existing.id)).await;
        assert_eq!(dahlia.len(), 2);
    }

    #[tokio::test]
    async fn test_import_twice_skips_everything() {
        let db = test_support::db().await;
        let text = "species,variety\nZinnia,Queen Red Lime\nZinnia,Purity\n";

        import_crops_from_text(&db, text).await;
        let second = import_crops_from_text(&db, text).await;

        assert_eq!(second.crops_added, 0);
        assert_eq!(second.varieties_added, 0);
        assert_eq!(second.skipped, 2);
    }

    #[tokio::test]
    async fn test_no_species_column_reports_no_data() {
        let db = test_support::db().await;
        let result = import_crops_from_text(&db, "Name,Variety\nZinnia,Purity\n").await;

        assert_eq!(result.error.as_deref(), Some(NO_DATA_MESSAGE));
        assert_eq!(result.crops_added, 0);
        assert!(list_crops(&db, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_file_reports_error() {
        let db = test_support::db().await;
        let dir = tempfile::tempdir().unwrap();
        let picker = FixedPicker::new(Some(dir.path().join("missing.csv")));

        let result = import_crops(&db, &picker).await;
        assert!(result.error.unwrap().starts_with("Could not read file"));
        assert_eq!(result.crops_added, 0);
    }

    #[tokio::test]
    async fn test_database_failure_reports_error() {
        let db = test_support::db().await;
        db.inner().close().await;

        let result = import_crops_from_text(&db, "Species\nZinnia\n").await;
        assert!(result.error.is_some());
        assert_eq!(result.crops_added, 0);
    }
}
