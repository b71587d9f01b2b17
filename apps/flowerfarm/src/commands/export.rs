//! # Export Command
//!
//! Writes every harvest record to a CSV file and hands it to the share sheet.
//!
//! ## Export Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  export_rows()  (joined to crop / variety names)                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  write_harvest_csv   header + rows, \r\n separated                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  <export dir>/flowerfarm_harvest_<YYYY-MM-DD>.csv                      │
//! │        │                                                                │
//! │        ├── sharing unavailable ──► success, error = "Sharing not ..."   │
//! │        ▼                                                                │
//! │  ShareSheet::share(path, "text/csv", "Export harvest data")            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ExportResult { success: true, file_path }                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any failure (query, write, share) yields `success = false` with the
//! error message; nothing is raised.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::state::DbState;
use flowerfarm_core::csv::write_harvest_csv;
use flowerfarm_core::ExportResult;
use flowerfarm_db::DbError;

/// MIME type of the export file.
pub const EXPORT_MIME_TYPE: &str = "text/csv";

/// Title shown on the share sheet.
pub const SHARE_TITLE: &str = "Export harvest data";

/// Reported (with `success = true`) when the file was written but cannot
/// be shared.
pub const SHARING_UNAVAILABLE: &str = "Sharing not available on this device";

/// Hands a file to the platform's share mechanism.
pub trait ShareSheet: Send + Sync {
    /// Whether sharing is possible at all.
    fn is_available(&self) -> impl Future<Output = bool> + Send;

    /// Shares `path`, returning once the sheet is dismissed.
    fn share(
        &self,
        path: &Path,
        mime_type: &str,
        title: &str,
    ) -> impl Future<Output = std::io::Result<()>> + Send;
}

#[derive(Debug, Error)]
enum ExportError {
    #[error("No document directory available")]
    NoDirectory,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Export file name for `date`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use flowerfarm_app::commands::export::export_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
/// assert_eq!(export_file_name(date), "flowerfarm_harvest_2026-06-01.csv");
/// ```
pub fn export_file_name(date: NaiveDate) -> String {
    format!("flowerfarm_harvest_{}.csv", date.format("%Y-%m-%d"))
}

/// Exports all harvest records and offers the file for sharing.
///
/// ## Arguments
/// * `export_dir` - Where the file is written; `None` fails the export
/// * `share` - Share sheet collaborator
/// * `today` - Date used in the file name
pub async fn export_harvest<S: ShareSheet>(
    db: &DbState,
    export_dir: Option<&Path>,
    share: &S,
    today: NaiveDate,
) -> ExportResult {
    let start = Instant::now();
    debug!(?export_dir, %today, "export_harvest command");

    let path = match write_export(db, export_dir, today).await {
        Ok(path) => path,
        Err(e) => {
            warn!(error = %e, "Export failed");
            return ExportResult::failed(e.to_string());
        }
    };
    let file_path = Some(path.display().to_string());

    if !share.is_available().await {
        info!(?path, "Export written, sharing unavailable");
        return ExportResult {
            success: true,
            file_path,
            error: Some(SHARING_UNAVAILABLE.to_string()),
        };
    }

    if let Err(e) = share.share(&path, EXPORT_MIME_TYPE, SHARE_TITLE).await {
        warn!(error = %e, ?path, "Share failed");
        return ExportResult::failed(e.to_string());
    }

    info!(?path, elapsed_ms = start.elapsed().as_millis() as u64, "Export shared");
    ExportResult {
        success: true,
        file_path,
        error: None,
    }
}

async fn write_export(
    db: &DbState,
    export_dir: Option<&Path>,
    today: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let rows = db.inner().reports().export_rows().await?;
    let csv = write_harvest_csv(&rows);

    let dir = export_dir.ok_or(ExportError::NoDirectory)?;
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(export_file_name(today));
    tokio::fs::write(&path, csv).await?;

    debug!(?path, rows = rows.len(), "Export file written");
    Ok(path)
}

// =============================================================================
// Unit Tests
// =============================================================================
