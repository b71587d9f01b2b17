//! # Commands Module
//!
//! All commands exposed to the screens (and the CLI standing in for them).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── crop.rs       ◄─── Crop CRUD
//! ├── variety.rs    ◄─── Variety CRUD
//! ├── harvest.rs    ◄─── Harvest records, tally save
//! ├── recording.rs  ◄─── Paged recording list, recent strip
//! ├── report.rs     ◄─── Daily totals, summaries, breakdown
//! ├── import.rs     ◄─── Crop/variety CSV import
//! └── export.rs     ◄─── Harvest CSV export + share
//! ```
//!
//! ## Two Kinds of Failure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Writes (add / update / delete / record)                               │
//! │     → ApiResult<T>: constraint violations reach the caller as          │
//! │       DUPLICATE / INVALID_REFERENCE / NOT_FOUND                        │
//! │                                                                         │
//! │  Reads behind a list or summary                                        │
//! │     → plain T: failures are logged with warn! and degrade to an        │
//! │       empty result, so the screen keeps rendering                      │
//! │                                                                         │
//! │  Import / Export                                                       │
//! │     → ImportResult / ExportResult: failures are carried in `error`     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn list_crops(db: &DbState, search: Option<&str>)
//!
//! // Needs the list state and the database
//! async fn list_recording_crops(list: &RecordingList, db: &DbState, search: Option<&str>)
//! ```

pub mod crop;
pub mod export;
pub mod harvest;
pub mod import;
pub mod recording;
pub mod report;
pub mod variety;

use tracing::warn;

use flowerfarm_db::DbResult;

/// Unwraps a read, logging and substituting the empty value on failure.
pub(crate) fn or_empty<T: Default>(what: &str, result: DbResult<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load {}", what);
        T::default()
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use flowerfarm_db::{Database, DbConfig};

    use crate::state::DbState;

    /// A fresh in-memory database wrapped as command state.
    pub(crate) async fn db() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }
}
