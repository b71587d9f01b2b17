//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! ## Thread Safety
//! The `Database` struct from `flowerfarm-db` holds a `SqlitePool` capped at
//! one connection. Commands may run concurrently; their queries queue on
//! that connection.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn list_crops(db: &DbState, search: Option<&str>) -> ApiResult<Vec<Crop>> {
//!     Ok(db.inner().crops().list(search).await?)
//! }
//! ```

use flowerfarm_db::Database;

/// Wrapper around `Database` for command state.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database handle.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
