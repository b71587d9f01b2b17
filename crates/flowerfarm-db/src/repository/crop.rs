//! # Crop Repository
//!
//! Database operations for crops.
//!
//! ## Key Operations
//! - Name search (case-insensitive substring, ordered by name)
//! - CRUD, with one UPDATE statement per provided field
//! - Exact-name lookup for the importer
//!
//! ## Delete Semantics
//! ```text
//! DELETE crop
//!   ├── varieties       ON DELETE CASCADE   → removed
//!   ├── recent_crops    ON DELETE CASCADE   → removed
//!   └── harvest_records (no action)         → FOREIGN KEY violation if any exist
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{constraint_error, search_pattern};
use flowerfarm_core::{Crop, CropUpdate};

/// Column list shared by every crop SELECT.
pub(crate) const CROP_COLUMNS: &str =
    "id, name, COALESCE(price_per_stem, 0.0) AS price_per_stem, created_at";

/// Repository for crop database operations.
#[derive(Debug, Clone)]
pub struct CropRepository {
    pool: SqlitePool,
}

impl CropRepository {
    /// Creates a new CropRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CropRepository { pool }
    }

    /// Lists crops ordered by name.
    ///
    /// ## Arguments
    /// * `search` - Optional case-insensitive substring filter on the name.
    ///   Blank counts as absent.
    pub async fn list(&self, search: Option<&str>) -> DbResult<Vec<Crop>> {
        let pattern = search_pattern(search);

        debug!(search = ?pattern, "Listing crops");

        let crops = match pattern {
            Some(pattern) => {
                sqlx::query_as::<_, Crop>(&format!(
                    "SELECT {CROP_COLUMNS} FROM crops WHERE name LIKE ?1 ESCAPE '\\' ORDER BY name"
                ))
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Crop>(&format!("SELECT {CROP_COLUMNS} FROM crops ORDER BY name"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        debug!(count = crops.len(), "Crops listed");
        Ok(crops)
    }

    /// Gets a crop by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Crop>> {
        let crop = sqlx::query_as::<_, Crop>(&format!("SELECT {CROP_COLUMNS} FROM crops WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(crop)
    }

    /// Finds a crop by exact (case-sensitive) name.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Crop>> {
        let crop =
            sqlx::query_as::<_, Crop>(&format!("SELECT {CROP_COLUMNS} FROM crops WHERE name = ?1"))
                .bind(name.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(crop)
    }

    /// Inserts a crop and returns its id.
    ///
    /// ## Arguments
    /// * `name` - Stored trimmed
    /// * `price_per_stem` - Pass `0.0` when unknown
    ///
    /// ## Returns
    /// * `Ok(id)` - New crop id
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn add(&self, name: &str, price_per_stem: f64) -> DbResult<i64> {
        let name = name.trim();

        debug!(name = %name, price_per_stem, "Inserting crop");

        let result = sqlx::query(
            "INSERT INTO crops (name, price_per_stem) VALUES (?1, ?2)",
        )
        .bind(name)
        .bind(price_per_stem)
        .execute(&self.pool)
        .await
        .map_err(|e| constraint_error(e, name))?;

        Ok(result.last_insert_rowid())
    }

    /// Applies the provided fields of `update`.
    ///
    /// Each field is its own statement; an empty update only checks that the
    /// crop exists.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No crop with this id
    /// * `Err(DbError::UniqueViolation)` - Renamed onto an existing name
    pub async fn update(&self, id: i64, update: &CropUpdate) -> DbResult<()> {
        debug!(id, ?update, "Updating crop");

        if let Some(name) = &update.name {
            let name = name.trim();
            let result = sqlx::query("UPDATE crops SET name = ?1 WHERE id = ?2")
                .bind(name)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| constraint_error(e, name))?;
            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Crop", id));
            }
        }

        if let Some(price) = update.price_per_stem {
            let result = sqlx::query("UPDATE crops SET price_per_stem = ?1 WHERE id = ?2")
                .bind(price)
                .bind(id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Crop", id));
            }
        }

        if update.name.is_none() && update.price_per_stem.is_none() && self.get_by_id(id).await?.is_none() {
            return Err(DbError::not_found("Crop", id));
        }

        Ok(())
    }

    /// Deletes a crop, cascading to its varieties and recency mark.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No crop with this id
    /// * `Err(DbError::ForeignKeyViolation)` - Harvest records still reference it
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting crop");

        let result = sqlx::query("DELETE FROM crops WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Crop", id));
        }

        Ok(())
    }

    /// Counts crops (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crops")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
