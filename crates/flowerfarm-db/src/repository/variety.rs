//! # Variety Repository
//!
//! Database operations for varieties. Every query is scoped to one crop.
//!
//! ## Delete Semantics
//! ```text
//! DELETE variety
//!   └── harvest_records.variety_id  ON DELETE SET NULL
//!       → records stay, counted as mixed from then on
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::constraint_error;
use flowerfarm_core::{Variety, VarietyUpdate};

const VARIETY_COLUMNS: &str = "id, crop_id, name, price_per_stem, created_at";

/// Repository for variety database operations.
#[derive(Debug, Clone)]
pub struct VarietyRepository {
    pool: SqlitePool,
}

impl VarietyRepository {
    /// Creates a new VarietyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VarietyRepository { pool }
    }

    /// Lists a crop's varieties ordered by name.
    ///
    /// An absent or non-positive `crop_id` yields an empty list, not an error.
    pub async fn list(&self, crop_id: Option<i64>) -> DbResult<Vec<Variety>> {
        let Some(crop_id) = crop_id.filter(|id| *id > 0) else {
            return Ok(Vec::new());
        };

        debug!(crop_id, "Listing varieties");

        let varieties = sqlx::query_as::<_, Variety>(&format!(
            "SELECT {VARIETY_COLUMNS} FROM varieties WHERE crop_id = ?1 ORDER BY name"
        ))
        .bind(crop_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(varieties)
    }

    /// Gets a variety by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Variety>> {
        let variety = sqlx::query_as::<_, Variety>(&format!(
            "SELECT {VARIETY_COLUMNS} FROM varieties WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(variety)
    }

    /// Finds a variety of `crop_id` by exact (case-sensitive) name.
    pub async fn find_by_name(&self, crop_id: i64, name: &str) -> DbResult<Option<Variety>> {
        let variety = sqlx::query_as::<_, Variety>(&format!(
            "SELECT {VARIETY_COLUMNS} FROM varieties WHERE crop_id = ?1 AND name = ?2"
        ))
        .bind(crop_id)
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(variety)
    }

    /// Inserts a variety and returns its id.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - The crop already has this name
    /// * `Err(DbError::ForeignKeyViolation)` - No such crop
    pub async fn add(&self, crop_id: i64, name: &str, price_per_stem: Option<f64>) -> DbResult<i64> {
        let name = name.trim();

        debug!(crop_id, name = %name, "Inserting variety");

        let result = sqlx::query(
            "INSERT INTO varieties (crop_id, name, price_per_stem) VALUES (?1, ?2, ?3)",
        )
        .bind(crop_id)
        .bind(name)
        .bind(price_per_stem)
        .execute(&self.pool)
        .await
        .map_err(|e| constraint_error(e, name))?;

        Ok(result.last_insert_rowid())
    }

    /// Applies the provided fields of `update`, one statement each.
    ///
    /// `price_per_stem: Some(None)` clears the variety price.
    pub async fn update(&self, id: i64, update: &VarietyUpdate) -> DbResult<()> {
        debug!(id, ?update, "Updating variety");

        if let Some(name) = &update.name {
            let name = name.trim();
            let result = sqlx::query("UPDATE varieties SET name = ?1 WHERE id = ?2")
                .bind(name)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| constraint_error(e, name))?;
            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Variety", id));
            }
        }

        if let Some(price) = update.price_per_stem {
            let result = sqlx::query("UPDATE varieties SET price_per_stem = ?1 WHERE id = ?2")
                .bind(price)
                .bind(id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(DbError::not_found("Variety", id));
            }
        }

        if update.name.is_none()
            && update.price_per_stem.is_none()
            && self.get_by_id(id).await?.is_none()
        {
            return Err(DbError::not_found("Variety", id));
        }

        Ok(())
    }

    /// Deletes a variety. Its harvest records keep existing with no variety.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting variety");

        let result = sqlx::query("DELETE FROM varieties WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Variety", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::pool::{Database, DbConfig};
    use flowerfarm_core::{HarvestFilter, NewHarvestItem};

    use super::*;

    async fn db_with_crop() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let crop_id = db.crops().add("Zinnia", 0.5).await.unwrap();
        (db, crop_id)
    }

    #[tokio::test]
    async fn test_list_without_crop_is_empty() {
        let (db, crop_id) = db_with_crop().await;
        db.varieties().add(crop_id, "Queen Red Lime", None).await.unwrap();

        assert!(db.varieties().list(None).await.unwrap().is_empty());
        assert!(db.varieties().list(Some(0)).await.unwrap().is_empty());
        assert_eq!(db.varieties().list(Some(crop_id)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_ordered() {
        let (db, zinnia) = db_with_crop().await;
        let dahlia = db.crops().add("Dahlia", 0.0).await.unwrap();
        db.varieties().add(zinnia, "Queen Red Lime", Some(0.9)).await.unwrap();
        db.varieties().add(zinnia, "Benary's Giant", None).await.unwrap();
        db.varieties().add(dahlia, "Cafe au Lait", None).await.unwrap();

        let names: Vec<String> = db
            .varieties()
            .list(Some(zinnia))
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["Benary's Giant", "Queen Red Lime"]);
    }

    #[tokio::test]
    async fn test_same_name_allowed_across_crops() {
        let (db, zinnia) = db_with_crop().await;
        let dahlia = db.crops().add("Dahlia", 0.0).await.unwrap();

        db.varieties().add(zinnia, "White", None).await.unwrap();
        db.varieties().add(dahlia, "White", None).await.unwrap();

        assert!(matches!(
            db.varieties().add(zinnia, " White ", None).await,
            Err(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_for_missing_crop_is_rejected() {
        let (db, _) = db_with_crop().await;
        assert!(matches!(
            db.varieties().add(999, "Ghost", None).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_and_clear_price() {
        let (db, crop_id) = db_with_crop().await;
        let id = db.varieties().add(crop_id, "Queen Red Lime", Some(0.9)).await.unwrap();

        db.varieties()
            .update(
                id,
                &VarietyUpdate {
                    name: Some("Queen Lime Red".to_string()),
                    price_per_stem: Some(None),
                },
            )
            .await
            .unwrap();

        let variety = db.varieties().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(variety.name, "Queen Lime Red");
        assert_eq!(variety.price_per_stem, None);

        assert!(matches!(
            db.varieties().update(999, &VarietyUpdate::default()).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_find_by_name_is_scoped() {
        let (db, zinnia) = db_with_crop().await;
        let dahlia = db.crops().add("Dahlia", 0.0).await.unwrap();
        db.varieties().add(zinnia, "Red", None).await.unwrap();

        assert!(db.varieties().find_by_name(zinnia, "Red").await.unwrap().is_some());
        assert!(db.varieties().find_by_name(zinnia, "red").await.unwrap().is_none());
        assert!(db.varieties().find_by_name(dahlia, "Red").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_nulls_harvest_references() {
        let (db, crop_id) = db_with_crop().await;
        let variety_id = db.varieties().add(crop_id, "Queen Red Lime", None).await.unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        db.harvests()
            .add_batch(&[NewHarvestItem::cut(crop_id, Some(variety_id), 12)], date)
            .await
            .unwrap();

        db.varieties().delete(variety_id).await.unwrap();

        let records = db.harvests().list(&HarvestFilter::default()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].variety_id, None);
        assert_eq!(records[0].stems_cut, 12);

        assert!(matches!(
            db.varieties().delete(variety_id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
