//! # Harvest Repository
//!
//! Database operations for harvest records.
//!
//! ## Batch Insert
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_batch([{crop 1, variety 3, 10}, {crop 1, mixed, 5}], 2026-06-01)  │
//! │       │                                                                 │
//! │       ├── INSERT harvest_records (1, 3,    2026-06-01, 10, 0)  commit  │
//! │       └── INSERT harvest_records (1, NULL, 2026-06-01,  5, 0)  commit  │
//! │                                                                         │
//! │  One statement per item, in order, each committed on its own.          │
//! │  A failure part-way leaves the earlier rows in place.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Counts are written as given: callers drop zero items and keep counts
//! non-negative before calling.

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use flowerfarm_core::{HarvestFilter, HarvestRecord, HarvestUpdate, NewHarvestItem};

const HARVEST_COLUMNS: &str =
    "id, crop_id, variety_id, harvest_date, stems_cut, stems_wasted, created_at";

/// Repository for harvest record database operations.
#[derive(Debug, Clone)]
pub struct HarvestRepository {
    pool: SqlitePool,
}

impl HarvestRepository {
    /// Creates a new HarvestRepository.
    pub fn new(pool: SqlitePool) -> Self {
        HarvestRepository { pool }
    }

    /// Lists records matching every provided filter field.
    ///
    /// Most recent date first; within a date, most recently inserted first.
    ///
    /// ## Filter Building
    /// ```text
    /// SELECT ... FROM harvest_records WHERE 1=1
    ///   [AND crop_id = ?]        crop_id
    ///   [AND variety_id = ?]     variety_id
    ///   [AND harvest_date = ?]   date
    ///   [AND harvest_date >= ?]  date_from
    ///   [AND harvest_date <= ?]  date_to
    /// ORDER BY harvest_date DESC, id DESC
    /// ```
    pub async fn list(&self, filter: &HarvestFilter) -> DbResult<Vec<HarvestRecord>> {
        debug!(?filter, "Listing harvest records");

        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {HARVEST_COLUMNS} FROM harvest_records WHERE 1=1"));

        if let Some(crop_id) = filter.crop_id {
            query.push(" AND crop_id = ").push_bind(crop_id);
        }
        if let Some(variety_id) = filter.variety_id {
            query.push(" AND variety_id = ").push_bind(variety_id);
        }
        if let Some(date) = filter.date {
            query.push(" AND harvest_date = ").push_bind(date);
        }
        if let Some(from) = filter.date_from {
            query.push(" AND harvest_date >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            query.push(" AND harvest_date <= ").push_bind(to);
        }
        query.push(" ORDER BY harvest_date DESC, id DESC");

        let records = query
            .build_query_as::<HarvestRecord>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = records.len(), "Harvest records listed");
        Ok(records)
    }

    /// Gets a record by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<HarvestRecord>> {
        let record = sqlx::query_as::<_, HarvestRecord>(&format!(
            "SELECT {HARVEST_COLUMNS} FROM harvest_records WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Inserts one record and returns its id.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown crop or variety id
    pub async fn add_record(&self, item: &NewHarvestItem, harvest_date: NaiveDate) -> DbResult<i64> {
        debug!(
            crop_id = item.crop_id,
            variety_id = ?item.variety_id,
            %harvest_date,
            stems_cut = item.stems_cut,
            stems_wasted = item.stems_wasted,
            "Inserting harvest record"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO harvest_records
                (crop_id, variety_id, harvest_date, stems_cut, stems_wasted)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(item.crop_id)
        .bind(item.variety_id)
        .bind(harvest_date)
        .bind(item.stems_cut)
        .bind(item.stems_wasted)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts one record per item, sequentially, all on `harvest_date`.
    ///
    /// Not atomic: on error the items before the failing one stay written.
    ///
    /// ## Returns
    /// * `Ok(ids)` - New record ids, in item order
    pub async fn add_batch(&self, items: &[NewHarvestItem], harvest_date: NaiveDate) -> DbResult<Vec<i64>> {
        debug!(count = items.len(), %harvest_date, "Inserting harvest batch");

        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            ids.push(self.add_record(item, harvest_date).await?);
        }

        Ok(ids)
    }

    /// Applies the provided counts, one statement each.
    pub async fn update_record(&self, id: i64, update: &HarvestUpdate) -> DbResult<()> {
        debug!(id, ?update, "Updating harvest record");

        if let Some(stems_cut) = update.stems_cut {
            let result = sqlx::query("UPDATE harvest_records SET stems_cut = ?1 WHERE id = ?2")
                .bind(stems_cut)
                .bind(id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(DbError::not_found("HarvestRecord", id));
            }
        }

        if let Some(stems_wasted) = update.stems_wasted {
            let result = sqlx::query("UPDATE harvest_records SET stems_wasted = ?1 WHERE id = ?2")
                .bind(stems_wasted)
                .bind(id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(DbError::not_found("HarvestRecord", id));
            }
        }

        if update.stems_cut.is_none()
            && update.stems_wasted.is_none()
            && self.get_by_id(id).await?.is_none()
        {
            return Err(DbError::not_found("HarvestRecord", id));
        }

        Ok(())
    }

    /// Deletes a record.
    pub async fn delete_record(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting harvest record");

        let result = sqlx::query("DELETE FROM harvest_records WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("HarvestRecord", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    struct Fixture {
        db: Database,
        zinnia: i64,
        dahlia: i64,
        queen: i64,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let zinnia = db.crops().add("Zinnia", 0.5).await.unwrap();
        let dahlia = db.crops().add("Dahlia", 2.0).await.unwrap();
        let queen = db.varieties().add(zinnia, "Queen Red Lime", None).await.unwrap();
        Fixture {
            db,
            zinnia,
            dahlia,
            queen,
        }
    }

    #[tokio::test]
    async fn test_batch_inserts_every_item_on_date() {
        let f = fixture().await;

        let ids = f
            .db
            .harvests()
            .add_batch(
                &[
                    NewHarvestItem::cut(f.zinnia, Some(f.queen), 10),
                    NewHarvestItem::cut(f.zinnia, None, 5),
                ],
                day(1),
            )
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);

        let records = f.db.harvests().list(&HarvestFilter::default()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.harvest_date == day(1)));
        assert!(records.iter().all(|r| r.stems_wasted == 0));
    }

    #[tokio::test]
    async fn test_repeat_entries_are_not_merged() {
        let f = fixture().await;
        let item = NewHarvestItem::cut(f.zinnia, Some(f.queen), 3);

        f.db.harvests().add_batch(&[item.clone()], day(1)).await.unwrap();
        f.db.harvests().add_batch(&[item], day(1)).await.unwrap();

        let records = f.db.harvests().list(&HarvestFilter::default()).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_list_order_newest_first() {
        let f = fixture().await;
        let first = f.db.harvests().add_record(&NewHarvestItem::cut(f.zinnia, None, 1), day(1)).await.unwrap();
        let second = f.db.harvests().add_record(&NewHarvestItem::cut(f.zinnia, None, 2), day(2)).await.unwrap();
        let third = f.db.harvests().add_record(&NewHarvestItem::cut(f.dahlia, None, 3), day(1)).await.unwrap();

        let ids: Vec<i64> = f
            .db
            .harvests()
            .list(&HarvestFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![second, third, first]);
    }

    #[tokio::test]
    async fn test_filters_combine() {
        let f = fixture().await;
        let harvests = f.db.harvests();
        harvests.add_record(&NewHarvestItem::cut(f.zinnia, Some(f.queen), 1), day(1)).await.unwrap();
        harvests.add_record(&NewHarvestItem::cut(f.zinnia, None, 2), day(2)).await.unwrap();
        harvests.add_record(&NewHarvestItem::cut(f.zinnia, None, 3), day(3)).await.unwrap();
        harvests.add_record(&NewHarvestItem::cut(f.dahlia, None, 4), day(2)).await.unwrap();

        let by_crop = harvests
            .list(&HarvestFilter {
                crop_id: Some(f.zinnia),
                ..HarvestFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_crop.len(), 3);

        let by_variety = harvests
            .list(&HarvestFilter {
                variety_id: Some(f.queen),
                ..HarvestFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_variety.len(), 1);
        assert_eq!(by_variety[0].stems_cut, 1);

        let on_day = harvests
            .list(&HarvestFilter {
                date: Some(day(2)),
                ..HarvestFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(on_day.len(), 2);

        let ranged: Vec<i64> = harvests
            .list(&HarvestFilter {
                crop_id: Some(f.zinnia),
                date_from: Some(day(2)),
                date_to: Some(day(3)),
                ..HarvestFilter::default()
            })
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.stems_cut)
            .collect();
        assert_eq!(ranged, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_unknown_crop_is_rejected() {
        let f = fixture().await;
        assert!(matches!(
            f.db.harvests().add_record(&NewHarvestItem::cut(999, None, 1), day(1)).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_record() {
        let f = fixture().await;
        let id = f
            .db
            .harvests()
            .add_record(&NewHarvestItem::cut(f.zinnia, None, 10), day(1))
            .await
            .unwrap();

        f.db.harvests()
            .update_record(
                id,
                &HarvestUpdate {
                    stems_cut: None,
                    stems_wasted: Some(2),
                },
            )
            .await
            .unwrap();
        let record = f.db.harvests().get_by_id(id).await.unwrap().unwrap();
        assert_eq!((record.stems_cut, record.stems_wasted), (10, 2));

        f.db.harvests().delete_record(id).await.unwrap();
        assert!(f.db.harvests().get_by_id(id).await.unwrap().is_none());

        assert!(matches!(
            f.db.harvests().delete_record(id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            f.db.harvests().update_record(id, &HarvestUpdate::default()).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
