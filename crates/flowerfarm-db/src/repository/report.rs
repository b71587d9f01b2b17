//! # Report Repository
//!
//! Read-only aggregates over harvest records.
//!
//! ## Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  daily_total(date)     SUM(stems_cut) for one date, 0 when none        │
//! │  daily_summaries()     one row per date, newest first                  │
//! │  day_breakdown(date)   SUM per (crop, variety) → grouped by crop       │
//! │  export_rows()         every record with crop/variety names            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Joins
//! `day_breakdown` and `export_rows` inner-join `crops`, so a record whose
//! crop no longer exists is left out of them. The two total queries read
//! `harvest_records` alone and still count such records.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use flowerfarm_core::breakdown::group_day_breakdown;
use flowerfarm_core::{DailySummary, DayBreakdownGroup, DayBreakdownRow, HarvestExportRow};

/// Repository for aggregate queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Total stems cut on `date`.
    pub async fn daily_total(&self, date: NaiveDate) -> DbResult<i64> {
        debug!(%date, "Loading daily total");

        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(stems_cut), 0) FROM harvest_records WHERE harvest_date = ?1",
        )
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Stems cut per date, newest date first.
    pub async fn daily_summaries(&self) -> DbResult<Vec<DailySummary>> {
        debug!("Loading daily summaries");

        let summaries = sqlx::query_as::<_, DailySummary>(
            r#"
            SELECT harvest_date AS date, SUM(stems_cut) AS stems_cut
            FROM harvest_records
            GROUP BY harvest_date
            ORDER BY harvest_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Flat (crop, variety) sums for `date`, ordered by crop then variety
    /// name. The mixed entry (no variety) sorts first within its crop.
    pub async fn day_breakdown_rows(&self, date: NaiveDate) -> DbResult<Vec<DayBreakdownRow>> {
        let rows = sqlx::query_as::<_, DayBreakdownRow>(
            r#"
            SELECT c.name AS crop_name, v.name AS variety_name, SUM(h.stems_cut) AS stems_cut
            FROM harvest_records h
            JOIN crops c ON h.crop_id = c.id
            LEFT JOIN varieties v ON h.variety_id = v.id
            WHERE h.harvest_date = ?1
            GROUP BY h.crop_id, h.variety_id
            ORDER BY c.name, v.name
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Per-crop breakdown of `date`, each crop carrying its variety subtotals.
    pub async fn day_breakdown(&self, date: NaiveDate) -> DbResult<Vec<DayBreakdownGroup>> {
        debug!(%date, "Loading day breakdown");

        let rows = self.day_breakdown_rows(date).await?;
        Ok(group_day_breakdown(rows))
    }

    /// Every harvest record joined to its names, for CSV export.
    pub async fn export_rows(&self) -> DbResult<Vec<HarvestExportRow>> {
        debug!("Loading export rows");

        let rows = sqlx::query_as::<_, HarvestExportRow>(
            r#"
            SELECT
                h.harvest_date,
                c.name AS crop_name,
                v.name AS variety_name,
                h.stems_cut,
                h.stems_wasted
            FROM harvest_records h
            JOIN crops c ON h.crop_id = c.id
            LEFT JOIN varieties v ON h.variety_id = v.id
            ORDER BY h.harvest_date, c.name, v.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Export rows loaded");
        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use flowerfarm_core::{DayBreakdownVariety, NewHarvestItem};

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_daily_total_defaults_to_zero() {
        let db = db().await;
        assert_eq!(db.reports().daily_total(day(1)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_daily_total_sums_one_date() {
        let db = db().await;
        let crop = db.crops().add("Zinnia", 0.0).await.unwrap();
        db.harvests()
            .add_batch(
                &[NewHarvestItem::cut(crop, None, 10), NewHarvestItem::cut(crop, None, 7)],
                day(1),
            )
            .await
            .unwrap();
        db.harvests()
            .add_batch(&[NewHarvestItem::cut(crop, None, 100)], day(2))
            .await
            .unwrap();

        assert_eq!(db.reports().daily_total(day(1)).await.unwrap(), 17);
    }

    #[tokio::test]
    async fn test_daily_summaries_newest_first() {
        let db = db().await;
        let crop = db.crops().add("Zinnia", 0.0).await.unwrap();
        for (d, stems) in [(1, 5), (3, 2), (1, 4), (2, 8)] {
            db.harvests()
                .add_record(&NewHarvestItem::cut(crop, None, stems), day(d))
                .await
                .unwrap();
        }

        let summaries = db.reports().daily_summaries().await.unwrap();
        assert_eq!(
            summaries,
            vec![
                DailySummary { date: day(3), stems_cut: 2 },
                DailySummary { date: day(2), stems_cut: 8 },
                DailySummary { date: day(1), stems_cut: 9 },
            ]
        );
    }

    #[tokio::test]
    async fn test_day_breakdown_aggregates_per_variety() {
        let db = db().await;
        let crop_a = db.crops().add("cropA", 0.0).await.unwrap();
        let x = db.varieties().add(crop_a, "varietyX", None).await.unwrap();
        db.harvests()
            .add_batch(
                &[
                    NewHarvestItem::cut(crop_a, Some(x), 3),
                    NewHarvestItem::cut(crop_a, Some(x), 2),
                    NewHarvestItem::cut(crop_a, None, 5),
                ],
                day(1),
            )
            .await
            .unwrap();

        let groups = db.reports().day_breakdown(day(1)).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].crop_name, "cropA");
        assert_eq!(groups[0].crop_total, 10);
        assert_eq!(
            groups[0].varieties,
            vec![
                DayBreakdownVariety { variety_name: None, stems_cut: 5 },
                DayBreakdownVariety { variety_name: Some("varietyX".to_string()), stems_cut: 5 },
            ]
        );
    }

    #[tokio::test]
    async fn test_day_breakdown_orders_crops_and_ignores_other_dates() {
        let db = db().await;
        let zinnia = db.crops().add("Zinnia", 0.0).await.unwrap();
        let dahlia = db.crops().add("Dahlia", 0.0).await.unwrap();
        let b = db.varieties().add(zinnia, "B", None).await.unwrap();
        let a = db.varieties().add(zinnia, "A", None).await.unwrap();
        db.harvests()
            .add_batch(
                &[
                    NewHarvestItem::cut(zinnia, Some(b), 4),
                    NewHarvestItem::cut(zinnia, Some(a), 6),
                    NewHarvestItem::cut(dahlia, None, 1),
                ],
                day(1),
            )
            .await
            .unwrap();
        db.harvests()
            .add_record(&NewHarvestItem::cut(zinnia, Some(a), 50), day(2))
            .await
            .unwrap();

        let groups = db.reports().day_breakdown(day(1)).await.unwrap();
        let crops: Vec<(&str, i64)> = groups.iter().map(|g| (g.crop_name.as_str(), g.crop_total)).collect();
        assert_eq!(crops, vec![("Dahlia", 1), ("Zinnia", 10)]);

        let zinnia_varieties: Vec<Option<&str>> = groups[1]
            .varieties
            .iter()
            .map(|v| v.variety_name.as_deref())
            .collect();
        assert_eq!(zinnia_varieties, vec![Some("A"), Some("B")]);

        assert!(db.reports().day_breakdown(day(9)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_rows_order_and_names() {
        let db = db().await;
        let zinnia = db.crops().add("Zinnia", 0.0).await.unwrap();
        let dahlia = db.crops().add("Dahlia", 0.0).await.unwrap();
        let queen = db.varieties().add(zinnia, "Queen Red Lime", None).await.unwrap();
        db.harvests()
            .add_record(&NewHarvestItem::cut(zinnia, Some(queen), 12), day(2))
            .await
            .unwrap();
        db.harvests()
            .add_record(
                &NewHarvestItem {
                    crop_id: zinnia,
                    variety_id: None,
                    stems_cut: 3,
                    stems_wasted: 1,
                },
                day(1),
            )
            .await
            .unwrap();
        db.harvests()
            .add_record(&NewHarvestItem::cut(dahlia, None, 7), day(2))
            .await
            .unwrap();

        let rows = db.reports().export_rows().await.unwrap();
        let keys: Vec<(NaiveDate, &str, Option<&str>)> = rows
            .iter()
            .map(|r| (r.harvest_date, r.crop_name.as_str(), r.variety_name.as_deref()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (day(1), "Zinnia", None),
                (day(2), "Dahlia", None),
                (day(2), "Zinnia", Some("Queen Red Lime")),
            ]
        );
        assert_eq!(rows[0].stems_wasted, 1);
    }

    #[tokio::test]
    async fn test_orphaned_records_counted_in_totals_only() {
        let db = db().await;
        let zinnia = db.crops().add("Zinnia", 0.0).await.unwrap();
        let ghost = db.crops().add("Ghost", 0.0).await.unwrap();
        db.harvests()
            .add_batch(
                &[NewHarvestItem::cut(zinnia, None, 4), NewHarvestItem::cut(ghost, None, 6)],
                day(1),
            )
            .await
            .unwrap();

        // Simulate a file written without foreign key enforcement.
        let mut conn = db.pool().acquire().await.unwrap();
        sqlx::query("PRAGMA foreign_keys = OFF").execute(&mut *conn).await.unwrap();
        sqlx::query("DELETE FROM crops WHERE id = ?1")
            .bind(ghost)
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await.unwrap();
        drop(conn);

        assert_eq!(db.reports().daily_total(day(1)).await.unwrap(), 10);
        assert_eq!(db.reports().daily_summaries().await.unwrap()[0].stems_cut, 10);

        let groups = db.reports().day_breakdown(day(1)).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].crop_total, 4);
        assert_eq!(db.reports().export_rows().await.unwrap().len(), 1);
    }
}
