//! # Recent Crop Repository
//!
//! Recency marks and the paged crop list behind the recording screen.
//!
//! ## Recording List Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  crops c LEFT JOIN recent_crops rc                                     │
//! │                                                                         │
//! │  ORDER BY rc.last_used_at IS NOT NULL DESC   ← marked crops first      │
//! │           julianday(rc.last_used_at) DESC    ← most recent first       │
//! │           c.name ASC                         ← unmarked: alphabetical  │
//! │                                                                         │
//! │  ┌──────────────┬──────────────────────────┐                           │
//! │  │ Dahlia       │ 2026-06-02 07:10:00.000   │  marked                  │
//! │  │ Zinnia       │ 2026-06-01 18:45:00       │  marked                  │
//! │  │ Cosmos       │ NULL                      │  unmarked                │
//! │  │ Snapdragon   │ NULL                      │  unmarked                │
//! │  └──────────────┴──────────────────────────┘                           │
//! │                                                                         │
//! │  LIMIT limit + 1 OFFSET offset → Page::from_overfetch(rows, limit)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Marks are written as `YYYY-MM-DD HH:MM:SS.SSS` UTC, the format of the
//! column default. Files may also hold marks without milliseconds or in
//! RFC 3339 form, so ordering goes through `julianday()` rather than text.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::{search_pattern, sql_timestamp};
use flowerfarm_core::{Crop, Page, RecentCropMark};

/// Crop columns qualified with the `c` alias.
const JOINED_CROP_COLUMNS: &str =
    "c.id, c.name, COALESCE(c.price_per_stem, 0.0) AS price_per_stem, c.created_at";

/// Repository for recency marks.
#[derive(Debug, Clone)]
pub struct RecentCropRepository {
    pool: SqlitePool,
}

impl RecentCropRepository {
    /// Creates a new RecentCropRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RecentCropRepository { pool }
    }

    /// Marks a crop as used now. Idempotent upsert.
    pub async fn mark_used(&self, crop_id: i64) -> DbResult<()> {
        self.mark_used_at(crop_id, Utc::now()).await
    }

    /// Marks a crop as used at `at`, replacing any earlier mark.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - No such crop
    pub async fn mark_used_at(&self, crop_id: i64, at: DateTime<Utc>) -> DbResult<()> {
        debug!(crop_id, %at, "Marking crop used");

        sqlx::query(
            r#"
            INSERT INTO recent_crops (crop_id, last_used_at) VALUES (?1, ?2)
            ON CONFLICT(crop_id) DO UPDATE SET last_used_at = excluded.last_used_at
            "#,
        )
        .bind(crop_id)
        .bind(sql_timestamp(at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets the mark for a crop, if any.
    pub async fn get_mark(&self, crop_id: i64) -> DbResult<Option<RecentCropMark>> {
        let mark = sqlx::query_as::<_, RecentCropMark>(
            "SELECT crop_id, last_used_at FROM recent_crops WHERE crop_id = ?1",
        )
        .bind(crop_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(mark)
    }

    /// One page of the recording list: every crop, recently used first.
    ///
    /// ## Arguments
    /// * `search` - Optional case-insensitive name filter, applied before paging
    /// * `limit` - Page size
    /// * `offset` - Rows already loaded
    ///
    /// ## Returns
    /// `Page { page, has_more }`, where `has_more` comes from fetching one
    /// row beyond `limit`.
    pub async fn list_for_recording(
        &self,
        search: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> DbResult<Page<Crop>> {
        let pattern = search_pattern(search);
        let fetch = i64::from(limit) + 1;

        debug!(search = ?pattern, limit, offset, "Listing crops for recording");

        let where_clause = if pattern.is_some() {
            "WHERE c.name LIKE ?3 ESCAPE '\\'"
        } else {
            ""
        };
        let sql = format!(
            r#"
            SELECT {JOINED_CROP_COLUMNS}
            FROM crops c
            LEFT JOIN recent_crops rc ON c.id = rc.crop_id
            {where_clause}
            ORDER BY rc.last_used_at IS NOT NULL DESC, julianday(rc.last_used_at) DESC, c.name ASC
            LIMIT ?1 OFFSET ?2
            "#
        );

        let mut query = sqlx::query_as::<_, Crop>(&sql)
            .bind(fetch)
            .bind(i64::from(offset));
        if let Some(pattern) = pattern {
            query = query.bind(pattern);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let page = Page::from_overfetch(rows, limit as usize);
        debug!(count = page.page.len(), has_more = page.has_more, "Recording page loaded");
        Ok(page)
    }

    /// Crops that have a recency mark, most recent first.
    ///
    /// Unmarked crops never appear here, unlike
    /// [`list_for_recording`](Self::list_for_recording).
    pub async fn list_recent(&self, search: Option<&str>, limit: u32) -> DbResult<Vec<Crop>> {
        let pattern = search_pattern(search);

        debug!(search = ?pattern, limit, "Listing recent crops");

        let where_clause = if pattern.is_some() {
            "WHERE c.name LIKE ?2 ESCAPE '\\'"
        } else {
            ""
        };
        let sql = format!(
            r#"
            SELECT {JOINED_CROP_COLUMNS}
            FROM crops c
            INNER JOIN recent_crops rc ON c.id = rc.crop_id
            {where_clause}
            ORDER BY julianday(rc.last_used_at) DESC, c.name ASC
            LIMIT ?1
            "#
        );

        let mut query = sqlx::query_as::<_, Crop>(&sql).bind(i64::from(limit));
        if let Some(pattern) = pattern {
            query = query.bind(pattern);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
