//! # Database Schema
//!
//! The embedded DDL for Flower Farm.
//!
//! ## How Setup Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Schema Setup                                       │
//! │                                                                         │
//! │  Database::new()                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  init_schema(pool)                                                     │
//! │       │                                                                 │
//! │       ├── CREATE TABLE IF NOT EXISTS crops                             │
//! │       ├── CREATE TABLE IF NOT EXISTS varieties        (→ crops CASCADE)│
//! │       ├── CREATE TABLE IF NOT EXISTS harvest_records  (→ crops,        │
//! │       │                                                 varieties SET NULL)
//! │       ├── CREATE INDEX IF NOT EXISTS ... (4)                           │
//! │       ├── CREATE TABLE IF NOT EXISTS recent_crops     (→ crops CASCADE)│
//! │       └── PRAGMA user_version = SCHEMA_VERSION                         │
//! │                                                                         │
//! │  Running it again against an existing file is a no-op.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Changing the Schema
//!
//! There is no migration framework. Changes must be additive and expressible
//! with `IF NOT EXISTS`: new tables, new indexes. Never alter or drop an
//! existing table here.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Schema revision recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// Full DDL batch.
///
/// `harvest_records.crop_id` has no `ON DELETE` action: with foreign keys
/// enforced, a crop that still has harvest records cannot be deleted.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS crops (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL UNIQUE,
  price_per_stem REAL DEFAULT 0,
  created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS varieties (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  crop_id INTEGER NOT NULL REFERENCES crops(id) ON DELETE CASCADE,
  name TEXT NOT NULL,
  price_per_stem REAL,
  created_at TEXT DEFAULT (datetime('now')),
  UNIQUE(crop_id, name)
);

CREATE TABLE IF NOT EXISTS harvest_records (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  crop_id INTEGER NOT NULL REFERENCES crops(id),
  variety_id INTEGER REFERENCES varieties(id) ON DELETE SET NULL,
  harvest_date TEXT NOT NULL,
  stems_cut INTEGER NOT NULL DEFAULT 0,
  stems_wasted INTEGER NOT NULL DEFAULT 0,
  created_at TEXT DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_harvest_crop_date ON harvest_records(crop_id, harvest_date);
CREATE INDEX IF NOT EXISTS idx_harvest_date ON harvest_records(harvest_date);
CREATE INDEX IF NOT EXISTS idx_harvest_variety ON harvest_records(variety_id);
CREATE INDEX IF NOT EXISTS idx_varieties_crop ON varieties(crop_id);

CREATE TABLE IF NOT EXISTS recent_crops (
  crop_id INTEGER PRIMARY KEY REFERENCES crops(id) ON DELETE CASCADE,
  last_used_at TEXT DEFAULT (datetime('now'))
);
"#;

/// Applies the schema. Idempotent.
///
/// ## Example
/// ```rust,ignore
/// init_schema(&pool).await?;
/// init_schema(&pool).await?; // no-op
/// ```
pub async fn init_schema(pool: &SqlitePool) -> DbResult<()> {
    info!(version = SCHEMA_VERSION, "Applying database schema");

    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    // PRAGMA does not take bind parameters.
    sqlx::raw_sql(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .execute(pool)
        .await
        .map_err(|e| DbError::SchemaFailed(e.to_string()))?;

    debug!("Schema ready");
    Ok(())
}

/// Reads the schema revision stored in the file (0 for a fresh file).
pub async fn schema_version(pool: &SqlitePool) -> DbResult<i64> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    Ok(version)
}
