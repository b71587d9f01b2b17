//! # Database Handle
//!
//! Creation and configuration of the single shared SQLite handle.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Shared Database Handle                             │
//! │                                                                         │
//! │  Process start                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure handle settings                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Open file + apply schema (once)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐                                 │                           │
//! │  │  │Conn1│   max_connections = 1           │                           │
//! │  │  └─────┘                                 │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ Database is cloned into app state, repositories clone the pool │
//! │       ▼                                                                 │
//! │  Command 1 ──┐                                                          │
//! │  Command 2 ──┼──► Conn1 (statements run one at a time, callers await)  │
//! │  Command 3 ──┘                                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handle is constructed explicitly and passed around; there is no
//! lazily-initialized global.
//!
//! ## Connection Settings
//! - WAL journal, NORMAL synchronous (file databases)
//! - busy timeout so a locked file waits instead of failing
//! - `foreign_keys` ON (SQLite defaults it off)
//! - file created when missing

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::crop::CropRepository;
use crate::repository::harvest::HarvestRepository;
use crate::repository::recent::RecentCropRepository;
use crate::repository::report::ReportRepository;
use crate::repository::variety::VarietyRepository;
use crate::schema;

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how long callers may wait on it.
///
/// The handle always holds exactly one connection, opened at start and kept
/// for the life of the process.
///
/// ```rust,ignore
/// let config = DbConfig::new(data_dir.join("flowerfarm.db"))
///     .busy_timeout(Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// File path, or `None` for a private in-memory database.
    pub database_path: Option<PathBuf>,

    /// How long a command waits for the connection while another command
    /// holds it. Default: 30 seconds
    pub acquire_timeout: Duration,

    /// How long SQLite retries a locked file before failing.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Apply the schema when opening. Default: true
    pub init_schema: bool,
}

impl DbConfig {
    /// A database stored in `path`; the file is created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: Some(path.into()),
            ..DbConfig::in_memory()
        }
    }

    /// A fresh, empty in-memory database. Every call yields a separate one.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: None,
            acquire_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
            init_schema: true,
        }
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn init_schema(mut self, init: bool) -> Self {
        self.init_schema = init;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.is_none()
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.database_path {
            Some(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
            None => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
        };

        // SQLite ships with foreign keys off.
        Ok(options
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// The shared database handle. Repositories are handed out per call.
///
/// Cloning is cheap and every clone uses the same connection.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new(path)).await?;
///
/// let crops = db.crops().list(Some("zin")).await?;
/// let total = db.reports().daily_total(today).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the connection and applies the schema.
    ///
    /// ## Returns
    /// * `Err(DbError::ConnectionFailed)` - The file cannot be opened or created
    /// * `Err(DbError::SchemaFailed)` - The DDL batch was rejected
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        match &config.database_path {
            Some(path) => info!(path = %path.display(), "Opening database"),
            None => info!("Opening in-memory database"),
        }

        let options = config.connect_options()?;

        // One connection, never reaped: an in-memory database lives only as
        // long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            acquire_timeout_ms = config.acquire_timeout.as_millis() as u64,
            "Database connection open"
        );

        let db = Database { pool };

        if config.init_schema {
            db.init_schema().await?;
        }

        Ok(db)
    }

    /// Applies the schema. Safe to call repeatedly.
    pub async fn init_schema(&self) -> DbResult<()> {
        schema::init_schema(&self.pool).await
    }

    /// The underlying pool, for statements no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn crops(&self) -> CropRepository {
        CropRepository::new(self.pool.clone())
    }

    pub fn varieties(&self) -> VarietyRepository {
        VarietyRepository::new(self.pool.clone())
    }

    pub fn harvests(&self) -> HarvestRepository {
        HarvestRepository::new(self.pool.clone())
    }

    /// Recency marks and the recording screen's crop list.
    pub fn recent(&self) -> RecentCropRepository {
        RecentCropRepository::new(self.pool.clone())
    }

    /// Daily aggregates and export rows.
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// Closes the connection. Every later repository call fails.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// True when a trivial statement succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let a = Database::new(DbConfig::in_memory()).await.unwrap();
        let b = Database::new(DbConfig::in_memory()).await.unwrap();

        a.crops().add("Zinnia", 0.0).await.unwrap();

        assert_eq!(a.crops().list(None).await.unwrap().len(), 1);
        assert!(b.crops().list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_close_fails_later_calls() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
        assert!(db.crops().list(None).await.is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/flowerfarm.db")
            .busy_timeout(Duration::from_secs(1))
            .acquire_timeout(Duration::from_secs(2))
            .init_schema(false);

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/flowerfarm.db")));
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
        assert_eq!(config.acquire_timeout, Duration::from_secs(2));
        assert!(!config.init_schema);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[tokio::test]
    async fn test_single_connection() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.pool().options().get_max_connections(), 1);
    }
}
