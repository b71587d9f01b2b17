//! # Query Layer Errors
//!
//! Every repository call returns [`DbResult`]. SQLite failures are sorted into
//! the few cases a caller can act on.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error                                                            │
//! │     │                                                                   │
//! │     ├── Database, kind = UniqueViolation      → UniqueViolation         │
//! │     │     "UNIQUE constraint failed: crops.name"  field = crops.name    │
//! │     ├── Database, kind = ForeignKeyViolation  → ForeignKeyViolation     │
//! │     ├── Database, anything else               → QueryFailed             │
//! │     ├── PoolTimedOut                          → PoolExhausted           │
//! │     ├── PoolClosed                            → ConnectionFailed        │
//! │     └── everything else                       → Internal                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Constraint violations are never swallowed here: a duplicate crop name
//! reaches the caller as [`DbError::UniqueViolation`], and the app turns it
//! into a `DUPLICATE` error.

use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

/// Prefix of SQLite's unique-constraint message, followed by the columns.
const UNIQUE_FAILED_PREFIX: &str = "UNIQUE constraint failed: ";

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with the given id (update, delete, or a lookup that must hit).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A crop name, or a (crop, variety name) pair, is already taken.
    ///
    /// `field` holds the columns reported by SQLite, e.g. `crops.name` or
    /// `varieties.crop_id, varieties.name`.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A harvest record names a crop or variety that does not exist, or a
    /// crop with harvest records was deleted.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The file could not be opened, or the handle was closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),

    /// SQLite rejected the statement for a non-constraint reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The single connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True for UNIQUE and FOREIGN KEY violations.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. }
        )
    }

    fn from_database(err: &dyn DatabaseError) -> Self {
        let message = err.message();
        match err.kind() {
            ErrorKind::UniqueViolation => {
                let field = message
                    .strip_prefix(UNIQUE_FAILED_PREFIX)
                    .unwrap_or(message);
                // The value is filled in by the repository, which knows it.
                DbError::duplicate(field, "")
            }
            ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                message: message.to_string(),
            },
            _ => DbError::QueryFailed(message.to_string()),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) => DbError::from_database(db_err.as_ref()),
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
