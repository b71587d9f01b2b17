//! # Command Errors
//!
//! What a write command returns when it cannot do its job.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                               ErrorCode                         │
//! │  ──────────────────────────────────   ──────────────────────────────    │
//! │  ValidationError (blank name, -1)     VALIDATION_ERROR                  │
//! │  CoreError::UnknownVariety            NOT_FOUND                         │
//! │  DbError::NotFound                    NOT_FOUND                         │
//! │  DbError::UniqueViolation             DUPLICATE                         │
//! │  DbError::ForeignKeyViolation         INVALID_REFERENCE                 │
//! │  other DbError                        DATABASE_ERROR (details logged)   │
//! │  ConfigError                          CONFIG_ERROR                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Read commands used by the screens never get here; they degrade to an
//! empty result instead (see [`crate::commands`]).

use serde::Serialize;
use tracing::{error, warn};

use crate::state::ConfigError;
use flowerfarm_core::{CoreError, ValidationError};
use flowerfarm_db::DbError;

/// Serialized as `{ "code": "DUPLICATE", "message": "crops.name 'Zinnia' already exists" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    /// Crop name, or variety name within a crop, already taken.
    Duplicate,
    /// Unknown crop/variety id, or a crop that still has harvest records.
    InvalidReference,
    DatabaseError,
    ConfigError,
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    fn database(message: &str) -> Self {
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } if value.is_empty() => {
                ApiError::new(ErrorCode::Duplicate, format!("{} already exists", field))
            }
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Duplicate,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                warn!(%message, "Rejected by foreign key");
                ApiError::new(ErrorCode::InvalidReference, "Invalid reference")
            }
            DbError::PoolExhausted => ApiError::database("Database is busy"),
            DbError::ConnectionFailed(e) => {
                error!(error = %e, "Database connection failed");
                ApiError::database("Database connection failed")
            }
            DbError::SchemaFailed(e) => {
                error!(error = %e, "Schema setup failed");
                ApiError::database("Database setup failed")
            }
            DbError::QueryFailed(e) | DbError::Internal(e) => {
                error!(error = %e, "Database operation failed");
                ApiError::database("Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownVariety { variety_id } => {
                ApiError::not_found("Variety", &variety_id.to_string())
            }
            CoreError::Validation(e) => e.into(),
            CoreError::MissingColumn { .. } => ApiError::validation(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
