//! # Domain Errors
//!
//! ```text
//! ValidationError ──► CoreError ──► ApiError (app) ──► screen / CLI
//!                                       ▲
//!                     DbError (db) ─────┘
//! ```
//!
//! Nothing here carries I/O failures; those belong to the database layer
//! and the app.

use thiserror::Error;

/// Failures of the pure tally and CSV logic.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A variety id the tally was not built with, usually because the
    /// crop's varieties changed after the recording screen opened.
    #[error("Variety {variety_id} is not part of this tally")]
    UnknownVariety { variety_id: i64 },

    #[error("CSV has no {column} column")]
    MissingColumn { column: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Rejected input. Raised at the edge, before anything reaches the
/// Query Layer.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Stem counts and prices.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Dates that are not `YYYY-MM-DD`, non-finite prices.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        assert_eq!(
            CoreError::UnknownVariety { variety_id: 7 }.to_string(),
            "Variety 7 is not part of this tally"
        );
        assert_eq!(
            CoreError::MissingColumn {
                column: "Species".to_string()
            }
            .to_string(),
            "CSV has no Species column"
        );
        assert_eq!(
            ValidationError::Negative {
                field: "stems_cut".to_string()
            }
            .to_string(),
            "stems_cut must not be negative"
        );
    }

    #[test]
    fn test_validation_wraps_into_core_error() {
        let err: CoreError = ValidationError::Required {
            field: "crop name".to_string(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: crop name is required");
    }
}
