//! # Validation Module
//!
//! Input checks applied at the edge, before anything reaches the Query Layer.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen / CLI input                                           │
//! │  ├── THIS MODULE: names, dates, prices, stem counts                    │
//! │  └── StemTally clamps counters at zero                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Query Layer (flowerfarm-db)                                  │
//! │  └── No checks: writes what it is given                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE (crop name, crop + variety name)                           │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use flowerfarm_core::validation::{parse_harvest_date, validate_crop_name};
//!
//! validate_crop_name("Zinnia").unwrap();
//! let date = parse_harvest_date("2026-06-01").unwrap();
//! assert_eq!(date.to_string(), "2026-06-01");
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest crop or variety name accepted.
pub const MAX_NAME_LEN: usize = 100;

// =============================================================================
// Names
// =============================================================================

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a crop name (non-empty after trim, bounded length).
pub fn validate_crop_name(name: &str) -> ValidationResult<()> {
    validate_name("crop name", name)
}

/// Validates a variety name.
pub fn validate_variety_name(name: &str) -> ValidationResult<()> {
    validate_name("variety name", name)
}

// =============================================================================
// Numbers
// =============================================================================

/// Validates a price per stem: finite and not negative.
///
/// ```rust
/// use flowerfarm_core::validation::validate_price;
///
/// assert!(validate_price(0.75).is_ok());
/// assert!(validate_price(-1.0).is_err());
/// assert!(validate_price(f64::NAN).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "price per stem".to_string(),
            reason: "must be a number".to_string(),
        });
    }
    if price < 0.0 {
        return Err(ValidationError::Negative {
            field: "price per stem".to_string(),
        });
    }
    Ok(())
}

/// Validates a stem count.
pub fn validate_stem_count(field: &str, count: i64) -> ValidationResult<()> {
    if count < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Dates
// =============================================================================

/// Parses a harvest date in strict `YYYY-MM-DD` form.
///
/// ```rust
/// use flowerfarm_core::validation::parse_harvest_date;
///
/// assert!(parse_harvest_date("2026-02-30").is_err());
/// assert!(parse_harvest_date("2026-6-1").is_err());
/// assert!(parse_harvest_date(" 2026-06-01 ").is_ok());
/// ```
pub fn parse_harvest_date(input: &str) -> ValidationResult<NaiveDate> {
    let input = input.trim();
    let well_formed = input.len() == 10
        && input
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "harvest date".to_string(),
            reason: format!("expected YYYY-MM-DD, got '{}'", input),
        });
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|e| ValidationError::InvalidFormat {
        field: "harvest date".to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
