//! # Report Commands
//!
//! Read-only aggregates for the analyze screen. Every command here degrades
//! to an empty (or zero) result when its query fails.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::commands::or_empty;
use crate::state::DbState;
use flowerfarm_core::{DailySummary, DayBreakdownGroup};

/// Total stems cut on `date`.
pub async fn daily_total(db: &DbState, date: NaiveDate) -> i64 {
    debug!(%date, "daily_total command");

    db.inner().reports().daily_total(date).await.unwrap_or_else(|e| {
        warn!(error = %e, %date, "Failed to load daily total");
        0
    })
}

/// Stems cut per date, newest first.
pub async fn daily_summaries(db: &DbState) -> Vec<DailySummary> {
    debug!("daily_summaries command");
    or_empty("daily summaries", db.inner().reports().daily_summaries().await)
}

/// Per-crop, per-variety breakdown of one date.
pub async fn day_breakdown(db: &DbState, date: NaiveDate) -> Vec<DayBreakdownGroup> {
    debug!(%date, "day_breakdown command");
    or_empty("day breakdown", db.inner().reports().day_breakdown(date).await)
}

// =============================================================================
// Unit Tests
// =============================================================================
