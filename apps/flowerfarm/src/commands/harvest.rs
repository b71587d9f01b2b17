//! # Harvest Commands
//!
//! Saving a stem tally, and listing and correcting individual records.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  start_tally(crop)  →  StemTally (one counter per variety + mixed)     │
//! │        │                                                                │
//! │        ▼  +/- taps on the recording screen                              │
//! │  record_harvest(tally, date)                                            │
//! │        │                                                                │
//! │        ├── empty tally? ──► nothing written, crop not marked            │
//! │        │                                                                │
//! │        ├── add_batch(tally.to_batch(), date)   one row per counter     │
//! │        │                                                                │
//! │        └── mark_used(crop)                      moves crop to the top  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stem counts are checked here; the Query Layer accepts whatever it is given.

use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::commands::or_empty;
use crate::error::{ApiError, ApiResult};
use crate::state::DbState;
use flowerfarm_core::validation::validate_stem_count;
use flowerfarm_core::{HarvestFilter, HarvestRecord, HarvestUpdate, NewHarvestItem, StemTally};

/// Lists harvest records matching `filter`, newest first.
pub async fn list_harvests(db: &DbState, filter: &HarvestFilter) -> Vec<HarvestRecord> {
    debug!(?filter, "list_harvests command");
    or_empty("harvest records", db.inner().harvests().list(filter).await)
}

/// Builds zeroed counters for a crop and its current varieties.
pub async fn start_tally(db: &DbState, crop_id: i64) -> ApiResult<StemTally> {
    debug!(crop_id, "start_tally command");

    let crop = db
        .inner()
        .crops()
        .get_by_id(crop_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Crop", &crop_id.to_string()))?;
    let varieties = db.inner().varieties().list(Some(crop.id)).await?;

    Ok(StemTally::new(crop.id, &varieties))
}

/// Saves a tally as harvest records for `date` and marks the crop used.
///
/// ## Returns
/// Ids of the inserted records, in tally order. Empty (and nothing marked)
/// when every counter is zero.
///
/// ## Partial Writes
/// Records are inserted one at a time. If an insert fails, the earlier ones
/// stay and the crop is not marked.
pub async fn record_harvest(db: &DbState, tally: &StemTally, date: NaiveDate) -> ApiResult<Vec<i64>> {
    let start = Instant::now();
    let batch = tally.to_batch();

    debug!(crop_id = tally.crop_id(), %date, items = batch.len(), "record_harvest command");

    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let ids = db.inner().harvests().add_batch(&batch, date).await?;
    db.inner().recent().mark_used(tally.crop_id()).await?;

    info!(
        crop_id = tally.crop_id(),
        %date,
        records = ids.len(),
        stems = tally.total(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Harvest recorded"
    );

    Ok(ids)
}

/// Inserts a single record.
pub async fn add_harvest(db: &DbState, item: NewHarvestItem, date: NaiveDate) -> ApiResult<HarvestRecord> {
    debug!(?item, %date, "add_harvest command");

    validate_stem_count("stems_cut", item.stems_cut)?;
    validate_stem_count("stems_wasted", item.stems_wasted)?;

    let id = db.inner().harvests().add_record(&item, date).await?;
    get_harvest(db, id).await
}

/// Gets a single record.
pub async fn get_harvest(db: &DbState, id: i64) -> ApiResult<HarvestRecord> {
    db.inner()
        .harvests()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Harvest record", &id.to_string()))
}

/// Corrects the stem counts of a record.
pub async fn update_harvest(db: &DbState, id: i64, update: HarvestUpdate) -> ApiResult<HarvestRecord> {
    debug!(id, ?update, "update_harvest command");

    if let Some(cut) = update.stems_cut {
        validate_stem_count("stems_cut", cut)?;
    }
    if let Some(wasted) = update.stems_wasted {
        validate_stem_count("stems_wasted", wasted)?;
    }

    db.inner().harvests().update_record(id, &update).await?;
    get_harvest(db, id).await
}

/// Deletes a record.
pub async fn delete_harvest(db: &DbState, id: i64) -> ApiResult<()> {
    debug!(id, "delete_harvest command");

    db.inner().harvests().delete_record(id).await?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
