//! # Recording Commands
//!
//! The crop picker on the recording screen: the paged list (recent first)
//! and the recent strip above it.

use tracing::{debug, info};

use crate::commands::or_empty;
use crate::error::ApiResult;
use crate::state::{DbState, RecordingList, RecordingView};
use flowerfarm_core::Crop;

/// Reloads the recording list for a new search term.
pub async fn list_recording_crops(
    list: &RecordingList,
    db: &DbState,
    search: Option<&str>,
) -> RecordingView {
    debug!(?search, "list_recording_crops command");
    list.refresh(db.inner(), search).await
}

/// Appends the next page of the recording list.
pub async fn load_more_recording_crops(list: &RecordingList, db: &DbState) -> RecordingView {
    debug!("load_more_recording_crops command");
    list.load_more(db.inner()).await
}

/// Recently used crops, most recent first.
pub async fn recent_crops(db: &DbState, search: Option<&str>, limit: u32) -> Vec<Crop> {
    debug!(?search, limit, "recent_crops command");
    or_empty("recent crops", db.inner().recent().list_recent(search, limit).await)
}

/// Marks a crop as just used.
pub async fn mark_crop_used(db: &DbState, crop_id: i64) -> ApiResult<()> {
    db.inner().recent().mark_used(crop_id).await?;
    info!(crop_id, "Crop marked used");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
