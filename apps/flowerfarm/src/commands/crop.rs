//! # Crop Commands
//!
//! Crop list and CRUD for the plan screen.
//!
//! Names are validated here (non-empty after trim, bounded length) before
//! they reach the Query Layer, which stores them trimmed.

use tracing::{debug, info};

use crate::commands::or_empty;
use crate::error::{ApiError, ApiResult};
use crate::state::DbState;
use flowerfarm_core::validation::{validate_crop_name, validate_price};
use flowerfarm_core::{Crop, CropUpdate};

/// Lists crops by name, optionally filtered by a substring.
///
/// ## Arguments
/// * `search` - Case-insensitive substring; blank lists everything
///
/// ## Returns
/// Crops ordered by name. Empty when the query fails.
pub async fn list_crops(db: &DbState, search: Option<&str>) -> Vec<Crop> {
    debug!(?search, "list_crops command");
    or_empty("crops", db.inner().crops().list(search).await)
}

/// Gets a single crop.
pub async fn get_crop(db: &DbState, id: i64) -> ApiResult<Crop> {
    debug!(id, "get_crop command");

    db.inner()
        .crops()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Crop", &id.to_string()))
}

/// Adds a crop.
///
/// ## Arguments
/// * `name` - Display name, must be unique
/// * `price_per_stem` - Defaults to 0
///
/// ## Returns
/// * `Ok(Crop)` - The stored crop
/// * `Err(VALIDATION_ERROR)` - Blank name or negative price
/// * `Err(DUPLICATE)` - A crop with this name exists
pub async fn add_crop(db: &DbState, name: &str, price_per_stem: Option<f64>) -> ApiResult<Crop> {
    debug!(name = %name, ?price_per_stem, "add_crop command");

    validate_crop_name(name)?;
    let price = price_per_stem.unwrap_or(0.0);
    validate_price(price)?;

    let id = db.inner().crops().add(name, price).await?;
    info!(id, name = %name.trim(), "Crop added");

    get_crop(db, id).await
}

/// Renames a crop and/or changes its price.
pub async fn update_crop(db: &DbState, id: i64, update: CropUpdate) -> ApiResult<Crop> {
    debug!(id, ?update, "update_crop command");

    if let Some(ref name) = update.name {
        validate_crop_name(name)?;
    }
    if let Some(price) = update.price_per_stem {
        validate_price(price)?;
    }

    db.inner().crops().update(id, &update).await?;
    get_crop(db, id).await
}

/// Deletes a crop together with its varieties and recency mark.
///
/// ## Returns
/// * `Err(NOT_FOUND)` - No such crop
/// * `Err(INVALID_REFERENCE)` - Harvest records still reference the crop
pub async fn delete_crop(db: &DbState, id: i64) -> ApiResult<()> {
    debug!(id, "delete_crop command");

    db.inner().crops().delete(id).await?;
    info!(id, "Crop deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
