//! # Variety Commands
//!
//! Variety list and CRUD, always scoped to one crop.

use tracing::{debug, info};

use crate::commands::or_empty;
use crate::error::{ApiError, ApiResult};
use crate::state::DbState;
use flowerfarm_core::validation::{validate_price, validate_variety_name};
use flowerfarm_core::{Variety, VarietyUpdate};

/// Lists a crop's varieties by name. No crop selected lists nothing.
pub async fn list_varieties(db: &DbState, crop_id: Option<i64>) -> Vec<Variety> {
    debug!(?crop_id, "list_varieties command");
    or_empty("varieties", db.inner().varieties().list(crop_id).await)
}

/// Gets a single variety.
pub async fn get_variety(db: &DbState, id: i64) -> ApiResult<Variety> {
    db.inner()
        .varieties()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Variety", &id.to_string()))
}

/// Adds a variety to a crop.
///
/// ## Arguments
/// * `crop_id` - Owning crop
/// * `name` - Unique within the crop
/// * `price_per_stem` - `None` falls back to the crop price
///
/// ## Returns
/// * `Err(DUPLICATE)` - The crop already has this variety
/// * `Err(INVALID_REFERENCE)` - No such crop
pub async fn add_variety(
    db: &DbState,
    crop_id: i64,
    name: &str,
    price_per_stem: Option<f64>,
) -> ApiResult<Variety> {
    debug!(crop_id, name = %name, "add_variety command");

    validate_variety_name(name)?;
    if let Some(price) = price_per_stem {
        validate_price(price)?;
    }

    let id = db.inner().varieties().add(crop_id, name, price_per_stem).await?;
    info!(id, crop_id, name = %name.trim(), "Variety added");

    get_variety(db, id).await
}

/// Renames a variety and/or sets or clears its price.
pub async fn update_variety(db: &DbState, id: i64, update: VarietyUpdate) -> ApiResult<Variety> {
    debug!(id, ?update, "update_variety command");

    if let Some(ref name) = update.name {
        validate_variety_name(name)?;
    }
    if let Some(Some(price)) = update.price_per_stem {
        validate_price(price)?;
    }

    db.inner().varieties().update(id, &update).await?;
    get_variety(db, id).await
}

/// Deletes a variety. Its harvest records stay, counted as mixed.
pub async fn delete_variety(db: &DbState, id: i64) -> ApiResult<()> {
    debug!(id, "delete_variety command");

    db.inner().varieties().delete(id).await?;
    info!(id, "Variety deleted");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
