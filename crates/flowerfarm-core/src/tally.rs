//! # Stem Tally
//!
//! The counters behind the recording screen: one per variety of the picked
//! crop plus one "mixed" counter for stems not split by variety.
//!
//! ## Recording Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Pick crop "Zinnia"                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StemTally::new(crop, varieties)                                       │
//! │  ┌──────────────────────────────┐                                      │
//! │  │ Queen Red Lime     0         │  adjust(Variety(3), +10) → 10        │
//! │  │ Benary's Giant     0         │  adjust(Variety(4), -2)  → 0 (clamp) │
//! │  │ (mixed)            0         │  adjust(Mixed, +5)       → 5         │
//! │  └──────────────────────────────┘                                      │
//! │       │                                                                 │
//! │       ▼ Save                                                            │
//! │  to_batch() → [ {variety 3, 10}, {mixed, 5} ]   zero counters dropped  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Counters never go below zero, so the batch handed to the Query Layer is
//! always made of positive counts.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{NewHarvestItem, Variety};
use crate::validation::validate_stem_count;

/// Which counter an adjustment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TallyTarget {
    /// Stems recorded against the crop without a variety.
    Mixed,
    /// Stems for one variety id.
    Variety(i64),
}

/// One variety counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyEntry {
    pub variety_id: i64,
    pub variety_name: String,
    pub count: i64,
}

/// Counters for a single crop on the recording screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StemTally {
    crop_id: i64,
    entries: Vec<TallyEntry>,
    mixed: i64,
}

impl StemTally {
    /// Creates zeroed counters, one per variety, in the given order.
    pub fn new(crop_id: i64, varieties: &[Variety]) -> Self {
        StemTally {
            crop_id,
            entries: varieties
                .iter()
                .map(|v| TallyEntry {
                    variety_id: v.id,
                    variety_name: v.name.clone(),
                    count: 0,
                })
                .collect(),
            mixed: 0,
        }
    }

    /// The crop this tally records for.
    pub fn crop_id(&self) -> i64 {
        self.crop_id
    }

    /// Variety counters in display order.
    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    /// Adds `delta` (may be negative) to a counter, clamping at zero.
    ///
    /// Returns the new count.
    pub fn adjust(&mut self, target: TallyTarget, delta: i64) -> CoreResult<i64> {
        let slot = self.slot_mut(target)?;
        *slot = slot.saturating_add(delta).max(0);
        Ok(*slot)
    }

    /// Sets a counter to an absolute value.
    ///
    /// Unlike [`adjust`](Self::adjust), a negative value is rejected rather
    /// than clamped: it can only come from typed input.
    pub fn set(&mut self, target: TallyTarget, count: i64) -> CoreResult<()> {
        validate_stem_count("stems_cut", count)?;
        *self.slot_mut(target)? = count;
        Ok(())
    }

    /// Current value of a counter.
    pub fn count(&self, target: TallyTarget) -> Option<i64> {
        match target {
            TallyTarget::Mixed => Some(self.mixed),
            TallyTarget::Variety(id) => self
                .entries
                .iter()
                .find(|e| e.variety_id == id)
                .map(|e| e.count),
        }
    }

    /// Sum of the variety counters.
    pub fn variety_total(&self) -> i64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Sum of every counter, mixed included.
    pub fn total(&self) -> i64 {
        self.variety_total() + self.mixed
    }

    /// True when saving would write nothing.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Converts the counters into batch items.
    ///
    /// Varieties come first in tally order, the mixed counter last; zero
    /// counters are left out.
    pub fn to_batch(&self) -> Vec<NewHarvestItem> {
        let mut items: Vec<NewHarvestItem> = self
            .entries
            .iter()
            .filter(|e| e.count > 0)
            .map(|e| NewHarvestItem::cut(self.crop_id, Some(e.variety_id), e.count))
            .collect();

        if self.mixed > 0 {
            items.push(NewHarvestItem::cut(self.crop_id, None, self.mixed));
        }

        items
    }

    fn slot_mut(&mut self, target: TallyTarget) -> CoreResult<&mut i64> {
        match target {
            TallyTarget::Mixed => Ok(&mut self.mixed),
            TallyTarget::Variety(id) => self
                .entries
                .iter_mut()
                .find(|e| e.variety_id == id)
                .map(|e| &mut e.count)
                .ok_or(CoreError::UnknownVariety { variety_id: id }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
