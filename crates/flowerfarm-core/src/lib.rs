//! # flowerfarm-core: Pure Logic for Flower Farm
//!
//! This crate holds everything in Flower Farm that can be computed without
//! touching a disk, a database or a share sheet.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Flower Farm Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Screens (Record / Plan / Analyze)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          Commands (apps/flowerfarm) + Import / Export           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ flowerfarm-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │  types   │  │   csv    │  │  tally   │  │  breakdown   │   │   │
//! │  │   │  Crop    │  │  parse   │  │ counters │  │  day groups  │   │   │
//! │  │   │  Variety │  │  escape  │  │ to_batch │  │  species map │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                flowerfarm-db (Query Layer)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Crop, Variety, HarvestRecord, Page, ...)
//! - [`csv`] - CSV import parser and export writer
//! - [`tally`] - Stem counters behind the recording screen
//! - [`breakdown`] - Day breakdown regrouping and import deduplication
//! - [`sequence`] - Request sequencing for stale-result suppression
//! - [`validation`] - Input checks applied at the edge
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use flowerfarm_core::csv::parse_crop_variety_csv;
//!
//! let rows = parse_crop_variety_csv("Species,Variety\nZinnia,Queen Red Lime\n");
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].species, "Zinnia");
//! assert_eq!(rows[0].variety.as_deref(), Some("Queen Red Lime"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod breakdown;
pub mod csv;
pub mod error;
pub mod sequence;
pub mod tally;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use sequence::{RequestSequence, RequestTicket};
pub use tally::{StemTally, TallyTarget};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rows per page on the recording screen's crop list.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// How many crops the "recent crops" strip shows.
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

/// Header line of the harvest export file.
pub const EXPORT_HEADER: &str = "harvest_date,species,variety,stems_cut,stems_wasted";

/// MIME types accepted by the import document picker.
pub const IMPORT_MIME_TYPES: &[&str] = &[
    "text/csv",
    "text/comma-separated-values",
    "application/csv",
    "text/plain",
];
