//! # flowerfarm-db: Database Layer for Flower Farm
//!
//! This crate provides database access for Flower Farm.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Flower Farm Data Flow                             │
//! │                                                                         │
//! │  Command (record_harvest, list_recording_crops, export_harvest ...)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   flowerfarm-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │    Schema    │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ CropRepo       │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ VarietyRepo    │    │ 4 tables     │  │   │
//! │  │   │ (1 connection)│    │ HarvestRepo    │    │ 4 indexes    │  │   │
//! │  │   │               │    │ RecentCropRepo │    │ IF NOT EXISTS│  │   │
//! │  │   │               │    │ ReportRepo     │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/flowerfarm.db                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Shared handle creation and configuration
//! - [`schema`] - Embedded DDL, applied idempotently
//! - [`error`] - Database error types
//! - [`repository`] - Query Layer (crops, varieties, harvests, recency, reports)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flowerfarm_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/flowerfarm.db")).await?;
//!
//! let crop_id = db.crops().add("Zinnia", 0.75).await?;
//! db.recent().mark_used(crop_id).await?;
//! let page = db.recent().list_for_recording(None, 30, 0).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::crop::CropRepository;
pub use repository::harvest::HarvestRepository;
pub use repository::recent::RecentCropRepository;
pub use repository::report::ReportRepository;
pub use repository::variety::VarietyRepository;
