//! # State Module
//!
//! Application state shared by the commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────────┐  ┌──────────────────┐      │
//! │  │   DbState    │  │    RecordingList     │  │    AppConfig     │      │
//! │  │              │  │                      │  │                  │      │
//! │  │  Database    │  │  RequestSequence     │  │  database_path   │      │
//! │  │  (SQLite     │  │  Mutex<              │  │  export_dir      │      │
//! │  │   pool)      │  │    RecordingView     │  │  page_size       │      │
//! │  │              │  │  >                   │  │  share_command   │      │
//! │  └──────────────┘  └──────────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has an internal pool (thread-safe)                │
//! │  • RecordingList: view behind a Mutex, never held across an await      │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod recording;

pub use config::{AppConfig, ConfigError};
pub use db::DbState;
pub use recording::{RecordingList, RecordingView};
