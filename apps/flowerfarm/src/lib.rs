//! # Flower Farm Application Library
//!
//! Configuration, state and commands of the Flower Farm harvest tracker,
//! plus the command line front end that drives them.
//!
//! ## Module Organization
//! ```text
//! flowerfarm_app/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap front end, JSON output
//! ├── platform.rs     ◄─── Document picker / share sheet stand-ins
//! ├── state/
//! │   ├── config.rs   ◄─── AppConfig (defaults → TOML → env)
//! │   ├── db.rs       ◄─── DbState (Database handle)
//! │   └── recording.rs◄─── RecordingList (paged, sequenced)
//! ├── commands/
//! │   ├── crop.rs     ◄─── Crop CRUD
//! │   ├── variety.rs  ◄─── Variety CRUD
//! │   ├── harvest.rs  ◄─── Tally save, record corrections
//! │   ├── recording.rs◄─── Recording list, recent strip
//! │   ├── report.rs   ◄─── Totals, summaries, day breakdown
//! │   ├── import.rs   ◄─── Crop/variety CSV import
//! │   └── export.rs   ◄─── Harvest CSV export
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr            │
//! │     • Default: info,flowerfarm=debug,sqlx=warn; override with RUST_LOG │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults → config.toml → FLOWERFARM_* env → --db flag            │
//! │                                                                         │
//! │  3. Open Database ────────────────────────────────────────────────────► │
//! │     • One shared connection, foreign keys on                           │
//! │     • Schema applied with CREATE ... IF NOT EXISTS                     │
//! │                                                                         │
//! │  4. Run Command ──────────────────────────────────────────────────────► │
//! │     • JSON result on stdout, ApiError JSON on stderr                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod platform;
pub mod state;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{AppContext, Cli};
use error::ApiResult;
use flowerfarm_db::{Database, DbConfig};
use state::{AppConfig, DbState};

/// Parses the command line, runs one command and prints its result.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();

    match run_cli(cli).await {
        Ok(output) => {
            println!("{}", render(&output));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(code = ?e.code, "{}", e.message);
            eprintln!("{}", render(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run_cli(cli: Cli) -> ApiResult<serde_json::Value> {
    let mut config = AppConfig::load(cli.config.clone())?;
    if let Some(path) = cli.db {
        config.database_path = Some(path);
    }

    let db = open_database(&config).await?;
    let ctx = AppContext::new(config, DbState::new(db));

    let output = cli::execute(cli.command, &ctx).await;
    ctx.db.inner().close().await;
    output
}

/// Opens the configured database, creating it and its schema if needed.
pub async fn open_database(config: &AppConfig) -> ApiResult<Database> {
    let db_path = config.resolved_database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and schema applied");
    Ok(db)
}

fn render<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| e.to_string())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=flowerfarm_db=trace` - Show trace for the database layer only
/// - Default: `info,flowerfarm=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flowerfarm=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
