//! # Command Line Front End
//!
//! Drives the commands from a terminal. Every subcommand prints its result
//! as JSON on stdout; logs go to stderr.
//!
//! ## Examples
//! ```bash
//! flowerfarm crop add Zinnia --price 0.75
//! flowerfarm variety add 1 "Queen Red Lime"
//! flowerfarm record 1 --variety 1=12 --mixed 3 --date 2026-06-01
//! flowerfarm pick --search zin --pages 2
//! flowerfarm day 2026-06-01
//! flowerfarm import --file crops.csv
//! flowerfarm export
//! ```

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

use crate::commands::{crop, export, harvest, import, recording, report, variety};
use crate::error::{ApiError, ApiResult};
use crate::platform::{CommandShareSheet, PathPicker};
use crate::state::{AppConfig, DbState, RecordingList};
use flowerfarm_core::validation::parse_harvest_date;
use flowerfarm_core::{CropUpdate, HarvestFilter, HarvestUpdate, TallyTarget, VarietyUpdate};
use flowerfarm_db::schema::schema_version;

#[derive(Parser, Debug)]
#[command(name = "flowerfarm", author, version, about = "Flower farm harvest tracker", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path, by default the platform config directory is used
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the configuration
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage crops
    #[command(subcommand)]
    Crop(CropCommand),

    /// Manage the varieties of a crop
    #[command(subcommand)]
    Variety(VarietyCommand),

    /// Record stems cut for one crop
    Record(RecordArgs),

    /// List or correct harvest records
    #[command(subcommand)]
    Harvest(HarvestCommand),

    /// Show the recording list: recently used crops first
    Pick {
        /// Filter by name
        #[arg(short, long)]
        search: Option<String>,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Show recently used crops
    Recent {
        /// Filter by name
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum crops shown, by default the configured recent limit
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Total stems cut on a date (default: today)
    Total {
        /// Date as YYYY-MM-DD
        date: Option<String>,
    },

    /// Stems cut per date, newest first
    Summary,

    /// Per crop and variety breakdown of a date
    Day {
        /// Date as YYYY-MM-DD
        date: String,
    },

    /// Import crops and varieties from a CSV with Species and Variety columns
    Import {
        /// File to import; omitting it cancels the import
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Export all harvest records to CSV and share the file
    Export,

    /// Print the effective configuration
    Config,

    /// Database health and counts
    Status,
}

#[derive(Subcommand, Debug)]
pub enum CropCommand {
    /// List crops by name
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a crop
    Add {
        name: String,
        #[arg(short, long)]
        price: Option<f64>,
    },
    /// Rename a crop or change its price
    Update {
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        price: Option<f64>,
    },
    /// Delete a crop with its varieties
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum VarietyCommand {
    /// List the varieties of a crop
    List { crop_id: i64 },
    /// Add a variety to a crop
    Add {
        crop_id: i64,
        name: String,
        #[arg(short, long)]
        price: Option<f64>,
    },
    /// Rename a variety, or set or clear its price
    Update {
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, conflicts_with = "clear_price")]
        price: Option<f64>,
        /// Fall back to the crop price
        #[arg(long)]
        clear_price: bool,
    },
    /// Delete a variety; its records become mixed
    Delete { id: i64 },
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Crop the stems were cut from
    pub crop_id: i64,

    /// Stems per variety as VARIETY_ID=COUNT, repeatable
    #[arg(short, long = "variety", value_parser = parse_variety_count)]
    pub varieties: Vec<(i64, i64)>,

    /// Stems not split by variety
    #[arg(short, long, default_value_t = 0)]
    pub mixed: i64,

    /// Harvest date as YYYY-MM-DD (default: today)
    #[arg(short, long)]
    pub date: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum HarvestCommand {
    /// List records, newest first
    List {
        #[arg(long)]
        crop: Option<i64>,
        #[arg(long)]
        variety: Option<i64>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// Correct the counts of a record
    Update {
        id: i64,
        #[arg(long)]
        cut: Option<i64>,
        #[arg(long)]
        wasted: Option<i64>,
    },
    /// Delete a record
    Delete { id: i64 },
}

fn parse_variety_count(s: &str) -> Result<(i64, i64), String> {
    let (id, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected VARIETY_ID=COUNT, got '{}'", s))?;
    let id = id.trim().parse().map_err(|_| format!("invalid variety id '{}'", id))?;
    let count = count.trim().parse().map_err(|_| format!("invalid count '{}'", count))?;
    Ok((id, count))
}

// =============================================================================
// Execution
// =============================================================================

/// Everything a command may need.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub db: DbState,
    pub recording: RecordingList,
}

impl AppContext {
    pub fn new(config: AppConfig, db: DbState) -> Self {
        let recording = RecordingList::new(config.page_size);
        AppContext {
            config,
            db,
            recording,
        }
    }
}

fn to_json<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

fn date_or_today(date: Option<&str>) -> ApiResult<NaiveDate> {
    match date {
        Some(d) => Ok(parse_harvest_date(d)?),
        None => Ok(Utc::now().date_naive()),
    }
}

fn optional_date(date: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    Ok(date.map(parse_harvest_date).transpose()?)
}

/// Runs one command and returns its JSON output.
pub async fn execute(command: Command, ctx: &AppContext) -> ApiResult<Value> {
    let db = &ctx.db;

    match command {
        Command::Crop(cmd) => match cmd {
            CropCommand::List { search } => to_json(crop::list_crops(db, search.as_deref()).await),
            CropCommand::Add { name, price } => to_json(crop::add_crop(db, &name, price).await?),
            CropCommand::Update { id, name, price } => {
                let update = CropUpdate {
                    name,
                    price_per_stem: price,
                };
                to_json(crop::update_crop(db, id, update).await?)
            }
            CropCommand::Delete { id } => {
                crop::delete_crop(db, id).await?;
                Ok(json!({ "deleted": id }))
            }
        },

        Command::Variety(cmd) => match cmd {
            VarietyCommand::List { crop_id } => {
                to_json(variety::list_varieties(db, Some(crop_id)).await)
            }
            VarietyCommand::Add {
                crop_id,
                name,
                price,
            } => to_json(variety::add_variety(db, crop_id, &name, price).await?),
            VarietyCommand::Update {
                id,
                name,
                price,
                clear_price,
            } => {
                let price_per_stem = if clear_price { Some(None) } else { price.map(Some) };
                let update = VarietyUpdate {
                    name,
                    price_per_stem,
                };
                to_json(variety::update_variety(db, id, update).await?)
            }
            VarietyCommand::Delete { id } => {
                variety::delete_variety(db, id).await?;
                Ok(json!({ "deleted": id }))
            }
        },

        Command::Record(args) => {
            let date = date_or_today(args.date.as_deref())?;
            let mut tally = harvest::start_tally(db, args.crop_id).await?;
            for (variety_id, count) in args.varieties {
                tally.set(TallyTarget::Variety(variety_id), count)?;
            }
            tally.set(TallyTarget::Mixed, args.mixed)?;

            let ids = harvest::record_harvest(db, &tally, date).await?;
            Ok(json!({
                "cropId": tally.crop_id(),
                "date": date,
                "stems": tally.total(),
                "recordIds": ids,
            }))
        }

        Command::Harvest(cmd) => match cmd {
            HarvestCommand::List {
                crop,
                variety,
                date,
                from,
                to,
            } => {
                let filter = HarvestFilter {
                    crop_id: crop,
                    variety_id: variety,
                    date: optional_date(date.as_deref())?,
                    date_from: optional_date(from.as_deref())?,
                    date_to: optional_date(to.as_deref())?,
                };
                to_json(harvest::list_harvests(db, &filter).await)
            }
            HarvestCommand::Update { id, cut, wasted } => {
                let update = HarvestUpdate {
                    stems_cut: cut,
                    stems_wasted: wasted,
                };
                to_json(harvest::update_harvest(db, id, update).await?)
            }
            HarvestCommand::Delete { id } => {
                harvest::delete_harvest(db, id).await?;
                Ok(json!({ "deleted": id }))
            }
        },

        Command::Pick { search, pages } => {
            let mut view =
                recording::list_recording_crops(&ctx.recording, db, search.as_deref()).await;
            for _ in 1..pages {
                if !view.has_more {
                    break;
                }
                view = recording::load_more_recording_crops(&ctx.recording, db).await;
            }
            to_json(view)
        }

        Command::Recent { search, limit } => {
            let limit = limit.unwrap_or(ctx.config.recent_limit);
            to_json(recording::recent_crops(db, search.as_deref(), limit).await)
        }

        Command::Total { date } => {
            let date = date_or_today(date.as_deref())?;
            let stems = report::daily_total(db, date).await;
            Ok(json!({ "date": date, "stemsCut": stems }))
        }

        Command::Summary => to_json(report::daily_summaries(db).await),

        Command::Day { date } => {
            let date = parse_harvest_date(&date)?;
            to_json(report::day_breakdown(db, date).await)
        }

        Command::Import { file } => to_json(import::import_crops(db, &PathPicker::new(file)).await),

        Command::Export => {
            let share = CommandShareSheet::new(ctx.config.share_command.clone());
            let dir = ctx.config.resolved_export_dir();
            to_json(export::export_harvest(db, dir.as_deref(), &share, Utc::now().date_naive()).await)
        }

        Command::Config => to_json(&ctx.config),

        Command::Status => {
            let healthy = db.inner().health_check().await;
            let version = schema_version(db.inner().pool()).await?;
            let crops = db.inner().crops().count().await?;
            Ok(json!({
                "healthy": healthy,
                "schemaVersion": version,
                "crops": crops,
            }))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use flowerfarm_db::{Database, DbConfig};

    use super::*;
    use crate::error::ErrorCode;

    async fn ctx() -> AppContext {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppContext::new(AppConfig::default(), DbState::new(db))
    }

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("flowerfarm").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_parse_variety_count() {
        assert_eq!(parse_variety_count("3=12"), Ok((3, 12)));
        assert!(parse_variety_count("3").is_err());
        assert!(parse_variety_count("x=1").is_err());
    }

    #[test]
    fn test_clear_price_conflicts_with_price() {
        let result = Cli::try_parse_from([
            "flowerfarm", "variety", "update", "1", "--price", "1.0", "--clear-price",
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_record_then_report() {
        let ctx = ctx().await;

        execute(parse(&["crop", "add", "Zinnia", "--price", "0.75"]), &ctx)
            .await
            .unwrap();
        execute(parse(&["variety", "add", "1", "Queen Red Lime"]), &ctx)
            .await
            .unwrap();

        let recorded = execute(
            parse(&["record", "1", "--variety", "1=12", "--mixed", "3", "--date", "2026-06-01"]),
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(recorded["stems"], 15);
        assert_eq!(recorded["recordIds"].as_array().unwrap().len(), 2);

        let total = execute(parse(&["total", "2026-06-01"]), &ctx).await.unwrap();
        assert_eq!(total["stemsCut"], 15);

        let day = execute(parse(&["day", "2026-06-01"]), &ctx).await.unwrap();
        assert_eq!(day[0]["cropName"], "Zinnia");
        assert_eq!(day[0]["cropTotal"], 15);

        let recent = execute(parse(&["recent"]), &ctx).await.unwrap();
        assert_eq!(recent[0]["name"], "Zinnia");
    }

    #[tokio::test]
    async fn test_record_unknown_variety() {
        let ctx = ctx().await;
        execute(parse(&["crop", "add", "Zinnia"]), &ctx).await.unwrap();

        let err = execute(parse(&["record", "1", "--variety", "9=2"]), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_bad_date_is_validation_error() {
        let ctx = ctx().await;
        let err = execute(parse(&["day", "2026-6-1"]), &ctx).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_pick_loads_pages() {
        let mut ctx = ctx().await;
        ctx.recording = RecordingList::new(1);
        for name in ["A", "B", "C"] {
            execute(parse(&["crop", "add", name]), &ctx).await.unwrap();
        }

        let view = execute(parse(&["pick", "--pages", "2"]), &ctx).await.unwrap();
        assert_eq!(view["crops"].as_array().unwrap().len(), 2);
        assert_eq!(view["hasMore"], true);
    }

    #[tokio::test]
    async fn test_import_without_file_is_cancelled() {
        let ctx = ctx().await;
        let result = execute(parse(&["import"]), &ctx).await.unwrap();
        assert_eq!(result["cropsAdded"], 0);
        assert!(result.get("error").is_none());
    }

    #[tokio::test]
    async fn test_status() {
        let ctx = ctx().await;
        let status = execute(parse(&["status"]), &ctx).await.unwrap();
        assert_eq!(status["healthy"], true);
        assert_eq!(status["schemaVersion"], 1);
        assert_eq!(status["crops"], 0);
    }
}
