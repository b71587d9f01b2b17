//! # Seed Data Generator
//!
//! Populates a database with crops, varieties and a few weeks of harvests
//! for development.
//!
//! ## Usage
//! ```bash
//! # Seed 21 days of harvests (default)
//! cargo run -p flowerfarm-db --bin seed
//!
//! # Custom number of days
//! cargo run -p flowerfarm-db --bin seed -- --days 60
//!
//! # Specify database path
//! cargo run -p flowerfarm-db --bin seed -- --db ./data/flowerfarm.db
//! ```
//!
//! ## Generated Data
//! - One crop per entry of [`CROPS`], with its varieties
//! - For each day, every third crop (rotating) gets a harvest: one record per
//!   variety plus an occasional mixed record
//! - The crops harvested on the last day are marked as recently used

use std::path::PathBuf;

use chrono::{Duration, Utc};
use clap::Parser;
use flowerfarm_core::NewHarvestItem;
use flowerfarm_db::{Database, DbConfig};

/// Crops with their price per stem and varieties.
const CROPS: &[(&str, f64, &[&str])] = &[
    ("Zinnia", 0.75, &["Queen Red Lime", "Benary's Giant Wine", "Oklahoma Salmon"]),
    ("Dahlia", 2.50, &["Cafe au Lait", "Wizard of Oz", "Karma Choc"]),
    ("Cosmos", 0.60, &["Double Click Cranberries", "Purity", "Apricot Lemonade"]),
    ("Snapdragon", 1.00, &["Chantilly Bronze", "Potomac Appleblossom"]),
    ("Sunflower", 1.50, &["ProCut Gold", "Procut Plum", "Teddy Bear"]),
    ("Ranunculus", 2.00, &["Amandine Salmon", "Elegance White"]),
    ("Lisianthus", 2.25, &["Rosanne Brown", "Voyage Champagne"]),
    ("Celosia", 0.90, &["Sylphid", "Pampas Plume"]),
    ("Amaranth", 0.80, &[]),
    ("Statice", 0.50, &["Qis Apricot", "Seeker Mix"]),
    ("Strawflower", 0.70, &["Apricot Mix", "Silvery Rose"]),
    ("Scabiosa", 1.10, &["Black Knight", "Fata Morgana"]),
];

/// Fills a development database with sample crops and harvests.
#[derive(Parser, Debug)]
#[command(name = "seed", about = "Flower Farm seed data generator")]
struct SeedArgs {
    /// Days of harvest history, ending today
    #[arg(short = 'n', long, default_value_t = 21)]
    days: i64,

    /// Database file path
    #[arg(short, long, default_value = "./flowerfarm_dev.db")]
    db: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let SeedArgs { days, db: db_path } = SeedArgs::parse();

    println!("🌱 Flower Farm seed data");
    println!("Database: {}", db_path.display());
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Database open, schema applied");

    let existing = db.crops().count().await?;
    if existing > 0 {
        println!("⚠ {} crops already present, nothing seeded", existing);
        println!("  Remove {} to start over.", db_path.display());
        return Ok(());
    }

    println!();
    println!("Creating crops...");

    let mut catalog: Vec<(i64, Vec<i64>)> = Vec::with_capacity(CROPS.len());
    for (name, price, varieties) in CROPS {
        let crop_id = db.crops().add(name, *price).await?;
        let mut variety_ids = Vec::with_capacity(varieties.len());
        for variety in varieties.iter() {
            variety_ids.push(db.varieties().add(crop_id, variety, None).await?);
        }
        catalog.push((crop_id, variety_ids));
    }
    println!("  {} crops", catalog.len());

    println!();
    println!("Generating harvests...");

    let started = std::time::Instant::now();
    let today = Utc::now().date_naive();
    let mut records = 0usize;

    for offset in (0..days).rev() {
        let date = today - Duration::days(offset);
        let mut batch = Vec::new();

        for (idx, (crop_id, variety_ids)) in catalog.iter().enumerate() {
            if (idx as i64 + offset) % 3 != 0 {
                continue;
            }

            let seed = idx as i64 * 31 + offset * 7;
            for (v, variety_id) in variety_ids.iter().enumerate() {
                batch.push(NewHarvestItem {
                    crop_id: *crop_id,
                    variety_id: Some(*variety_id),
                    stems_cut: 5 + (seed + v as i64 * 13) % 40,
                    stems_wasted: (seed + v as i64) % 4,
                });
            }
            if variety_ids.is_empty() || seed % 5 == 0 {
                batch.push(NewHarvestItem::cut(*crop_id, None, 10 + seed % 25));
            }

            if offset == 0 {
                db.recent().mark_used(*crop_id).await?;
            }
        }

        records += db.harvests().add_batch(&batch, date).await?.len();
    }

    println!();
    println!("✓ {} harvest records in {:?}", records, started.elapsed());

    println!();
    println!("Verifying aggregates...");
    println!("  Today: {} stems", db.reports().daily_total(today).await?);
    println!("  Days with harvests: {}", db.reports().daily_summaries().await?.len());
    println!("  Recent crops: {}", db.recent().list_recent(None, 10).await?.len());

    println!();
    println!("✓ Done");

    Ok(())
}
