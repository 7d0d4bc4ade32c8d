//! Island Loader Binary - rebuilds staged islands from the island database
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin island_loader
//! cargo run --release --bin island_loader -- --concurrent
//! ```
//!
//! ## Environment Variables
//!
//! - ISLAND_DB_PATH - SQLite database path (default: data/islands.db)
//! - ISLAND_CHEST_DEFAULT_ROWS - Rows of a padded chest page (default: 3)
//! - ISLAND_BANK_LOGS / ISLAND_BANK_CACHE_ALL_LOGS - Stage bank transactions when both are true
//! - ISLAND_MAX_WARP_NAME_LENGTH - Warp name truncation length (default: 255)
//! - ISLAND_MISSIONS - Comma-separated registered mission names
//! - ISLAND_SNAPSHOT_PATH - Write a JSON snapshot of the staged islands here (optional)
//! - ISLAND_LOAD_CONCURRENT - Load record kinds concurrently (default: false)
//! - RUST_LOG - Logging level (optional, default: info)

use isleload::persistence::save_snapshot;
use isleload::pipeline::{load_concurrently, IslandsLoader};
use isleload::{CatalogResolvers, LoaderConfig, SqliteRecordStore};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let mut config = LoaderConfig::from_env();
    if env::args().any(|arg| arg == "--concurrent") {
        config.concurrent = true;
    }

    log::info!("🚀 Starting Island Loader");
    log::info!("   Database: {}", config.db_path);
    log::info!("   Concurrent: {}", config.concurrent);
    log::info!(
        "   Bank transactions: {}",
        if config.is_transaction_caching_enabled() {
            "cached"
        } else {
            "on demand"
        }
    );
    log::info!("   Registered missions: {}", config.missions.len());

    let resolvers = Arc::new(CatalogResolvers::with_missions(&config.missions));
    let db_path = config.db_path.clone();
    let concurrent = config.concurrent;
    let snapshot_path = config.snapshot_path.clone();

    let loader = Arc::new(IslandsLoader::new(config, resolvers));

    let summary = if concurrent {
        load_concurrently(Arc::clone(&loader), move || SqliteRecordStore::open(&db_path)).await?
    } else {
        let store = SqliteRecordStore::open(&db_path)?;
        loader.load_all(&store)?
    };

    let outcome = match Arc::try_unwrap(loader) {
        Ok(loader) => loader.finish(),
        Err(shared) => shared.outcome(),
    };

    log::info!("✅ Load complete");
    log::info!("   Islands staged: {}", summary.islands);
    log::info!("   Records accepted: {}", summary.total_accepted());
    log::info!("   Records rejected: {}", summary.total_rejected());
    log::info!("   Decode failures: {}", outcome.report.decode_failures.len());

    for stats in summary.drivers.iter().filter(|s| s.rejected > 0) {
        log::warn!(
            "⚠️  {}: {} records skipped",
            stats.kind.describe(),
            stats.rejected
        );
    }

    if let Some(path) = snapshot_path {
        save_snapshot(&outcome, &path)?;
        log::info!("💾 Snapshot written to {}", path);
    }

    Ok(())
}
