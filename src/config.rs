//! Loader configuration from environment variables

use std::env;

/// Slots per chest row
const SLOTS_PER_ROW: usize = 9;

/// Configuration for an island load
///
/// Loaded from environment variables with defaults matching a stock server.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Path to the SQLite database holding the island tables
    pub db_path: String,

    /// Rows of a freshly created island chest page
    pub chest_default_rows: usize,

    /// Chest rows with an index at or above this are rejected
    pub max_chest_pages: usize,

    /// Bank logging enabled
    pub bank_logs: bool,

    /// Keep every bank transaction in memory instead of loading on demand
    pub bank_cache_all_logs: bool,

    /// Warp names longer than this are truncated
    pub max_warp_name_length: usize,

    /// Registered mission names
    pub missions: Vec<String>,

    /// Where to write a JSON snapshot of the staged islands, if anywhere
    pub snapshot_path: Option<String>,

    /// Run record kinds concurrently on blocking tasks
    pub concurrent: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            db_path: "data/islands.db".to_string(),
            chest_default_rows: 3,
            max_chest_pages: 256,
            bank_logs: true,
            bank_cache_all_logs: false,
            max_warp_name_length: 255,
            missions: Vec::new(),
            snapshot_path: None,
            concurrent: false,
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

impl LoaderConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `ISLAND_DB_PATH` (default: data/islands.db)
    /// - `ISLAND_CHEST_DEFAULT_ROWS` (default: 3)
    /// - `ISLAND_MAX_CHEST_PAGES` (default: 256)
    /// - `ISLAND_BANK_LOGS` (default: true)
    /// - `ISLAND_BANK_CACHE_ALL_LOGS` (default: false)
    /// - `ISLAND_MAX_WARP_NAME_LENGTH` (default: 255)
    /// - `ISLAND_MISSIONS` (comma-separated, default: none)
    /// - `ISLAND_SNAPSHOT_PATH` (default: unset)
    /// - `ISLAND_LOAD_CONCURRENT` (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            db_path: env::var("ISLAND_DB_PATH").unwrap_or(defaults.db_path),

            chest_default_rows: parsed_var("ISLAND_CHEST_DEFAULT_ROWS")
                .unwrap_or(defaults.chest_default_rows),

            max_chest_pages: parsed_var("ISLAND_MAX_CHEST_PAGES")
                .unwrap_or(defaults.max_chest_pages),

            bank_logs: parsed_var("ISLAND_BANK_LOGS").unwrap_or(defaults.bank_logs),

            bank_cache_all_logs: parsed_var("ISLAND_BANK_CACHE_ALL_LOGS")
                .unwrap_or(defaults.bank_cache_all_logs),

            max_warp_name_length: parsed_var("ISLAND_MAX_WARP_NAME_LENGTH")
                .unwrap_or(defaults.max_warp_name_length),

            missions: env::var("ISLAND_MISSIONS")
                .map(|s| {
                    s.split(',')
                        .map(|name| name.trim().to_string())
                        .filter(|name| !name.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            snapshot_path: env::var("ISLAND_SNAPSHOT_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty()),

            concurrent: parsed_var("ISLAND_LOAD_CONCURRENT").unwrap_or(defaults.concurrent),
        }
    }

    /// Slot count of an empty chest page
    pub fn default_chest_slot_count(&self) -> usize {
        self.chest_default_rows * SLOTS_PER_ROW
    }

    /// Bank transactions are staged only when every log is cached up front
    pub fn is_transaction_caching_enabled(&self) -> bool {
        self.bank_logs && self.bank_cache_all_logs
    }
}
