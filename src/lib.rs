//! isleload - rebuilds in-memory island state from persisted island records
//!
//! ## Module Organization
//!
//! - `record_store` - record source boundary (SQLite, in-memory)
//! - `island_cache` - staging structures and the shared staging store
//! - `decoding` - block-count ledger, item and colour-code decoders
//! - `resolvers` - name → registered object lookups
//! - `pipeline` - per-kind validation and the loader drivers
//! - `report` - rejections and decode failures collected during a load
//! - `persistence` - JSON snapshots of a finished load
//! - `config` - environment-driven loader configuration

pub mod config;
pub mod decoding;
pub mod island_cache;
pub mod persistence;
pub mod pipeline;
pub mod record_store;
pub mod report;
pub mod resolvers;

pub use config::LoaderConfig;
pub use island_cache::{CachedIslandInfo, StagingStore};
pub use pipeline::{load_concurrently, IslandsLoader, LoadOutcome, LoadSummary, RecordKind};
pub use record_store::{MemoryRecordStore, RecordRow, RecordStore, SqliteRecordStore, StoreError};
pub use report::{LoadReport, Rejection};
pub use resolvers::{CatalogResolvers, Resolvers};
