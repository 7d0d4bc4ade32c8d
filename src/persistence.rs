//! JSON snapshots of a finished load

use crate::island_cache::CachedIslandInfo;
use crate::pipeline::LoadOutcome;
use crate::report::LoadReport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::Io(err)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Serialization(err)
    }
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "IO error: {}", e),
            SnapshotError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Islands as staged, plus the diagnostics of the load that produced them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IslandSnapshot {
    /// Unix seconds
    pub timestamp: i64,
    pub islands: HashMap<Uuid, CachedIslandInfo>,
    pub rejection_count: usize,
    pub decode_failure_count: usize,
}

impl IslandSnapshot {
    pub fn new(islands: HashMap<Uuid, CachedIslandInfo>, report: &LoadReport) -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp(),
            islands,
            rejection_count: report.rejections.len(),
            decode_failure_count: report.decode_failures.len(),
        }
    }
}

/// Save a snapshot of `outcome` to a JSON file
pub fn save_snapshot(outcome: &LoadOutcome, file_path: &str) -> Result<(), SnapshotError> {
    let snapshot = IslandSnapshot::new(outcome.islands.clone(), &outcome.report);

    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(file_path, json)?;

    log::debug!("Saved {} islands to {}", snapshot.islands.len(), file_path);
    Ok(())
}

/// Load a snapshot written by `save_snapshot`
pub fn load_snapshot(file_path: &str) -> Result<Option<IslandSnapshot>, SnapshotError> {
    if !Path::new(file_path).exists() {
        log::info!("No existing snapshot file found: {}", file_path);
        return Ok(None);
    }

    let json = fs::read_to_string(file_path)?;
    let snapshot: IslandSnapshot = serde_json::from_str(&json)?;

    log::info!("Loaded {} islands from {}", snapshot.islands.len(), file_path);
    Ok(Some(snapshot))
}
