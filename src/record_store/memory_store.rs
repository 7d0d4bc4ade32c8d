//! In-memory record store, used when records come from somewhere other than
//! SQLite and throughout the tests

use super::row::RecordRow;
use super::{RecordStore, StoreError};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    tables: HashMap<String, Vec<RecordRow>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: &str, row: RecordRow) {
        self.tables.entry(kind.to_string()).or_default().push(row);
    }

    /// Builder-style `insert`
    pub fn with(mut self, kind: &str, row: RecordRow) -> Self {
        self.insert(kind, row);
        self
    }

    pub fn record_count(&self, kind: &str) -> usize {
        self.tables.get(kind).map_or(0, Vec::len)
    }
}

impl RecordStore for MemoryRecordStore {
    fn for_each_record(
        &self,
        kind: &str,
        handler: &mut dyn FnMut(&RecordRow),
    ) -> Result<(), StoreError> {
        if let Some(rows) = self.tables.get(kind) {
            rows.iter().for_each(|row| handler(row));
        }
        Ok(())
    }
}
