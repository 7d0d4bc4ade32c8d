//! Record store boundary
//!
//! The loader only needs one capability from storage: deliver every record of
//! one kind, one at a time, to a handler. `SqliteRecordStore` reads the island
//! tables from a SQLite database; `MemoryRecordStore` keeps rows in memory.

pub mod memory_store;
pub mod row;
pub mod sqlite_pragma;
pub mod sqlite_store;

pub use memory_store::MemoryRecordStore;
pub use row::{FromColumn, RecordRow};
pub use sqlite_store::SqliteRecordStore;

#[derive(Debug)]
pub enum StoreError {
    Database(rusqlite::Error),
    InvalidKind(String),
    Task(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::InvalidKind(kind) => write!(f, "Invalid record kind: {}", kind),
            StoreError::Task(e) => write!(f, "Loader task failed: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            _ => None,
        }
    }
}

/// Source of stored records, grouped by kind (table name)
pub trait RecordStore {
    /// Deliver every record of `kind` to `handler`, sequentially
    ///
    /// A kind with no stored records yields zero calls. Errors are reserved for
    /// failures of the store itself.
    fn for_each_record(
        &self,
        kind: &str,
        handler: &mut dyn FnMut(&RecordRow),
    ) -> Result<(), StoreError>;
}
