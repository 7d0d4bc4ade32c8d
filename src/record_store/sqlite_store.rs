//! SQLite-backed record store
//!
//! Each record kind is a table; every row of the table is one record. The
//! connection is opened read-only, the loader never writes to the store.

use super::row::RecordRow;
use super::sqlite_pragma::apply_read_pragmas;
use super::{RecordStore, StoreError};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub struct SqliteRecordStore {
    conn: Connection,
}

/// Table names are interpolated into SQL, so only plain identifiers pass
fn is_valid_kind(kind: &str) -> bool {
    !kind.is_empty()
        && kind
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl SqliteRecordStore {
    /// Open the island database at `db_path`
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// Wrap an existing connection, switching it to query-only mode
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        apply_read_pragmas(&conn)?;

        // Must come after the PRAGMAs above
        conn.execute_batch("PRAGMA query_only = ON")?;

        Ok(Self { conn })
    }

    fn table_exists(&self, kind: &str) -> Result<bool, StoreError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [kind],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl RecordStore for SqliteRecordStore {
    fn for_each_record(
        &self,
        kind: &str,
        handler: &mut dyn FnMut(&RecordRow),
    ) -> Result<(), StoreError> {
        if !is_valid_kind(kind) {
            return Err(StoreError::InvalidKind(kind.to_string()));
        }

        if !self.table_exists(kind)? {
            log::debug!("📭 Table {} not present, no records to load", kind);
            return Ok(());
        }

        let mut stmt = self.conn.prepare(&format!("SELECT * FROM \"{}\"", kind))?;
        let column_names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query([])?;
        let mut delivered = 0u64;

        while let Some(row) = rows.next()? {
            let mut record = RecordRow::new();
            for (idx, name) in column_names.iter().enumerate() {
                let value: Value = row.get(idx)?;
                record.set(name, value);
            }
            handler(&record);
            delivered += 1;
        }

        log::debug!("📥 Delivered {} records from {}", delivered, kind);
        Ok(())
    }
}
