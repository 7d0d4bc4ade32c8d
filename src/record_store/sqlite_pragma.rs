//! Connection PRAGMAs for bulk reads of the island tables

use rusqlite::Connection;

/// Apply read-side PRAGMAs (WAL-friendly, large cache, mmap, busy timeout)
pub fn apply_read_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    conn.pragma_update(None, "cache_size", -64_000)?;
    conn.pragma_update(None, "mmap_size", 268_435_456i64)?;
    Ok(())
}
