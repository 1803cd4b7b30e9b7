//! Fingerprint record store.
//! Reads and writes the singleton row holding the last-seen schema
//! fingerprint.

use rusqlite::Connection;

use tally_core::entities::SchemaFingerprint;

use crate::codec;
use crate::errors::StoreResult;
use crate::schema;

const TABLE: &str = "schema_fingerprint";

/// Read the singleton record. Returns `None` when it was never written, or
/// when the table itself is absent (a store adopted from elsewhere). The
/// read goes through the tolerant codec: the record must stay readable
/// even when the record table's own shape has drifted.
pub fn read_fingerprint(conn: &Connection) -> StoreResult<Option<SchemaFingerprint>> {
    if !schema::table_exists(conn, TABLE)? {
        return Ok(None);
    }

    let mut stmt = conn.prepare(&format!("SELECT * FROM {TABLE}"))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let record = codec::decode_fingerprint(&codec::raw_row_from_sql_row(&columns, row)?);
        if record.id == SchemaFingerprint::SINGLETON_ID {
            return Ok(Some(record));
        }
    }
    Ok(None)
}

/// Upsert the singleton record (id fixed at 1). Commits immediately rather
/// than joining any caller transaction: the record must survive even if
/// the caller aborts later steps.
pub fn write_fingerprint(conn: &Connection, fingerprint: &str) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO schema_fingerprint (id, fingerprint) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET fingerprint = excluded.fingerprint",
        rusqlite::params![SchemaFingerprint::SINGLETON_ID, fingerprint],
    )?;
    Ok(())
}
