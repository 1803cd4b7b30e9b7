//! `StoreGateway` — sole owner of the physical store file.
//! All access to persisted bytes goes through it: raw scans, the
//! wipe-and-recreate reset, and the checkpoint/copy primitives the
//! migration engine builds its backup and rollback on.

use std::fs;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use tracing::{debug, info};

use tally_core::entities::ImportBundle;

use crate::codec::{self, RawRow, Scalar};
use crate::errors::{StoreError, StoreResult};
use crate::paths::StorePaths;
use crate::schema;

/// Result of `PRAGMA integrity_check` on the store file.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub ok: bool,
    pub issues: Vec<String>,
}

/// Gateway to the single physical store file.
///
/// Connections are opened per operation and dropped when done: store
/// operations are infrequent and single-user, and a dropped connection is
/// the closed-before-delete precondition the destructive operations need
/// on platforms that forbid deleting an open file.
pub struct StoreGateway {
    paths: StorePaths,
}

impl StoreGateway {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Open a connection to the store with pragmas applied.
    pub fn open(&self) -> StoreResult<Connection> {
        let conn = Connection::open(self.paths.db_path())?;
        schema::apply_pragmas(&conn)?;
        Ok(conn)
    }

    /// Create the store file and its schema if absent. Idempotent. The
    /// schema is only created when the store holds no tables at all; a
    /// populated store whose tables predate the current schema is left
    /// untouched (that is the migration engine's concern).
    pub fn ensure_store_exists(&self) -> StoreResult<()> {
        fs::create_dir_all(self.paths.data_dir()).map_err(|e| {
            StoreError::StorageUnavailable {
                path: self.paths.data_dir().display().to_string(),
                message: e.to_string(),
            }
        })?;

        let unavailable = |e: StoreError| StoreError::StorageUnavailable {
            path: self.paths.db_path().display().to_string(),
            message: e.to_string(),
        };

        let conn = self.open().map_err(unavailable)?;
        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .map_err(|e| unavailable(e.into()))?;
        if table_count == 0 {
            schema::create_schema(&conn).map_err(unavailable)?;
            info!(path = %self.paths.db_path().display(), "created store");
        }
        Ok(())
    }

    /// Full scan of one table, every cell read as a loose scalar, in
    /// physical storage order. Does not require the typed model to match
    /// the physical schema.
    pub fn scan_raw_rows(&self, table: &str) -> StoreResult<Vec<RawRow>> {
        let conn = self.open()?;
        if !schema::table_exists(&conn, table)? {
            return Err(StoreError::UnknownEntityKind(table.to_string()));
        }

        let mut stmt = conn.prepare(&format!("SELECT * FROM {table}"))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(codec::raw_row_from_sql_row(&columns, row)?);
        }
        debug!(table, rows = out.len(), "raw scan");
        Ok(out)
    }

    /// Destructive: delete the store, recreate the current schema, and
    /// write the bundle back, parents before children so foreign keys hold.
    /// Not atomic across the delete boundary; callers take a backup first.
    pub fn reset_and_repopulate(&self, bundle: &ImportBundle) -> StoreResult<()> {
        self.delete_store_files()?;

        let mut conn = self.open()?;
        schema::create_schema(&conn)?;

        let tx = conn.transaction()?;
        for user in &bundle.users {
            insert_encoded(&tx, "users", &codec::encode_user(user))?;
        }
        for category in &bundle.categories {
            insert_encoded(&tx, "categories", &codec::encode_category(category))?;
        }
        for transaction in &bundle.transactions {
            insert_encoded(&tx, "transactions", &codec::encode_transaction(transaction))?;
        }
        tx.commit()?;

        info!(
            users = bundle.users.len(),
            categories = bundle.categories.len(),
            transactions = bundle.transactions.len(),
            "store reset and repopulated"
        );
        Ok(())
    }

    /// Flush the write-ahead log into the main file, drop the connection,
    /// then byte-copy the store to `destination`, overwriting any file there.
    pub fn checkpoint_and_copy_to(&self, destination: &Path) -> StoreResult<()> {
        {
            let conn = self.open()?;
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::BackupFailed {
                message: format!("cannot create {}: {e}", parent.display()),
            })?;
        }
        fs::copy(self.paths.db_path(), destination).map_err(|e| StoreError::BackupFailed {
            message: format!("copy to {} failed: {e}", destination.display()),
        })?;

        info!(destination = %destination.display(), "store copied");
        Ok(())
    }

    /// Delete the current store and adopt `source` as the store file.
    /// Used by migration rollback and by user-initiated restore.
    pub fn close_and_replace_from(&self, source: &Path) -> StoreResult<()> {
        self.delete_store_files()?;
        fs::copy(source, self.paths.db_path())?;
        info!(source = %source.display(), "store replaced");
        Ok(())
    }

    /// Adopt an externally supplied store file after verifying it. Callers
    /// run the migration check afterwards to bring the adopted store up to
    /// the current schema.
    pub fn import_from(&self, source: &Path) -> StoreResult<()> {
        let source_conn = Connection::open_with_flags(source, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let result: String = source_conn
            .pragma_query_value(None, "integrity_check", |row| row.get(0))
            .unwrap_or_else(|_| "error".to_string());
        if result != "ok" {
            return Err(StoreError::InvalidInput(format!(
                "import file failed integrity check: {result}"
            )));
        }
        drop(source_conn);

        self.close_and_replace_from(source)
    }

    /// `PRAGMA integrity_check` on the store file.
    pub fn integrity_check(&self) -> StoreResult<IntegrityReport> {
        if !self.paths.db_path().exists() {
            return Ok(IntegrityReport {
                ok: false,
                issues: vec!["store file does not exist".to_string()],
            });
        }

        let conn = self.open()?;
        let result: String = conn
            .pragma_query_value(None, "integrity_check", |row| row.get(0))
            .unwrap_or_else(|_| "error".to_string());
        if result == "ok" {
            Ok(IntegrityReport { ok: true, issues: vec![] })
        } else {
            Ok(IntegrityReport { ok: false, issues: vec![result] })
        }
    }

    /// Remove the store file and its WAL siblings.
    fn delete_store_files(&self) -> StoreResult<()> {
        let db = self.paths.db_path();
        if db.exists() {
            fs::remove_file(&db)?;
        }
        let _ = fs::remove_file(db.with_extension("db-wal"));
        let _ = fs::remove_file(db.with_extension("db-shm"));
        Ok(())
    }
}

fn insert_encoded(
    tx: &rusqlite::Transaction<'_>,
    table: &str,
    row: &[(&'static str, Scalar)],
) -> StoreResult<()> {
    let columns: Vec<&str> = row.iter().map(|(c, _)| *c).collect();
    let placeholders: Vec<String> = (1..=row.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    tx.execute(&sql, rusqlite::params_from_iter(row.iter().map(|(_, s)| s)))?;
    Ok(())
}
