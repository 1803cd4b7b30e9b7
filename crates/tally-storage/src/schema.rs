//! Store schema and connection pragmas.

use rusqlite::Connection;

use crate::errors::StoreResult;

/// Store schema SQL. Tables are deliberately not STRICT: a drifted store
/// may hold text in a numeric column or an integer in a boolean column,
/// and the row codec must still be able to read it.
pub const STORE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL COLLATE NOCASE,
    password_hash TEXT NOT NULL,
    salt TEXT NOT NULL,
    created_at TEXT NOT NULL,
    last_login_at TEXT,
    is_active TEXT NOT NULL DEFAULT 'true'
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users(username);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    owner_user_id INTEGER NOT NULL REFERENCES users(id),
    UNIQUE (owner_user_id, name)
);

CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    amount REAL NOT NULL DEFAULT 0,
    observations TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL,
    owner_user_id INTEGER NOT NULL REFERENCES users(id),
    category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_owner_date
    ON transactions(owner_user_id, date);
CREATE INDEX IF NOT EXISTS idx_transactions_category
    ON transactions(category_id);

-- Singleton row, id fixed at 1.
CREATE TABLE IF NOT EXISTS schema_fingerprint (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    fingerprint TEXT NOT NULL
);
"#;

/// Apply connection pragmas. Called on every open; idempotent.
pub fn apply_pragmas(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )?;
    Ok(())
}

/// Create the schema on a fresh store.
pub fn create_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(STORE_SCHEMA_SQL)?;
    Ok(())
}

/// Whether a table exists in the physical store.
pub fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
