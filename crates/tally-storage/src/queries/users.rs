//! User row queries.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

use tally_core::entities::User;

use crate::codec;
use crate::errors::StoreResult;

/// Insert a new user and return it with the assigned id.
pub fn insert(
    conn: &Connection,
    username: &str,
    password_hash: &str,
    salt: &str,
    created_at: DateTime<Utc>,
) -> StoreResult<User> {
    conn.execute(
        "INSERT INTO users (username, password_hash, salt, created_at, last_login_at, is_active)
         VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
        rusqlite::params![
            username,
            password_hash,
            salt,
            codec::fmt_utc(created_at),
            codec::fmt_bool(true),
        ],
    )?;
    Ok(User {
        id: conn.last_insert_rowid(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        salt: salt.to_string(),
        created_at,
        last_login_at: None,
        is_active: true,
    })
}

/// Username comparison is case-insensitive (NOCASE collation on the column).
pub fn find_by_username(conn: &Connection, username: &str) -> StoreResult<Option<User>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, username, password_hash, salt, created_at, last_login_at, is_active
         FROM users WHERE username = ?1",
    )?;
    let user = stmt.query_row([username], row_to_user).optional()?;
    Ok(user)
}

pub fn exists(conn: &Connection, username: &str) -> StoreResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE username = ?1",
        [username],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn touch_last_login(conn: &Connection, id: i64, at: DateTime<Utc>) -> StoreResult<()> {
    conn.execute(
        "UPDATE users SET last_login_at = ?2 WHERE id = ?1",
        rusqlite::params![id, codec::fmt_utc(at)],
    )?;
    Ok(())
}

pub fn count(conn: &Connection) -> StoreResult<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(4)?;
    let last_login_at: Option<String> = row.get(5)?;
    let is_active: String = row.get(6)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        salt: row.get(3)?,
        created_at: codec::parse_utc(&created_at).unwrap_or(DateTime::UNIX_EPOCH),
        last_login_at: last_login_at.as_deref().and_then(codec::parse_utc),
        is_active: codec::parse_bool(&is_active).unwrap_or_default(),
    })
}
