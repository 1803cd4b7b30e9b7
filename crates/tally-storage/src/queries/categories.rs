//! Category row queries.

use rusqlite::{Connection, OptionalExtension};

use tally_core::entities::Category;

use crate::errors::StoreResult;

/// Insert a new category and return it with the assigned id.
pub fn insert(conn: &Connection, owner_user_id: i64, name: &str) -> StoreResult<Category> {
    conn.execute(
        "INSERT INTO categories (name, owner_user_id) VALUES (?1, ?2)",
        rusqlite::params![name, owner_user_id],
    )?;
    Ok(Category {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        owner_user_id,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> StoreResult<Option<Category>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, owner_user_id FROM categories WHERE id = ?1",
    )?;
    let category = stmt.query_row([id], row_to_category).optional()?;
    Ok(category)
}

pub fn find_by_name(
    conn: &Connection,
    owner_user_id: i64,
    name: &str,
) -> StoreResult<Option<Category>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, owner_user_id FROM categories
         WHERE owner_user_id = ?1 AND name = ?2",
    )?;
    let category = stmt
        .query_row(rusqlite::params![owner_user_id, name], row_to_category)
        .optional()?;
    Ok(category)
}

pub fn list_for_owner(conn: &Connection, owner_user_id: i64) -> StoreResult<Vec<Category>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, owner_user_id FROM categories
         WHERE owner_user_id = ?1 ORDER BY name",
    )?;
    let categories = stmt
        .query_map([owner_user_id], row_to_category)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

/// Delete a category. Transactions referencing it fall back to NULL via
/// the foreign key's SET NULL action.
pub fn delete(conn: &Connection, id: i64) -> StoreResult<usize> {
    let deleted = conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
    Ok(deleted)
}

pub fn count(conn: &Connection) -> StoreResult<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    Ok(count)
}

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        owner_user_id: row.get(2)?,
    })
}
