//! Transaction row queries.

use chrono::NaiveDate;
use rusqlite::Connection;
use uuid::Uuid;

use tally_core::amount::Amount;
use tally_core::date_range::DateRange;
use tally_core::entities::Transaction;

use crate::codec;
use crate::errors::StoreResult;

const SELECT_COLUMNS: &str =
    "id, amount, observations, date, owner_user_id, category_id";

/// Optional filters combined with AND; a `None` filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSearch {
    /// Substring match on observations, case-insensitive.
    pub observations: Option<String>,
    /// Exact amount match.
    pub amount: Option<Amount>,
    /// Calendar-day range on the transaction date.
    pub range: Option<DateRange>,
    pub category_id: Option<i64>,
}

pub fn insert(conn: &Connection, transaction: &Transaction) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO transactions (id, amount, observations, date, owner_user_id, category_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
            transaction.id.to_string(),
            transaction.amount.value(),
            transaction.observations,
            codec::fmt_naive(transaction.date),
            transaction.owner_user_id,
            transaction.category_id,
        ],
    )?;
    Ok(())
}

pub fn list_for_owner(conn: &Connection, owner_user_id: i64) -> StoreResult<Vec<Transaction>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {SELECT_COLUMNS} FROM transactions
         WHERE owner_user_id = ?1 ORDER BY date DESC"
    ))?;
    let transactions = stmt
        .query_map([owner_user_id], row_to_transaction)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(transactions)
}

/// Transactions whose date falls inside the range, newest first.
pub fn for_range(
    conn: &Connection,
    owner_user_id: i64,
    range: DateRange,
) -> StoreResult<Vec<Transaction>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {SELECT_COLUMNS} FROM transactions
         WHERE owner_user_id = ?1 AND date(date) >= ?2 AND date(date) <= ?3
         ORDER BY date DESC"
    ))?;
    let transactions = stmt
        .query_map(
            rusqlite::params![owner_user_id, sql_day(range.start), sql_day(range.end)],
            row_to_transaction,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(transactions)
}

pub fn search(
    conn: &Connection,
    owner_user_id: i64,
    input: &TransactionSearch,
) -> StoreResult<Vec<Transaction>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {SELECT_COLUMNS} FROM transactions
         WHERE owner_user_id = ?1
           AND (?2 IS NULL OR instr(lower(observations), lower(?2)) > 0)
           AND (?3 IS NULL OR amount = ?3)
           AND (?4 IS NULL OR date(date) >= ?4)
           AND (?5 IS NULL OR date(date) <= ?5)
           AND (?6 IS NULL OR category_id = ?6)
         ORDER BY date DESC"
    ))?;
    let transactions = stmt
        .query_map(
            rusqlite::params![
                owner_user_id,
                input.observations.as_deref(),
                input.amount.map(Amount::value),
                input.range.map(|r| sql_day(r.start)),
                input.range.map(|r| sql_day(r.end)),
                input.category_id,
            ],
            row_to_transaction,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(transactions)
}

/// Delete one of the owner's transactions. Returns whether a row existed.
pub fn delete(conn: &Connection, owner_user_id: i64, id: Uuid) -> StoreResult<bool> {
    let deleted = conn.execute(
        "DELETE FROM transactions WHERE id = ?1 AND owner_user_id = ?2",
        rusqlite::params![id.to_string(), owner_user_id],
    )?;
    Ok(deleted > 0)
}

pub fn count(conn: &Connection) -> StoreResult<i64> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
    Ok(count)
}

fn sql_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let id: String = row.get(0)?;
    let date: String = row.get(3)?;
    Ok(Transaction {
        id: Uuid::parse_str(&id).unwrap_or(Uuid::nil()),
        amount: Amount(row.get(1)?),
        observations: row.get(2)?,
        date: codec::parse_naive(&date).unwrap_or_default(),
        owner_user_id: row.get(4)?,
        category_id: row.get(5)?,
    })
}
