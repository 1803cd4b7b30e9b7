//! Row codec: loosely-typed rows and best-effort coercion into entities.
//!
//! `RawRow` is what a table scan yields when the physical schema may no
//! longer match the typed model. Decoding matches columns by
//! case-insensitive name and coerces each cell independently; a cell that
//! cannot be coerced leaves its field at the type's zero value instead of
//! failing the row. This tolerance is what lets a migration recover data
//! written under an older shape.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::ToSql;
use uuid::Uuid;

use tally_core::amount::Amount;
use tally_core::entities::{Category, SchemaFingerprint, Transaction, User};

/// Textual form of a `NaiveDateTime` in the store.
const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// ─── Scalar ─────────────────────────────────────────────────────────────────

/// A loosely-typed cell, mirroring SQLite's storage classes.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Scalar {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Real(f) => Some(*f as i64),
            Self::Text(t) => {
                let t = t.trim();
                t.parse::<i64>()
                    .ok()
                    .or_else(|| t.parse::<f64>().ok().map(|f| f as i64))
            }
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(f) => Some(*f),
            Self::Text(t) => t.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Booleans arrive as native 0/1 integers or as "true"/"false" text,
    /// depending on which schema generation wrote the row.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Integer(i) => Some(*i != 0),
            Self::Real(f) => Some(*f != 0.0),
            Self::Text(t) => parse_bool(t),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(t) => Some(t.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Real(f) => Some(f.to_string()),
            _ => None,
        }
    }

    /// Monetary cells may be numeric or text with a currency symbol.
    pub fn as_amount(&self) -> Option<Amount> {
        match self {
            Self::Integer(i) => Some(Amount(*i as f64)),
            Self::Real(f) => Some(Amount(*f)),
            Self::Text(t) => Amount::parse(t),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Text(t) => Uuid::parse_str(t.trim()).ok(),
            Self::Blob(b) => Uuid::from_slice(b).ok(),
            _ => None,
        }
    }

    pub fn as_naive_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Text(t) => parse_naive(t),
            _ => None,
        }
    }

    pub fn as_utc_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Text(t) => parse_utc(t),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Scalar {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(f) => Self::Real(f),
            ValueRef::Text(t) => Self::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Self::Blob(b.to_vec()),
        }
    }
}

impl ToSql for Scalar {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(Value::Null),
            Self::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Self::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            Self::Text(t) => ToSqlOutput::Borrowed(ValueRef::Text(t.as_bytes())),
            Self::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

// ─── RawRow ─────────────────────────────────────────────────────────────────

/// One physical row: ordered `(column name, cell)` pairs, independent of
/// any typed schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, Scalar)>,
}

impl RawRow {
    pub fn new(cells: Vec<(String, Scalar)>) -> Self {
        Self { cells }
    }

    /// Look up a cell by case-insensitive column name.
    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.cells
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, scalar)| scalar)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl From<Vec<(&'static str, Scalar)>> for RawRow {
    fn from(cells: Vec<(&'static str, Scalar)>) -> Self {
        Self::new(cells.into_iter().map(|(n, s)| (n.to_string(), s)).collect())
    }
}

/// Build a `RawRow` from a live SQL row. Shared by the gateway scan and the
/// fingerprint record store, which both read without trusting the typed
/// schema.
pub fn raw_row_from_sql_row(
    columns: &[String],
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawRow> {
    let mut cells = Vec::with_capacity(columns.len());
    for (i, name) in columns.iter().enumerate() {
        cells.push((name.clone(), Scalar::from(row.get_ref(i)?)));
    }
    Ok(RawRow::new(cells))
}

// ─── Canonical text forms ───────────────────────────────────────────────────

pub fn fmt_naive(dt: NaiveDateTime) -> String {
    dt.format(NAIVE_DATETIME_FORMAT).to_string()
}

pub fn fmt_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn fmt_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub fn parse_bool(text: &str) -> Option<bool> {
    let t = text.trim();
    if t.eq_ignore_ascii_case("true") || t == "1" {
        Some(true)
    } else if t.eq_ignore_ascii_case("false") || t == "0" {
        Some(false)
    } else {
        None
    }
}

pub fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    let t = text.trim();
    NaiveDateTime::parse_from_str(t, NAIVE_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(t).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(t, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn parse_utc(text: &str) -> Option<DateTime<Utc>> {
    let t = text.trim();
    DateTime::parse_from_rfc3339(t)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| parse_naive(t).map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc)))
}

// ─── Decode ─────────────────────────────────────────────────────────────────

pub fn decode_user(row: &RawRow) -> User {
    User {
        id: row.get("id").and_then(Scalar::as_i64).unwrap_or_default(),
        username: row.get("username").and_then(Scalar::as_text).unwrap_or_default(),
        password_hash: row
            .get("password_hash")
            .and_then(Scalar::as_text)
            .unwrap_or_default(),
        salt: row.get("salt").and_then(Scalar::as_text).unwrap_or_default(),
        created_at: row
            .get("created_at")
            .and_then(Scalar::as_utc_datetime)
            .unwrap_or(DateTime::UNIX_EPOCH),
        last_login_at: row.get("last_login_at").and_then(Scalar::as_utc_datetime),
        is_active: row.get("is_active").and_then(Scalar::as_bool).unwrap_or_default(),
    }
}

pub fn decode_category(row: &RawRow) -> Category {
    Category {
        id: row.get("id").and_then(Scalar::as_i64).unwrap_or_default(),
        name: row.get("name").and_then(Scalar::as_text).unwrap_or_default(),
        owner_user_id: row
            .get("owner_user_id")
            .and_then(Scalar::as_i64)
            .unwrap_or_default(),
    }
}

pub fn decode_transaction(row: &RawRow) -> Transaction {
    Transaction {
        id: row.get("id").and_then(Scalar::as_uuid).unwrap_or(Uuid::nil()),
        amount: row.get("amount").and_then(Scalar::as_amount).unwrap_or(Amount::ZERO),
        observations: row
            .get("observations")
            .and_then(Scalar::as_text)
            .unwrap_or_default(),
        date: row
            .get("date")
            .and_then(Scalar::as_naive_datetime)
            .unwrap_or_default(),
        owner_user_id: row
            .get("owner_user_id")
            .and_then(Scalar::as_i64)
            .unwrap_or_default(),
        category_id: row.get("category_id").and_then(Scalar::as_i64),
    }
}

pub fn decode_fingerprint(row: &RawRow) -> SchemaFingerprint {
    SchemaFingerprint {
        id: row.get("id").and_then(Scalar::as_i64).unwrap_or_default(),
        fingerprint: row
            .get("fingerprint")
            .and_then(Scalar::as_text)
            .unwrap_or_default(),
    }
}

// ─── Encode ─────────────────────────────────────────────────────────────────
// Canonical representations: numbers as numbers, booleans as "true"/"false"
// text (the store's historical convention), dates as invariant ISO text.

pub fn encode_user(user: &User) -> Vec<(&'static str, Scalar)> {
    vec![
        ("id", Scalar::Integer(user.id)),
        ("username", Scalar::Text(user.username.clone())),
        ("password_hash", Scalar::Text(user.password_hash.clone())),
        ("salt", Scalar::Text(user.salt.clone())),
        ("created_at", Scalar::Text(fmt_utc(user.created_at))),
        (
            "last_login_at",
            user.last_login_at
                .map_or(Scalar::Null, |t| Scalar::Text(fmt_utc(t))),
        ),
        ("is_active", Scalar::Text(fmt_bool(user.is_active).to_string())),
    ]
}

pub fn encode_category(category: &Category) -> Vec<(&'static str, Scalar)> {
    vec![
        ("id", Scalar::Integer(category.id)),
        ("name", Scalar::Text(category.name.clone())),
        ("owner_user_id", Scalar::Integer(category.owner_user_id)),
    ]
}

pub fn encode_transaction(transaction: &Transaction) -> Vec<(&'static str, Scalar)> {
    vec![
        ("id", Scalar::Text(transaction.id.to_string())),
        ("amount", Scalar::Real(transaction.amount.value())),
        ("observations", Scalar::Text(transaction.observations.clone())),
        ("date", Scalar::Text(fmt_naive(transaction.date))),
        ("owner_user_id", Scalar::Integer(transaction.owner_user_id)),
        (
            "category_id",
            transaction.category_id.map_or(Scalar::Null, Scalar::Integer),
        ),
    ]
}
