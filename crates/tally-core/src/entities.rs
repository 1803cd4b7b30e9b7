//! Persisted entity records and the kind registry the storage layer
//! dispatches on.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::amount::Amount;

/// Identity of every persisted record type. The storage layer maps each
/// kind to a physical table through the lookup methods below instead of
/// reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Category,
    Transaction,
    Fingerprint,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::User,
        EntityKind::Category,
        EntityKind::Transaction,
        EntityKind::Fingerprint,
    ];

    /// The kinds moved across a store reset, parent before child so
    /// foreign keys hold as rows are written back.
    pub const DATA: [EntityKind; 3] =
        [EntityKind::User, EntityKind::Category, EntityKind::Transaction];

    pub fn table_name(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Category => "categories",
            Self::Transaction => "transactions",
            Self::Fingerprint => "schema_fingerprint",
        }
    }

    pub fn primary_key(&self) -> &'static str {
        "id"
    }

    pub fn parse(table_name: &str) -> Option<Self> {
        match table_name {
            "users" => Some(Self::User),
            "categories" => Some(Self::Category),
            "transactions" => Some(Self::Transaction),
            "schema_fingerprint" => Some(Self::Fingerprint),
            _ => None,
        }
    }
}

/// A dated monetary movement owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: Amount,
    pub observations: String,
    pub date: NaiveDateTime,
    pub owner_user_id: i64,
    pub category_id: Option<i64>,
}

/// A user-defined label for transactions. Names are unique per owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub owner_user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// The singleton record carrying the last-seen schema fingerprint.
/// Exactly one row exists, with `id` fixed at [`SchemaFingerprint::SINGLETON_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFingerprint {
    pub id: i64,
    pub fingerprint: String,
}

impl SchemaFingerprint {
    pub const SINGLETON_ID: i64 = 1;

    pub fn new(fingerprint: impl Into<String>) -> Self {
        Self {
            id: Self::SINGLETON_ID,
            fingerprint: fingerprint.into(),
        }
    }
}

/// Everything recovered from a store at one instant: the unit moved across
/// a destructive reset. Transient; never persisted as-is.
#[derive(Debug, Clone, Default)]
pub struct ImportBundle {
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
}

impl ImportBundle {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.categories.is_empty() && self.transactions.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.users.len() + self.categories.len() + self.transactions.len()
    }
}
