//! # tally-core
//!
//! Foundation crate for the Tally finance tracker.
//! Defines the domain types (amounts, date ranges, entities), the schema
//! fingerprint oracle, and the tracing bootstrap. The storage crate depends
//! on this; nothing here touches SQLite.

pub mod amount;
pub mod balance;
pub mod date_range;
pub mod entities;
pub mod fingerprint;
pub mod trace;

// Re-export the most commonly used types at the crate root.
pub use amount::Amount;
pub use balance::PeriodBalance;
pub use date_range::DateRange;
pub use entities::{Category, EntityKind, ImportBundle, SchemaFingerprint, Transaction, User};
