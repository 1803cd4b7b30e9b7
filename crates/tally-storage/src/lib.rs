//! # tally-storage
//!
//! SQLite persistence core for the Tally finance tracker.
//! Owns the physical store file and everything that touches it: the store
//! gateway, the tolerant row codec, the schema-drift migration engine,
//! per-entity queries, and the application services the desktop shell
//! composes.
//!
//! ## Components
//! - **paths** — Store file and backup locations per installation
//! - **schema** — Schema SQL and connection pragmas
//! - **gateway** — Raw scans, reset, checkpoint/copy, replace-from
//! - **codec** — Loosely-typed rows and best-effort coercion
//! - **record** — Singleton schema-fingerprint record
//! - **migration** — Drift detection, export/reset/reimport, rollback
//! - **queries** — Typed per-entity queries for normal operation
//! - **services** — Login, categories, transactions, period balances

pub mod codec;
pub mod errors;
pub mod gateway;
pub mod migration;
pub mod paths;
pub mod queries;
pub mod record;
pub mod schema;
pub mod services;

// Re-export the most commonly used types.
pub use errors::{StoreError, StoreResult};
pub use gateway::{IntegrityReport, StoreGateway};
pub use migration::{MigrationEngine, MigrationOutcome};
pub use paths::StorePaths;
pub use queries::transactions::TransactionSearch;
pub use services::{CategoryService, LoginService, NewTransaction, Session, TransactionService};
