//! Application services composed by the desktop shell.
//! Ownership scoping lives here: every query a service runs is filtered by
//! the session's user id, never in the storage core below.

pub mod category;
pub mod login;
pub mod transaction;

pub use category::CategoryService;
pub use login::{LoginService, Session};
pub use transaction::{NewTransaction, TransactionService};
