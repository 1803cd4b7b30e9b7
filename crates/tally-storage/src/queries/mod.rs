//! Typed row queries over an open connection, one module per entity kind.
//! These are the normal-operation paths; migration reads go through the
//! raw scan and codec instead.

pub mod categories;
pub mod transactions;
pub mod users;
