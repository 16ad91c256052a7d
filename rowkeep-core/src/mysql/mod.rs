//! MySQL implementation of [`crate::SqlExecutor`].
//!
//! # Module Structure
//! - `session`: the single process-lifetime connection
//! - `values`: binding [`crate::SqlValue`]s and decoding result rows
//!
//! # Resource Model
//! - Exactly one connection; no pool, no reconnects
//! - Statements are serialized through an async mutex, in FIFO order
//! - Every statement runs under the configured query deadline

mod session;
mod values;

pub use session::MySqlSession;
