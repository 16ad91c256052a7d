//! Core data-access layer for rowkeep.
//!
//! This crate opens a single MySQL connection, makes sure the target database
//! and its tables exist, and exposes parameterized insert and read helpers.
//! Every operation is one round trip; locking and consistency are left to the
//! database engine.
//!
//! # Security Guarantees
//! - Identifiers are quoted before they are interpolated into statement text
//! - Values are always bound as statement parameters
//! - Credentials are never logged and are zeroed when dropped
//!
//! # Architecture
//! - [`executor::SqlExecutor`] is the seam between statement building and the
//!   driver; [`mysql::MySqlSession`] is the production implementation
//! - [`bootstrap`] runs the startup schema checks
//! - [`operations`] holds the insert and read helpers

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod mysql;
pub mod operations;
pub mod security;
pub mod sql;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use bootstrap::{bootstrap, ensure_database_exists, ensure_table_exists, select_database};
pub use config::{ConnectionConfig, SchemaDescriptor, TableDefinition};
pub use error::{Result, RowkeepError};
pub use executor::{DriverError, ExecResult, Row, SqlExecutor};
pub use logging::init_logging;
pub use mysql::MySqlSession;
pub use operations::{InsertOutcome, InsertStatus, insert_row, read_rows};
pub use security::{Credentials, parse_connection_string};
pub use sql::{Columns, ConstraintKeys, ConstraintValues, SqlValue, Statement, quote_identifier};
