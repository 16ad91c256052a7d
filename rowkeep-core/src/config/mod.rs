//! Configuration types.
//!
//! # Module Structure
//! - `connection`: server address, target database and timeouts
//! - `schema`: the tables ensured at startup and their column definitions

mod connection;
mod schema;

pub use connection::{ConnectionConfig, DEFAULT_MYSQL_PORT};
pub use schema::{SchemaDescriptor, TableDefinition};
