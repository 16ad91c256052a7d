//! SQL statement construction.
//!
//! # Module Structure
//! - `identifier`: backtick quoting for database, table and column names
//! - `value`: values bound as statement parameters
//! - `selection`: select-list and constraint arguments for reads
//! - `statement`: the statement templates used by bootstrap and operations
//!
//! Identifiers are the only caller input interpolated into statement text.
//! Values always travel separately as bound parameters.

mod identifier;
mod selection;
mod statement;
mod value;

pub use identifier::{quote_identifier, quote_unqualified};
pub use selection::{Columns, ConstraintKeys, ConstraintValues};
pub use statement::{
    Statement, create_database, create_table, insert, schema_exists, select, table_exists,
    use_database,
};
pub use value::SqlValue;
