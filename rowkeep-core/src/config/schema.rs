//! Schema descriptor: the tables ensured at startup.
//!
//! The descriptor is an ordered list of table names and their column
//! definitions. Definitions are trusted DDL fragments and are passed to
//! `CREATE TABLE` verbatim.

use crate::error::RowkeepError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One table and the column definitions used to create it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name
    pub name: String,
    /// Column definitions, e.g. `id INT AUTO_INCREMENT PRIMARY KEY, name TEXT`
    pub columns: String,
}

impl TableDefinition {
    /// Creates a table definition.
    pub fn new(name: impl Into<String>, columns: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into(),
        }
    }
}

/// Ordered set of tables ensured during bootstrap.
///
/// # Example
/// ```rust
/// use rowkeep_core::SchemaDescriptor;
///
/// let schema = SchemaDescriptor::from_json_str(
///     r#"{"tables": [{"name": "users", "columns": "username VARCHAR(255) UNIQUE"}]}"#,
/// )?;
/// assert_eq!(schema.tables.len(), 1);
/// assert!(schema.table("users").is_some());
/// # Ok::<(), rowkeep_core::RowkeepError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Tables in creation order
    pub tables: Vec<TableDefinition>,
}

impl Default for SchemaDescriptor {
    fn default() -> Self {
        Self {
            tables: vec![
                TableDefinition::new(
                    "users",
                    "id INT AUTO_INCREMENT PRIMARY KEY, \
                     username VARCHAR(255) NOT NULL UNIQUE, \
                     password VARCHAR(255) NOT NULL",
                ),
                TableDefinition::new(
                    "profiles",
                    "id INT AUTO_INCREMENT PRIMARY KEY, \
                     username VARCHAR(255) NOT NULL UNIQUE, \
                     display_name VARCHAR(255), \
                     email VARCHAR(320)",
                ),
                TableDefinition::new(
                    "sessions",
                    "id INT AUTO_INCREMENT PRIMARY KEY, \
                     username VARCHAR(255) NOT NULL, \
                     token CHAR(64) NOT NULL UNIQUE, \
                     created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP",
                ),
                TableDefinition::new(
                    "records",
                    "id INT AUTO_INCREMENT PRIMARY KEY, \
                     username VARCHAR(255) NOT NULL, \
                     title VARCHAR(255) NOT NULL, \
                     body TEXT, \
                     created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP",
                ),
            ],
        }
    }
}

impl SchemaDescriptor {
    /// Parses and validates a descriptor from JSON text.
    ///
    /// # Errors
    /// Returns a serialization error for malformed JSON and a configuration
    /// error when the descriptor fails [`SchemaDescriptor::validate`].
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let descriptor: Self =
            serde_json::from_str(json).map_err(|e| RowkeepError::Serialization {
                context: "Failed to parse schema descriptor".to_string(),
                source: e,
            })?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Reads and validates a descriptor from a JSON file.
    pub fn from_json_file(path: &Path) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| RowkeepError::Io {
            context: format!("Failed to read schema descriptor {}", path.display()),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks that every table has a unique, non-empty name and a non-empty
    /// column definition.
    pub fn validate(&self) -> crate::Result<()> {
        if self.tables.is_empty() {
            return Err(RowkeepError::configuration(
                "schema descriptor must list at least one table",
            ));
        }

        let mut seen = HashSet::with_capacity(self.tables.len());
        for table in &self.tables {
            if table.name.trim().is_empty() {
                return Err(RowkeepError::configuration("table name cannot be empty"));
            }
            if table.columns.trim().is_empty() {
                return Err(RowkeepError::configuration(format!(
                    "table '{}' has no column definitions",
                    table.name
                )));
            }
            if !seen.insert(table.name.as_str()) {
                return Err(RowkeepError::configuration(format!(
                    "table '{}' is listed more than once",
                    table.name
                )));
            }
        }

        Ok(())
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|table| table.name == name)
    }
}
