//! Statement templates.
//!
//! Every builder returns a [`Statement`]: the SQL text with identifiers already
//! quoted, plus the values to bind for each `?` placeholder.

use super::identifier::{quote_identifier, quote_unqualified};
use super::selection::{Columns, ConstraintKeys, ConstraintValues, pair_constraints};
use super::value::SqlValue;
use crate::{Result, RowkeepError};

/// SQL text and the parameters bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Statement text with `?` placeholders
    pub sql: String,
    /// Values bound to the placeholders, in order
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// Creates a statement with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a statement with bound parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// True when the statement carries no bound parameters.
    pub fn is_unparameterized(&self) -> bool {
        self.params.is_empty()
    }
}

impl std::fmt::Display for Statement {
    // Parameter values are left out so they never reach the logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{} params]", self.sql, self.params.len())
    }
}

fn require_identifier(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RowkeepError::validation(format!("{kind} name cannot be empty")));
    }
    Ok(())
}

/// Checks `INFORMATION_SCHEMA.SCHEMATA` for a database.
pub fn schema_exists(database: &str) -> Statement {
    Statement::with_params(
        "SELECT SCHEMA_NAME FROM INFORMATION_SCHEMA.SCHEMATA WHERE SCHEMA_NAME = ?",
        vec![database.into()],
    )
}

/// `CREATE DATABASE` for `database`.
pub fn create_database(database: &str) -> Result<Statement> {
    require_identifier("database", database)?;
    Ok(Statement::new(format!(
        "CREATE DATABASE {}",
        quote_unqualified(database)
    )))
}

/// `USE` for `database`.
pub fn use_database(database: &str) -> Result<Statement> {
    require_identifier("database", database)?;
    Ok(Statement::new(format!("USE {}", quote_unqualified(database))))
}

/// Checks `INFORMATION_SCHEMA.TABLES` for a table in `database`.
pub fn table_exists(database: &str, table: &str) -> Statement {
    Statement::with_params(
        "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?",
        vec![database.into(), table.into()],
    )
}

/// `CREATE TABLE` for `table` in the selected database.
///
/// The name is quoted as a single identifier, matching the `TABLE_NAME`
/// bound by [`table_exists`]. `column_defs` is a trusted DDL fragment and is
/// inserted verbatim.
pub fn create_table(table: &str, column_defs: &str) -> Result<Statement> {
    require_identifier("table", table)?;
    if column_defs.trim().is_empty() {
        return Err(RowkeepError::validation(format!(
            "table '{table}' has no column definitions"
        )));
    }
    Ok(Statement::new(format!(
        "CREATE TABLE {} ({})",
        quote_unqualified(table),
        column_defs
    )))
}

/// `INSERT` of one row into `table`.
///
/// # Errors
/// Returns a validation error when the column and value counts differ, when
/// no columns are given, or when any identifier is empty.
pub fn insert<S: AsRef<str>>(table: &str, columns: &[S], values: &[SqlValue]) -> Result<Statement> {
    if columns.len() != values.len() {
        return Err(RowkeepError::validation(format!(
            "Columns count doesn't match values count ({} columns, {} values)",
            columns.len(),
            values.len()
        )));
    }
    if columns.is_empty() {
        return Err(RowkeepError::validation("at least one column is required"));
    }
    require_identifier("table", table)?;

    let mut column_list = Vec::with_capacity(columns.len());
    for column in columns {
        let column = column.as_ref();
        require_identifier("column", column)?;
        column_list.push(quote_identifier(column));
    }
    let placeholders = vec!["?"; values.len()].join(", ");

    Ok(Statement::with_params(
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_unqualified(table),
            column_list.join(", "),
            placeholders
        ),
        values.to_vec(),
    ))
}

/// `SELECT` of `columns` from `table`, filtered by equality on every key.
///
/// # Errors
/// Returns a validation error when the constraint keys and values cannot be
/// paired, or when any identifier is empty.
pub fn select(
    table: &str,
    columns: &Columns,
    keys: &ConstraintKeys,
    values: &ConstraintValues,
) -> Result<Statement> {
    let pairs = pair_constraints(keys, values)?;
    require_identifier("table", table)?;

    let select_list = match columns {
        Columns::All => Columns::WILDCARD.to_string(),
        Columns::Named(names) => {
            if names.is_empty() {
                return Err(RowkeepError::validation("at least one column is required"));
            }
            let mut quoted = Vec::with_capacity(names.len());
            for name in names {
                require_identifier("column", name)?;
                quoted.push(quote_identifier(name));
            }
            quoted.join(", ")
        }
    };

    let mut conditions = Vec::with_capacity(pairs.len());
    let mut params = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        require_identifier("constraint", key)?;
        conditions.push(format!("{} = ?", quote_identifier(key)));
        params.push(value.clone());
    }

    Ok(Statement::with_params(
        format!(
            "SELECT {} FROM {} WHERE {}",
            select_list,
            quote_unqualified(table),
            conditions.join(" AND ")
        ),
        params,
    ))
}
