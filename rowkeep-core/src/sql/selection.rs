//! Select-list and constraint arguments for reads.
//!
//! Each argument accepts either a single item or an ordered sequence, so a
//! caller can write `read_rows(&session, "users", "*", "username", "alice")`
//! or pass vectors for multi-column lookups.

use super::value::SqlValue;
use crate::{Result, RowkeepError};

/// Columns to return from a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    /// Every column (`*`)
    All,
    /// The named columns, in order
    Named(Vec<String>),
}

impl Columns {
    /// Marker accepted in place of a column name to select every column.
    pub const WILDCARD: &'static str = "*";
}

impl From<&str> for Columns {
    fn from(column: &str) -> Self {
        if column == Self::WILDCARD {
            Self::All
        } else {
            Self::Named(vec![column.to_string()])
        }
    }
}

impl From<String> for Columns {
    fn from(column: String) -> Self {
        Self::from(column.as_str())
    }
}

impl From<Vec<String>> for Columns {
    fn from(columns: Vec<String>) -> Self {
        Self::Named(columns)
    }
}

impl From<Vec<&str>> for Columns {
    fn from(columns: Vec<&str>) -> Self {
        Self::Named(columns.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Columns {
    fn from(columns: &[&str]) -> Self {
        Self::Named(columns.iter().map(|c| (*c).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Columns {
    fn from(columns: [&str; N]) -> Self {
        Self::Named(columns.iter().map(|c| (*c).to_string()).collect())
    }
}

/// Column names constrained by a read's `WHERE` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKeys {
    /// One column
    Single(String),
    /// Several columns, combined with `AND`
    Many(Vec<String>),
}

impl From<&str> for ConstraintKeys {
    fn from(key: &str) -> Self {
        Self::Single(key.to_string())
    }
}

impl From<String> for ConstraintKeys {
    fn from(key: String) -> Self {
        Self::Single(key)
    }
}

impl From<Vec<String>> for ConstraintKeys {
    fn from(keys: Vec<String>) -> Self {
        Self::Many(keys)
    }
}

impl From<Vec<&str>> for ConstraintKeys {
    fn from(keys: Vec<&str>) -> Self {
        Self::Many(keys.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ConstraintKeys {
    fn from(keys: [&str; N]) -> Self {
        Self::Many(keys.iter().map(|k| (*k).to_string()).collect())
    }
}

/// Values the constrained columns must equal.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintValues {
    /// One value
    Single(SqlValue),
    /// Several values, positionally matching [`ConstraintKeys::Many`]
    Many(Vec<SqlValue>),
}

impl From<SqlValue> for ConstraintValues {
    fn from(value: SqlValue) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for ConstraintValues {
    fn from(value: &str) -> Self {
        Self::Single(value.into())
    }
}

impl From<String> for ConstraintValues {
    fn from(value: String) -> Self {
        Self::Single(value.into())
    }
}

impl From<i64> for ConstraintValues {
    fn from(value: i64) -> Self {
        Self::Single(value.into())
    }
}

impl From<Vec<SqlValue>> for ConstraintValues {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for ConstraintValues {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(SqlValue::from).collect())
    }
}

impl From<Vec<String>> for ConstraintValues {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values.into_iter().map(SqlValue::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ConstraintValues {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.iter().map(|v| SqlValue::from(*v)).collect())
    }
}

/// Pairs constraint keys with their values.
///
/// A single key takes a single value. When either side is a sequence, both
/// must be sequences of the same, non-zero length.
pub(crate) fn pair_constraints<'a>(
    keys: &'a ConstraintKeys,
    values: &'a ConstraintValues,
) -> Result<Vec<(&'a str, &'a SqlValue)>> {
    match (keys, values) {
        (ConstraintKeys::Single(key), ConstraintValues::Single(value)) => {
            Ok(vec![(key.as_str(), value)])
        }
        (ConstraintKeys::Many(keys), ConstraintValues::Many(values))
            if keys.len() == values.len() =>
        {
            if keys.is_empty() {
                return Err(RowkeepError::validation(
                    "at least one constraint is required",
                ));
            }
            Ok(keys
                .iter()
                .map(String::as_str)
                .zip(values.iter())
                .collect())
        }
        _ => {
            tracing::info!(
                "Constraint parameters and values must be the same length ({} keys, {} values)",
                key_count(keys),
                value_count(values)
            );
            Err(RowkeepError::validation(
                "constraint parameters and values must be the same length",
            ))
        }
    }
}

fn key_count(keys: &ConstraintKeys) -> usize {
    match keys {
        ConstraintKeys::Single(_) => 1,
        ConstraintKeys::Many(keys) => keys.len(),
    }
}

fn value_count(values: &ConstraintValues) -> usize {
    match values {
        ConstraintValues::Single(_) => 1,
        ConstraintValues::Many(values) => values.len(),
    }
}
