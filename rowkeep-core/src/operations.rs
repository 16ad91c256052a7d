//! Parameterized insert and read helpers.
//!
//! Both helpers validate their arguments before touching the connection, so a
//! validation error guarantees no statement was sent.

use crate::error::RowkeepError;
use crate::executor::{ExecResult, Row, SqlExecutor};
use crate::sql::{self, Columns, ConstraintKeys, ConstraintValues, SqlValue};
use crate::Result;
use serde::Serialize;

/// Status tag of a completed insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsertStatus {
    /// The row was inserted
    Success,
    /// A unique key already held the value; nothing was inserted
    Duplicate,
}

impl std::fmt::Display for InsertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Duplicate => write!(f, "DUPLICATE"),
        }
    }
}

/// Outcome of [`insert_row`].
///
/// A duplicate key is reported here rather than as an error: inserting means
/// "insert, or tell me it is already there".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsertOutcome {
    /// The row was inserted
    Success {
        /// Driver's report for the insert
        result: ExecResult,
    },
    /// A unique key already held the value
    Duplicate,
}

impl InsertOutcome {
    /// Status tag of this outcome.
    pub fn status(&self) -> InsertStatus {
        match self {
            Self::Success { .. } => InsertStatus::Success,
            Self::Duplicate => InsertStatus::Duplicate,
        }
    }

    /// Driver result for a successful insert.
    pub fn result(&self) -> Option<&ExecResult> {
        match self {
            Self::Success { result } => Some(result),
            Self::Duplicate => None,
        }
    }

    /// True when the row was rejected as a duplicate.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

/// Inserts one row into `table`.
///
/// # Errors
/// - validation error, before any statement is sent, when `columns` and
///   `values` differ in length or an identifier is empty
/// - insert error for any driver failure other than a duplicate key
///
/// # Example
/// ```rust,no_run
/// use rowkeep_core::{InsertStatus, MySqlSession, insert_row};
///
/// # async fn example(session: &MySqlSession) -> rowkeep_core::Result<()> {
/// let outcome = insert_row(
///     session,
///     "users",
///     &["username", "password"],
///     &["alice".into(), "pw1".into()],
/// )
/// .await?;
/// assert_eq!(outcome.status(), InsertStatus::Success);
/// # Ok(())
/// # }
/// ```
pub async fn insert_row<S: AsRef<str> + Sync>(
    executor: &dyn SqlExecutor,
    table: &str,
    columns: &[S],
    values: &[SqlValue],
) -> Result<InsertOutcome> {
    let statement = sql::insert(table, columns, values)?;

    match executor.execute(&statement).await {
        Ok(result) => Ok(InsertOutcome::Success { result }),
        Err(e) if e.is_duplicate_key() => {
            tracing::info!("Duplicate entry in {}", table);
            Ok(InsertOutcome::Duplicate)
        }
        Err(e) => {
            let column_names: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
            tracing::info!(
                "Failed to insert data into {} ({})",
                table,
                column_names.join(", ")
            );
            Err(RowkeepError::insert_failed(table, e))
        }
    }
}

/// Reads the rows of `table` whose constrained columns equal the given values.
///
/// Returns an empty vector when nothing matches.
///
/// # Errors
/// - validation error, before any statement is sent, when the constraint keys
///   and values cannot be paired or an identifier is empty
/// - read error for any driver failure
///
/// # Example
/// ```rust,no_run
/// use rowkeep_core::{MySqlSession, read_rows};
///
/// # async fn example(session: &MySqlSession) -> rowkeep_core::Result<()> {
/// let rows = read_rows(session, "users", "*", "username", "alice").await?;
/// let rows = read_rows(
///     session,
///     "users",
///     ["username", "password"],
///     ["username", "password"],
///     ["alice", "pw1"],
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn read_rows(
    executor: &dyn SqlExecutor,
    table: &str,
    columns: impl Into<Columns>,
    constraint_keys: impl Into<ConstraintKeys>,
    constraint_values: impl Into<ConstraintValues>,
) -> Result<Vec<Row>> {
    let statement = sql::select(
        table,
        &columns.into(),
        &constraint_keys.into(),
        &constraint_values.into(),
    )?;

    executor.fetch_all(&statement).await.map_err(|e| {
        tracing::info!("Failed to select data from {}", table);
        RowkeepError::read_failed(table, e)
    })
}
