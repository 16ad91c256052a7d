//! Statement execution seam between the query helpers and the driver.
//!
//! The helpers in [`crate::bootstrap`] and [`crate::operations`] only build
//! [`Statement`]s; running them is delegated to a [`SqlExecutor`]. The MySQL
//! session implements it for production use, and tests substitute recording
//! doubles.

use crate::sql::Statement;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// MySQL error number for a duplicate entry on a unique key (`ER_DUP_ENTRY`).
pub const ER_DUP_ENTRY: u16 = 1062;

/// A result row: column name to JSON value, in select-list order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Driver's report for a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecResult {
    /// Number of rows inserted, updated or deleted
    pub rows_affected: u64,
    /// Value generated for an `AUTO_INCREMENT` column, 0 when none
    pub last_insert_id: u64,
}

/// A failure reported by the database driver.
///
/// Carries the server error number when one was reported so callers can
/// recognize specific conditions such as duplicate keys.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DriverError {
    code: Option<u16>,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DriverError {
    /// Creates a driver error without a server error number.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a driver error carrying the server's error number.
    pub fn with_code(code: u16, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            source: None,
        }
    }

    /// Creates the error reported when a statement exceeds its deadline.
    pub fn timed_out(deadline: Duration) -> Self {
        Self::new(format!(
            "statement did not complete within {} ms",
            deadline.as_millis()
        ))
    }

    /// Attaches the underlying error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Server error number, if the driver reported one.
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    /// True when the server rejected the statement for violating a unique key.
    pub fn is_duplicate_key(&self) -> bool {
        self.code == Some(ER_DUP_ENTRY)
    }
}

impl From<sqlx::Error> for DriverError {
    fn from(error: sqlx::Error) -> Self {
        let code = match &error {
            sqlx::Error::Database(db_error) => db_error
                .try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
                .map(sqlx::mysql::MySqlDatabaseError::number),
            _ => None,
        };

        Self {
            code,
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }
}

/// Runs statements against a database connection.
///
/// Implementations serialize statements however the underlying connection
/// requires; callers get no ordering guarantee beyond that.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Executes a statement that returns no rows.
    async fn execute(&self, statement: &Statement) -> Result<ExecResult, DriverError>;

    /// Executes a statement and returns every row it produces.
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, DriverError>;
}
