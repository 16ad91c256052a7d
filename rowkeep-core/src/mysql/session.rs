//! The single MySQL connection held for the lifetime of the process.

use super::values::{bind_value, row_to_json};
use crate::config::ConnectionConfig;
use crate::error::RowkeepError;
use crate::executor::{DriverError, ExecResult, Row, SqlExecutor};
use crate::security::Credentials;
use crate::sql::Statement;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection, Executor};
use std::time::Duration;
use tokio::sync::Mutex;

/// A single MySQL connection shared by every data-access operation.
///
/// Created once at startup and passed by reference into the bootstrap and
/// insert/read helpers. Statements issued concurrently wait their turn on an
/// internal mutex, so at most one is in flight.
pub struct MySqlSession {
    connection: Mutex<MySqlConnection>,
    query_timeout: Duration,
    target: String,
}

impl std::fmt::Debug for MySqlSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSession")
            .field("target", &self.target)
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

impl MySqlSession {
    /// Opens the connection.
    ///
    /// No default database is selected; bootstrap creates and selects it.
    ///
    /// # Errors
    /// Returns a connection error if the configuration is invalid, the server
    /// is unreachable, the credentials are rejected, or `connect_timeout`
    /// elapses first.
    pub async fn connect(
        config: &ConnectionConfig,
        credentials: &Credentials,
    ) -> crate::Result<Self> {
        config.validate()?;
        let target = config.to_string();

        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port_or_default())
            .username(credentials.username());
        if let Some(password) = credentials.password() {
            options = options.password(password);
        }
        options = options.disable_statement_logging();

        let connection = with_deadline(config.connect_timeout, options.connect())
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to {}: {}", target, e);
                RowkeepError::connection_failed(format!("Failed to connect to {}", target), e)
            })?;

        tracing::info!("Connected to {}", target);

        Ok(Self {
            connection: Mutex::new(connection),
            query_timeout: config.query_timeout,
            target,
        })
    }

    /// Credential-free description of the server this session talks to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Closes the connection gracefully.
    pub async fn close(self) -> crate::Result<()> {
        let target = self.target;
        self.connection.into_inner().close().await.map_err(|e| {
            RowkeepError::connection_failed(format!("Failed to close connection to {}", target), e)
        })?;
        tracing::info!("Closed connection to {}", target);
        Ok(())
    }
}

/// Runs a driver operation under `deadline`.
///
/// An elapsed deadline drops the operation and is reported as a
/// [`DriverError`] without a server error number.
async fn with_deadline<T, F>(deadline: Duration, operation: F) -> Result<T, DriverError>
where
    F: std::future::Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result.map_err(DriverError::from),
        Err(_) => Err(DriverError::timed_out(deadline)),
    }
}

#[async_trait]
impl SqlExecutor for MySqlSession {
    async fn execute(&self, statement: &Statement) -> Result<ExecResult, DriverError> {
        tracing::debug!("Executing {}", statement);
        let mut connection = self.connection.lock().await;

        // USE and other utility statements are not preparable, so statements
        // without parameters go over the text protocol.
        let result = if statement.is_unparameterized() {
            with_deadline(
                self.query_timeout,
                (&mut *connection).execute(statement.sql.as_str()),
            )
            .await?
        } else {
            let query = statement
                .params
                .iter()
                .fold(sqlx::query(&statement.sql), bind_value);
            with_deadline(self.query_timeout, query.execute(&mut *connection)).await?
        };

        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }

    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Row>, DriverError> {
        tracing::debug!("Fetching {}", statement);
        let mut connection = self.connection.lock().await;

        let query = statement
            .params
            .iter()
            .fold(sqlx::query(&statement.sql), bind_value);
        let rows = with_deadline(self.query_timeout, query.fetch_all(&mut *connection)).await?;

        Ok(rows.iter().map(row_to_json).collect())
    }
}
