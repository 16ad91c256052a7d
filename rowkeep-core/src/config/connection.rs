//! Database connection configuration.
//!
//! This module provides the `ConnectionConfig` struct for configuring the
//! single MySQL connection the data-access layer holds.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Port MySQL listens on unless told otherwise.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Configuration for the database connection.
///
/// # Security
/// This struct intentionally does NOT store passwords or credentials.
/// Credentials are carried by [`crate::Credentials`] and never serialized.
///
/// # Example
/// ```rust
/// use rowkeep_core::ConnectionConfig;
///
/// let config = ConnectionConfig::new("localhost".to_string())
///     .with_port(3306)
///     .with_database("app".to_string());
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database host address
    pub host: String,
    /// Optional port number
    pub port: Option<u16>,
    /// Database ensured and selected at startup
    pub database: Option<String>,
    /// Deadline for establishing the connection
    pub connect_timeout: Duration,
    /// Deadline applied to every statement
    pub query_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: None,
            database: None,
            connect_timeout: Duration::from_secs(30),
            query_timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "mysql://{}:{}{}",
            self.host,
            self.port_or_default(),
            self.database
                .as_ref()
                .map_or_else(String::new, |db| format!("/{}", db))
        )
        // Credentials live in `Credentials` and are never rendered
    }
}

impl ConnectionConfig {
    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if configuration values are invalid or unsafe
    pub fn validate(&self) -> crate::Result<()> {
        if self.host.is_empty() {
            return Err(crate::error::RowkeepError::configuration(
                "host cannot be empty",
            ));
        }

        if self.port == Some(0) {
            return Err(crate::error::RowkeepError::configuration(
                "port must be greater than 0",
            ));
        }

        if let Some(database) = &self.database {
            let length = database.chars().count();
            if length == 0 || length > 64 {
                return Err(crate::error::RowkeepError::configuration(format!(
                    "database name must be 1-64 characters, got {}",
                    length
                )));
            }
        }

        if self.connect_timeout.is_zero() {
            return Err(crate::error::RowkeepError::configuration(
                "connect_timeout must be greater than 0",
            ));
        }

        if self.query_timeout.is_zero() {
            return Err(crate::error::RowkeepError::configuration(
                "query_timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Creates a new connection config with safe defaults.
    pub fn new(host: String) -> Self {
        Self {
            host,
            ..Default::default()
        }
    }

    /// Port to connect to, falling back to the MySQL default.
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_MYSQL_PORT)
    }

    /// Target database, or a configuration error when none was given.
    pub fn require_database(&self) -> crate::Result<&str> {
        self.database.as_deref().ok_or_else(|| {
            crate::error::RowkeepError::configuration(
                "no target database configured; add it to the connection string or pass --database",
            )
        })
    }

    /// Builder method to set port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Builder method to set database.
    pub fn with_database(mut self, database: String) -> Self {
        self.database = Some(database);
        self
    }

    /// Builder method to set the connect deadline.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to set the per-statement deadline.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}
