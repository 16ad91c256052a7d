//! Credential handling.
//!
//! # Security Guarantees
//! - Credentials are stored in `Zeroizing` containers for automatic memory clearing
//! - Connection strings are parsed to extract credentials safely
//! - Passwords are redacted from `Debug` output, logs and error messages
//!
//! # Module Structure
//! - `credentials`: Secure credential container with automatic memory zeroing
//! - `connection`: MySQL connection string parsing

mod connection;
mod credentials;

pub use connection::parse_connection_string;
pub use credentials::Credentials;
