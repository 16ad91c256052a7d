//! rowkeep: bootstrap a MySQL schema and run parameterized inserts and reads.
//!
//! # Security Guarantees
//! - Credentials are never logged; targets are shown without them
//! - Identifiers are quoted and values are always bound as parameters

use clap::Parser;
use rowkeep::{Cli, Command, get_database_url, load_schema, run};
use rowkeep_core::{
    Credentials, MySqlSession, Result, RowkeepError, init_logging, parse_connection_string,
};
use std::io::{self, Write};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(
        cli.global.verbose,
        cli.global.quiet,
        cli.global.log_file.as_deref(),
    )?;

    let url = get_database_url(cli.database_url, cli.database_url_file.as_deref())?;
    let (mut config, mut credentials) = parse_connection_string(&url)?;
    if cli.password_prompt {
        credentials = prompt_password(credentials)?;
    }
    if let Some(database) = cli.database {
        config = config.with_database(database);
    }
    let database = config.require_database()?.to_string();
    let schema = load_schema(cli.schema.as_deref())?;

    let session = MySqlSession::connect(&config, &credentials).await?;
    let command = cli.command.unwrap_or(Command::Bootstrap);

    let report = run(&session, &database, &schema, command).await;
    let closed = session.close().await;

    let report = report.inspect_err(|e| error!("{}", e))?;
    closed?;

    let rendered = serde_json::to_string_pretty(&report).map_err(|e| {
        RowkeepError::Serialization {
            context: "Failed to render command output".to_string(),
            source: e,
        }
    })?;
    println!("{}", rendered);
    info!("Done");

    Ok(())
}

/// Reads the password from the terminal without echo.
fn prompt_password(credentials: Credentials) -> Result<Credentials> {
    print!("Password for {}: ", credentials.username());
    io::stdout().flush().map_err(|e| {
        RowkeepError::configuration(format!(
            "Failed to flush stdout before reading password: {}",
            e
        ))
    })?;
    let password = rpassword::read_password().map_err(|e| {
        RowkeepError::configuration(format!("Failed to read password: {}", e))
    })?;

    Ok(credentials.with_password(password))
}
