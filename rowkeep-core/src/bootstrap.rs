//! Startup schema checks.
//!
//! Bootstrap runs strictly in sequence: ensure the database exists, select
//! it, then ensure each table of the [`SchemaDescriptor`] exists in order.
//! The first failure stops the sequence and is returned to the caller.
//!
//! Existence checks and the `CREATE` that may follow are separate statements,
//! so two processes bootstrapping the same server at once can both decide to
//! create the same object. One of them then fails with a schema error.

use crate::config::SchemaDescriptor;
use crate::error::RowkeepError;
use crate::executor::SqlExecutor;
use crate::sql;
use crate::Result;

/// Bootstrap steps report every failure, including unusable names or
/// definitions caught before anything is sent, as schema errors.
fn invalid_schema_argument(name: &str, error: RowkeepError) -> RowkeepError {
    tracing::error!("Cannot prepare schema statement for '{}': {}", name, error);
    RowkeepError::schema_failed(format!("Invalid schema object '{}'", name), error)
}

/// Creates `database` unless `INFORMATION_SCHEMA.SCHEMATA` already lists it.
///
/// # Errors
/// Returns a schema error if the name is empty, or if the check or the
/// `CREATE DATABASE` fails.
pub async fn ensure_database_exists(executor: &dyn SqlExecutor, database: &str) -> Result<()> {
    let create =
        sql::create_database(database).map_err(|e| invalid_schema_argument(database, e))?;

    let existing = executor
        .fetch_all(&sql::schema_exists(database))
        .await
        .map_err(|e| {
            tracing::error!("Failed to check for database {}", database);
            RowkeepError::schema_failed(format!("Failed to check for database '{}'", database), e)
        })?;

    if !existing.is_empty() {
        tracing::info!("Database {} exists", database);
        return Ok(());
    }

    tracing::info!("Database {} does not exist", database);
    executor.execute(&create).await.map_err(|e| {
        tracing::error!("Failed to create database {}", database);
        RowkeepError::schema_failed(format!("Failed to create database '{}'", database), e)
    })?;
    tracing::info!("Database {} created", database);

    Ok(())
}

/// Makes `database` the default for subsequent statements (`USE`).
///
/// # Errors
/// Returns a schema error if the database is missing or inaccessible.
pub async fn select_database(executor: &dyn SqlExecutor, database: &str) -> Result<()> {
    let statement =
        sql::use_database(database).map_err(|e| invalid_schema_argument(database, e))?;

    executor.execute(&statement).await.map_err(|e| {
        tracing::error!("Failed to use database {}", database);
        RowkeepError::schema_failed(format!("Failed to use database '{}'", database), e)
    })?;
    tracing::info!("Switched to database \"{}\"", database);

    Ok(())
}

/// Creates `table` from `column_defs` unless it already exists in `database`.
///
/// `column_defs` is a trusted DDL fragment and is used verbatim. Calling this
/// again for an existing table issues only the existence check.
///
/// # Errors
/// Returns a schema error if the name or definitions are empty, or if the
/// check or the `CREATE TABLE` fails.
pub async fn ensure_table_exists(
    executor: &dyn SqlExecutor,
    database: &str,
    table: &str,
    column_defs: &str,
) -> Result<()> {
    let create =
        sql::create_table(table, column_defs).map_err(|e| invalid_schema_argument(table, e))?;

    let existing = executor
        .fetch_all(&sql::table_exists(database, table))
        .await
        .map_err(|e| {
            tracing::error!("Failed to check for table {}", table);
            RowkeepError::schema_failed(
                format!("Failed to check for table '{}.{}'", database, table),
                e,
            )
        })?;

    if !existing.is_empty() {
        tracing::info!("Table {} exists", table);
        return Ok(());
    }

    executor.execute(&create).await.map_err(|e| {
        tracing::error!("Failed to create table {} in database {}", table, database);
        RowkeepError::schema_failed(format!("Failed to create table '{}'", table), e)
    })?;
    tracing::info!("Table {} created", table);

    Ok(())
}

/// Runs the startup sequence against an open connection.
///
/// # Errors
/// Returns the first error encountered; later steps are not attempted.
pub async fn bootstrap(
    executor: &dyn SqlExecutor,
    database: &str,
    schema: &SchemaDescriptor,
) -> Result<()> {
    schema.validate()?;

    ensure_database_exists(executor, database).await?;
    select_database(executor, database).await?;
    for table in &schema.tables {
        ensure_table_exists(executor, database, &table.name, &table.columns).await?;
    }

    tracing::info!(
        "Schema ready: database {} with {} tables",
        database,
        schema.tables.len()
    );
    Ok(())
}
