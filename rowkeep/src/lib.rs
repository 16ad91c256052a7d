//! Command-line front end for rowkeep.
//!
//! Argument parsing and connection-string resolution live here so they can be
//! tested without a database; `main.rs` wires them to a live session.

use clap::{Args, Parser, Subcommand};
use rowkeep_core::{
    Columns, ConstraintKeys, ConstraintValues, Result, RowkeepError, SchemaDescriptor,
    SqlExecutor, SqlValue, bootstrap, insert_row, read_rows,
};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI argument structure
#[derive(Parser, Debug)]
#[command(name = "rowkeep")]
#[command(about = "Bootstrap a MySQL schema and run parameterized inserts and reads")]
#[command(version)]
#[command(long_about = "
rowkeep - MySQL schema bootstrap and row access

On every run rowkeep connects, creates the target database and its tables if
they are missing, then runs the requested command. Results are printed as JSON.

CONNECTION:
  Set DATABASE_URL or pass --database-url-file with a mysql:// URL.
  Optional query parameters: connect_timeout, query_timeout (seconds).

EXAMPLES:
  rowkeep bootstrap
  rowkeep insert users --column username --value alice --column password --value pw1
  rowkeep read users --key username --value alice
  rowkeep read users --columns username,password --key username --value alice
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Database connection URL
    #[arg(
        long,
        env = "DATABASE_URL",
        hide_env_values = true,
        help = "MySQL connection string (credentials are never logged)"
    )]
    pub database_url: Option<String>,

    /// Path to file containing database URL
    #[arg(long, value_name = "FILE")]
    pub database_url_file: Option<PathBuf>,

    /// Database to ensure and select, overriding the URL path
    #[arg(long)]
    pub database: Option<String>,

    /// Prompt for the password instead of reading it from the URL
    #[arg(long)]
    pub password_prompt: bool,

    /// JSON schema descriptor; the built-in tables are used when omitted
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Subcommand to execute (defaults to bootstrap)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ensure the database and tables exist, then exit
    Bootstrap,
    /// Insert one row and report SUCCESS or DUPLICATE
    Insert {
        /// Target table
        table: String,

        /// Column name; repeat once per value
        #[arg(long = "column", required = true)]
        columns: Vec<String>,

        /// Value for the column at the same position
        #[arg(long = "value", required = true)]
        values: Vec<String>,
    },
    /// Read the rows matching every key/value constraint
    Read {
        /// Source table
        table: String,

        /// Comma-separated columns to return, or `*`
        #[arg(long, value_delimiter = ',', default_value = "*")]
        columns: Vec<String>,

        /// Constrained column; repeat once per value
        #[arg(long = "key", required = true)]
        keys: Vec<String>,

        /// Value the constrained column at the same position must equal
        #[arg(long = "value", required = true)]
        values: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,

    /// Append log lines to a file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Resolves the connection URL from the flag/environment value or a file.
///
/// The flag (or `DATABASE_URL`) wins over `--database-url-file`.
///
/// # Errors
/// Returns a configuration error when neither source yields a URL, or an I/O
/// error when the file cannot be read.
pub fn get_database_url(
    database_url: Option<String>,
    database_url_file: Option<&Path>,
) -> Result<String> {
    if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
        return Ok(url);
    }

    if let Some(path) = database_url_file {
        let contents = fs::read_to_string(path).map_err(|e| RowkeepError::Io {
            context: format!("Failed to read database URL file {}", path.display()),
            source: e,
        })?;
        let url = contents.trim();
        if url.is_empty() {
            return Err(RowkeepError::configuration(format!(
                "Database URL file {} is empty",
                path.display()
            )));
        }
        return Ok(url.to_string());
    }

    Err(RowkeepError::configuration(
        "Database connection information required. Set DATABASE_URL or use --database-url-file.",
    ))
}

/// Loads the schema descriptor, falling back to the built-in tables.
///
/// # Errors
/// Returns an error if the file cannot be read or describes an invalid schema.
pub fn load_schema(path: Option<&Path>) -> Result<SchemaDescriptor> {
    match path {
        Some(path) => SchemaDescriptor::from_json_file(path),
        None => Ok(SchemaDescriptor::default()),
    }
}

/// Bootstraps `database` and runs `command`, returning its JSON report.
///
/// # Errors
/// Returns the first bootstrap, validation, insert or read error.
pub async fn run(
    executor: &dyn SqlExecutor,
    database: &str,
    schema: &SchemaDescriptor,
    command: Command,
) -> Result<serde_json::Value> {
    bootstrap(executor, database, schema).await?;

    match command {
        Command::Bootstrap => Ok(serde_json::json!({
            "database": database,
            "tables": schema.tables.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        })),
        Command::Insert {
            table,
            columns,
            values,
        } => {
            let values: Vec<SqlValue> = values.into_iter().map(SqlValue::from).collect();
            let outcome = insert_row(executor, &table, columns.as_slice(), &values).await?;
            to_json(&outcome)
        }
        Command::Read {
            table,
            columns,
            keys,
            values,
        } => {
            let rows = read_rows(
                executor,
                &table,
                select_list(columns),
                ConstraintKeys::from(keys),
                ConstraintValues::from(values),
            )
            .await?;
            to_json(&rows)
        }
    }
}

/// Maps the `--columns` flag onto a select list; a lone `*` selects everything.
#[must_use]
pub fn select_list(columns: Vec<String>) -> Columns {
    if columns.len() == 1 && columns[0] == Columns::WILDCARD {
        Columns::All
    } else {
        Columns::from(columns)
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| RowkeepError::Serialization {
        context: "Failed to render command output".to_string(),
        source: e,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> Cli {
        temp_env::with_var_unset("DATABASE_URL", || {
            Cli::try_parse_from(std::iter::once("rowkeep").chain(args.iter().copied())).unwrap()
        })
    }

    mod url_resolution {
        use super::*;

        #[test]
        fn test_flag_value_wins_over_file() {
            let file = NamedTempFile::new().unwrap();
            fs::write(&file, "mysql://file@localhost/app").unwrap();

            let url = get_database_url(
                Some("mysql://flag@localhost/app".to_string()),
                Some(file.path()),
            )
            .unwrap();

            assert_eq!(url, "mysql://flag@localhost/app");
        }

        #[test]
        fn test_file_is_trimmed() {
            let file = NamedTempFile::new().unwrap();
            fs::write(&file, "  mysql://root@localhost/app\n").unwrap();

            let url = get_database_url(None, Some(file.path())).unwrap();

            assert_eq!(url, "mysql://root@localhost/app");
        }

        #[test]
        fn test_empty_file_is_rejected() {
            let file = NamedTempFile::new().unwrap();
            fs::write(&file, "\n").unwrap();

            let error = get_database_url(None, Some(file.path())).unwrap_err();

            assert!(matches!(error, RowkeepError::Configuration { .. }));
        }

        #[test]
        fn test_missing_file_is_io_error() {
            let error =
                get_database_url(None, Some(Path::new("/nonexistent/rowkeep-url"))).unwrap_err();

            assert!(matches!(error, RowkeepError::Io { .. }));
        }

        #[test]
        fn test_no_source_is_configuration_error() {
            let error = get_database_url(None, None).unwrap_err();

            assert!(error.to_string().contains("DATABASE_URL"));
        }

        #[test]
        fn test_environment_variable_fills_flag() {
            temp_env::with_var("DATABASE_URL", Some("mysql://env@localhost/app"), || {
                let cli = Cli::try_parse_from(["rowkeep"]).unwrap();
                assert_eq!(
                    cli.database_url.as_deref(),
                    Some("mysql://env@localhost/app")
                );
            });
        }
    }

    mod argument_parsing {
        use super::*;

        #[test]
        fn test_default_command_is_none() {
            let cli = parse(&[]);

            assert!(cli.command.is_none());
            assert_eq!(cli.global.verbose, 0);
            assert!(!cli.password_prompt);
        }

        #[test]
        fn test_insert_pairs_columns_and_values() {
            let cli = parse(&[
                "insert", "users", "--column", "username", "--value", "alice", "--column",
                "password", "--value", "pw1",
            ]);

            assert_eq!(
                cli.command,
                Some(Command::Insert {
                    table: "users".to_string(),
                    columns: vec!["username".to_string(), "password".to_string()],
                    values: vec!["alice".to_string(), "pw1".to_string()],
                })
            );
        }

        #[test]
        fn test_read_defaults_to_wildcard() {
            let cli = parse(&["read", "users", "--key", "username", "--value", "alice"]);

            let Some(Command::Read { columns, .. }) = cli.command else {
                panic!("expected read command");
            };
            assert_eq!(select_list(columns), Columns::All);
        }

        #[test]
        fn test_read_splits_column_list() {
            let cli = parse(&[
                "read",
                "users",
                "--columns",
                "username,password",
                "--key",
                "username",
                "--value",
                "alice",
            ]);

            let Some(Command::Read { columns, .. }) = cli.command else {
                panic!("expected read command");
            };
            assert_eq!(
                select_list(columns),
                Columns::Named(vec!["username".to_string(), "password".to_string()])
            );
        }

        #[test]
        fn test_global_flags() {
            let cli = parse(&["-vv", "--log-file", "rowkeep.log", "--database", "app"]);

            assert_eq!(cli.global.verbose, 2);
            assert_eq!(cli.global.log_file, Some(PathBuf::from("rowkeep.log")));
            assert_eq!(cli.database.as_deref(), Some("app"));
        }
    }

    #[test]
    fn test_default_schema_when_no_file() {
        let schema = load_schema(None).unwrap();

        assert_eq!(schema, SchemaDescriptor::default());
    }

    #[test]
    fn test_schema_file_is_loaded() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            &file,
            r#"{"tables": [{"name": "notes", "columns": "id INT PRIMARY KEY"}]}"#,
        )
        .unwrap();

        let schema = load_schema(Some(file.path())).unwrap();

        assert_eq!(schema.tables[0].name, "notes");
    }
}
