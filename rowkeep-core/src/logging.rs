//! Shared logging setup for the rowkeep binary and embedding applications.
//!
//! Log lines go to stderr, or are appended to a file when one is given.

use crate::error::RowkeepError;
use crate::Result;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;

/// Initializes structured logging based on verbosity level.
///
/// # Arguments
/// * `verbose` - Verbosity level (0=INFO, 1=DEBUG, 2+=TRACE)
/// * `quiet` - If true, only show ERROR level logs
/// * `log_file` - Append log lines to this file instead of stderr
///
/// # Errors
/// Returns an I/O error if the log file cannot be opened, or a configuration
/// error if a global subscriber is already installed.
///
/// # Example
/// ```rust,no_run
/// use rowkeep_core::logging::init_logging;
///
/// init_logging(1, false, None).expect("Failed to initialize logging");
/// ```
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let level = level_for(verbose, quiet);

    let installed = match log_file {
        Some(path) => build_subscriber(level, open_log_file(path)?, false).try_init(),
        None => build_subscriber(level, std::io::stderr, true).try_init(),
    };

    installed.map_err(|e| {
        RowkeepError::configuration(format!("Failed to initialize logging: {}", e))
    })
}

/// Opens `path` for appending, creating it if needed.
fn open_log_file(path: &Path) -> Result<Mutex<File>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| RowkeepError::Io {
            context: format!("Failed to open log file {}", path.display()),
            source: e,
        })?;
    Ok(Mutex::new(file))
}

fn build_subscriber<W>(
    level: tracing::Level,
    writer: W,
    ansi: bool,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish()
}

fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A global subscriber can only be installed once per process; file
    // output is checked through a scoped default subscriber instead.

    #[test]
    fn test_verbosity_levels() {
        let test_cases = [
            ((true, 0), tracing::Level::ERROR),
            ((true, 5), tracing::Level::ERROR),
            ((false, 0), tracing::Level::INFO),
            ((false, 1), tracing::Level::DEBUG),
            ((false, 2), tracing::Level::TRACE),
            ((false, 10), tracing::Level::TRACE),
        ];

        for ((quiet, verbose), expected) in test_cases {
            assert_eq!(
                level_for(verbose, quiet),
                expected,
                "Failed for quiet={}, verbose={}",
                quiet,
                verbose
            );
        }
    }

    #[test]
    fn test_unwritable_log_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("rowkeep.log");

        let error = init_logging(0, false, Some(&path)).unwrap_err();

        assert!(matches!(error, RowkeepError::Io { .. }));
    }

    #[test]
    fn test_log_file_is_appended_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rowkeep.log");

        for message in ["first run", "second run"] {
            let writer = open_log_file(&path).unwrap();
            let subscriber = build_subscriber(tracing::Level::INFO, writer, false);
            tracing::subscriber::with_default(subscriber, || {
                tracing::info!("{}", message);
                tracing::debug!("filtered at info");
            });
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().next().unwrap().contains("first run"));
        assert!(contents.lines().nth(1).unwrap().contains("second run"));
        assert!(!contents.contains("filtered at info"));
        assert!(!contents.contains('\u{1b}'));
    }
}
