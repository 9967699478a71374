//! Logging setup.
//!
//! Structured `tracing` output to both a log file (truncated at start) and
//! stdout. Filtering follows `RUST_LOG`, defaulting to `info`.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Keeps the file writer alive. Dropping it flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Installs the global subscriber.
///
/// Creates `log_dir` if needed and clears `log_file` inside it.
///
/// # Errors
///
/// The log directory cannot be created, the log file cannot be truncated, or
/// a global subscriber is already installed.
pub fn init_logging(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Filter from `RUST_LOG`, or [`DEFAULT_LOG_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Default log directory (`~/.mosaiclayer/logs`).
pub fn default_log_dir() -> std::path::PathBuf {
    crate::config::config_directory().join("logs")
}

/// Default log file name.
pub fn default_log_file() -> &'static str {
    "mosaiclayer.log"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert!(default_log_dir().ends_with(".mosaiclayer/logs"));
        assert_eq!(default_log_file(), "mosaiclayer.log");
    }

    // The only test in this crate that installs the global subscriber.
    #[test]
    fn test_init_logging_writes_to_fresh_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let log_dir = temp.path().join("logs");
        fs::create_dir_all(&log_dir).unwrap();
        fs::write(log_dir.join("test.log"), "stale line from last run\n").unwrap();

        let guard = init_logging(&log_dir, "test.log").unwrap();
        tracing::error!(target: "mosaiclayer::logging", "logging smoke marker");
        drop(guard);

        let content = fs::read_to_string(log_dir.join("test.log")).unwrap();
        assert!(!content.contains("stale line"));
        assert!(content.contains("logging smoke marker"));

        // A second global subscriber is refused rather than panicking
        let other = temp.path().join("other");
        assert!(init_logging(&other, "again.log").is_err());
    }
}
