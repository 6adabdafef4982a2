//! File logging setup.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Log file name prefix inside the logs directory; the appender adds a date suffix.
pub const LOG_FILE_NAME: &str = "cassview.log";

/// Installs the global subscriber, writing to a daily log file under `dir`.
///
/// `RUST_LOG` takes precedence over `default_filter`. Keep the returned guard
/// alive for the life of the process or buffered lines are lost.
pub fn init(dir: &Path, default_filter: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    // Single test: the global subscriber can only be installed once per process.
    #[test]
    fn test_init_creates_log_dir_and_installs_once() {
        let home = tempdir().unwrap();
        let dir = home.path().join("logs");

        let guard = init(&dir, "debug").unwrap();
        assert!(dir.is_dir());
        tracing::info!("log line");
        drop(guard);
        let files: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(files.iter().any(|name| name.starts_with(LOG_FILE_NAME)));

        let err = init(&dir, "debug").unwrap_err();
        assert!(err.to_string().contains("Failed to install log subscriber"));
    }
}
