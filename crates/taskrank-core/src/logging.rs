//! Logging infrastructure for TaskRank.
//!
//! Structured logging using the `tracing` ecosystem:
//!
//! - JSON lines written to `~/.taskrank/logs/taskrank.log` (daily rotation)
//! - Compact human-readable output on stderr, keeping stdout free for reports
//! - `-v` flag support for debug-level logging
//!
//! ## Example
//!
//! ```no_run
//! use taskrank_core::logging;
//!
//! let _guard = logging::init_logging(None, false).expect("logging init");
//!
//! tracing::info!("TaskRank started");
//! tracing::debug!(tasks = 12, "ranking batch");
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{Result, TaskRankError};

/// Guard that must be held to ensure log flushing on shutdown.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the TaskRank logging system.
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.taskrank/logs/`
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
///
/// # Returns
///
/// A [`LogGuard`] that must be held for the application lifetime.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| TaskRankError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "taskrank.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| TaskRankError::internal(format!("logging already initialized: {e}")))?;

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Filter used when `RUST_LOG` is unset. HTTP request spans from
/// `tower_http` follow the same level as the TaskRank crates.
fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("taskrank={level},tower_http={level}")
}

/// Initialize minimal console-only logging for tests.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Get the default log directory path.
///
/// Returns `~/.taskrank/logs/`
pub fn default_log_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").map_err(|_| TaskRankError::Internal {
        message: "HOME environment variable not set".into(),
    })?;

    Ok(PathBuf::from(home).join(".taskrank").join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_log_dir() {
        // SAFETY: serialized with every other test touching HOME
        unsafe { std::env::set_var("HOME", "/tmp/test-home") };
        let dir = default_log_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/test-home/.taskrank/logs"));
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false), "taskrank=info,tower_http=info");
        assert_eq!(default_directives(true), "taskrank=debug,tower_http=debug");
    }

    #[test]
    #[serial]
    fn test_init_logging_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("logs");
        // a global subscriber may already be installed by another test
        let _ = init_logging(Some(dir.clone()), true);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_init_test_logging() {
        init_test_logging();
        init_test_logging();
    }
}
