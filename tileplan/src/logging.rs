//! Subscriber setup for tileplan sessions.
//!
//! - Writes to the configured log file (truncated at session start)
//! - Optionally mirrors to stdout
//! - Level from `RUST_LOG`, defaulting to info; the debug switch overrides it

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the non-blocking file writer alive. Dropping it flushes the log.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Output options for [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoggingOptions {
    /// Mirror records to stdout
    pub stdout: bool,
    /// Force debug level
    pub debug: bool,
}

/// Installs the global subscriber writing to `log_path`.
///
/// Creates the parent directory and truncates any previous log. Fails if
/// either step fails; panics only if a global subscriber is already set.
pub fn init_logging(log_path: &Path, options: LoggingOptions) -> Result<LoggingGuard, io::Error> {
    let (log_dir, log_file) = prepare_log_file(log_path)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = options.stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter(options.debug))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Creates the log directory and empties the log file.
///
/// Returns the directory and file name for the appender.
fn prepare_log_file(log_path: &Path) -> io::Result<(PathBuf, String)> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?
        .to_string();
    let dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    fs::create_dir_all(&dir)?;
    fs::write(dir.join(&file_name), "")?;
    Ok((dir, file_name))
}

fn env_filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
