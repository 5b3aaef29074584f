use std::path::Path;

use eyre::{Result, WrapErr};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Log files are named `main.<date>.log`.
pub const LOG_FILE_PREFIX: &str = "main";
/// Log file extension.
pub const LOG_FILE_SUFFIX: &str = "log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Daily rolling appender in `dir` keeping at most `max_files` files.
pub fn file_appender(dir: &Path, max_files: usize) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(max_files.max(1))
        .build(dir)
        .wrap_err_with(|| format!("failed to open log directory {}", dir.display()))
}

/// Install the global subscriber logging to stdout and to rotating files in `dir`.
///
/// The returned guard flushes the file writer on drop and must be held until exit.
pub fn init(dir: &Path, max_files: usize) -> Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(file_appender(dir, max_files)?);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer())
        .with(fmt::layer().with_writer(writer))
        .try_init()
        .wrap_err("failed to install tracing subscriber")?;

    Ok(guard)
}

/// Install a stdout-only subscriber, for failures before the log directory is known.
///
/// Does nothing if a subscriber is already installed.
pub fn init_console() {
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter()).try_init();
}
