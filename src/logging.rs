//! File-based logging.
//!
//! The terminal is taken by the display panel, so tracing output goes to a
//! daily rolling file instead of stdout/stderr.

use std::path::PathBuf;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR_FALLBACK: &str = ".logs";
const LOG_FILE_PREFIX: &str = "podbox";
const DEFAULT_FILTER: &str = "podbox=debug,warn";

/// Logs are written to `<data_local_dir>/podbox/logs/podbox.YYYY-MM-DD`.
/// `RUST_LOG` overrides the default filter.
///
/// The returned guard flushes the writer when dropped and must be held for
/// the lifetime of the process.
pub fn init_logging() -> anyhow::Result<WorkerGuard> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(dir = %log_dir.display(), "Logging initialized");

    Ok(guard)
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("podbox").join("logs"))
        .unwrap_or_else(|| PathBuf::from(LOG_DIR_FALLBACK))
}
