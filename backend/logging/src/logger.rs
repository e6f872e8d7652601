//! Structured Logger
//!
//! Human-readable output on stderr (stdout belongs to the operator console)
//! and a daily-rotated NDJSON file written off-thread.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Base name of the rolling log file (`magpie.log.YYYY-MM-DD`).
pub const LOG_FILE_NAME: &str = "magpie.log";

/// Initialize the global structured logger.
///
/// `RUST_LOG` takes precedence over `level`. Keep the returned guard alive
/// for the lifetime of the process or buffered file lines are lost.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer().json().with_writer(file_writer).with_ansi(false);
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // A second init (tests, embedding hosts) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    guard
}
