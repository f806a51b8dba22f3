//! Logging Infrastructure
//!
//! Structured logging setup for development (pretty text) and production
//! (JSON lines, optionally to a daily-rolling file).

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with optional JSON format and file output
///
/// `RUST_LOG` wins over `log_level` when set. File output is only used when
/// `log_dir` already exists. Calling this twice is harmless (tests do).
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir
        .filter(|dir| dir.exists())
        .map(|dir| tracing_appender::rolling::daily(dir, "tab-server"));

    let result = match (json, file_appender) {
        (true, Some(writer)) => builder.json().with_writer(writer).try_init(),
        (true, None) => builder.json().try_init(),
        (false, Some(writer)) => builder.with_ansi(false).with_writer(writer).try_init(),
        (false, None) => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}
