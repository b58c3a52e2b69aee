//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and
//! production environments.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger from `RUST_LOG`, falling back to `level`.
pub fn init_logger(level: &str) {
    init_logger_with_file(level, None);
}

/// Initialize the logger with optional daily-rolling file output.
pub fn init_logger_with_file(level: &str, log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Add file output if a log dir is provided and exists
    if let Some(dir) = log_dir
        && dir.exists()
        && let Some(dir_str) = dir.to_str()
    {
        let file_appender = tracing_appender::rolling::daily(dir_str, "estoque-server");
        subscriber.with_writer(file_appender).init();
        return;
    }

    subscriber.init();
}
