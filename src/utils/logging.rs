//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the Smart Util application.

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer and must live as long as the
/// application.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let stdout_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    let guard = if config.directory.is_empty() {
        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .init();
        None
    } else {
        std::fs::create_dir_all(&config.directory)?;
        let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
        Some(guard)
    };

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log a completed card generation request
pub fn log_generation(user_id: i64, command: &str, bin: &str, count: usize, as_file: bool) {
    info!(
        user_id = user_id,
        command = command,
        bin = bin,
        count = count,
        as_file = as_file,
        "Cards generated"
    );
}

/// Log a request rejected by argument validation
pub fn log_rejected_request(user_id: i64, command: &str, reason: &str) {
    debug!(
        user_id = user_id,
        command = command,
        reason = reason,
        "Request rejected"
    );
}

/// Log security checks that refused a user
pub fn log_security_event(user_id: i64, event: &str, details: Option<&str>) {
    warn!(
        user_id = user_id,
        event = event,
        details = details,
        "Security check refused request"
    );
}
