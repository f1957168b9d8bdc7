//! Logging middleware
//!
//! This module provides logging middleware for tracking bot interactions,
//! handler durations, and errors.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, instrument, warn, Span};

use crate::utils::errors::{ErrorSeverity, SmartUtilError};
use crate::utils::logging::log_rejected_request;

/// Handlers slower than this are reported
const SLOW_OPERATION: Duration = Duration::from_secs(2);

/// Logging middleware for bot interactions
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    log_user_interactions: bool,
    log_performance: bool,
}

impl LoggingMiddleware {
    /// Create a new LoggingMiddleware instance
    pub fn new(log_user_interactions: bool, log_performance: bool) -> Self {
        Self {
            log_user_interactions,
            log_performance,
        }
    }

    /// Log command execution
    #[instrument(skip(self))]
    pub fn log_command(&self, user_id: i64, chat_id: i64, command: &str, args: &str) {
        if !self.log_user_interactions {
            return;
        }

        info!(
            user_id = user_id,
            chat_id = chat_id,
            command = command,
            args = args,
            "Command received"
        );
    }

    /// Log callback query
    pub fn log_callback(&self, user_id: i64, data: &str) {
        if !self.log_user_interactions {
            return;
        }

        info!(user_id = user_id, callback_data = data, "Callback query received");
    }

    /// Log handler error; user-facing validation errors stay at debug level
    pub fn log_error(&self, error: &SmartUtilError, context: &str, user_id: Option<i64>) {
        match error.severity() {
            ErrorSeverity::Info => match user_id {
                Some(user_id) => log_rejected_request(user_id, context, &error.to_string()),
                None => debug!(error = %error, context = context, "Request rejected"),
            },
            ErrorSeverity::Warning => warn!(error = %error, context = context, user_id = user_id, "Request refused"),
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                error!(error = %error, context = context, user_id = user_id, "Error occurred")
            }
        }
    }

    /// Create a performance tracking span
    pub fn create_performance_span(&self, operation: &str) -> Option<PerformanceTracker> {
        if self.log_performance {
            Some(PerformanceTracker::new(operation.to_string()))
        } else {
            None
        }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Performance tracker for measuring operation duration
pub struct PerformanceTracker {
    operation: String,
    start_time: Instant,
    _span: Span,
}

impl PerformanceTracker {
    fn new(operation: String) -> Self {
        let span = tracing::info_span!("performance", operation = %operation);

        Self {
            operation,
            start_time: Instant::now(),
            _span: span,
        }
    }

    /// Complete the performance tracking and log the result
    pub fn complete(self, success: bool) -> Duration {
        let duration = self.start_time.elapsed();
        let duration_ms = duration.as_millis() as u64;

        if success {
            debug!(operation = %self.operation, duration_ms = duration_ms, "Operation completed successfully");
        } else {
            warn!(operation = %self.operation, duration_ms = duration_ms, "Operation failed");
        }

        if duration > SLOW_OPERATION {
            warn!(operation = %self.operation, duration_ms = duration_ms, "Slow operation detected");
        }

        duration
    }
}
