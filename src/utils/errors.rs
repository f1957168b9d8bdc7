//! Error handling for Smart Util
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for Smart Util application
#[derive(Error, Debug)]
pub enum SmartUtilError {
    #[error("Card error: {0}")]
    Card(#[from] CardError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised by the card algorithms and their argument validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("invalid BIN: {0}")]
    InvalidBin(String),

    #[error("BIN is {length} digits long but cards of this network have {max}")]
    BinTooLong { length: usize, max: usize },

    #[error("BIN already fills all {length} digits, no room for a check digit")]
    NoRoomForCheckDigit { length: usize },

    #[error("invalid month '{0}', expected 01-12")]
    InvalidMonth(String),

    #[error("invalid year '{0}', expected YY or YYYY")]
    InvalidYear(String),

    #[error("year {year} is in the past (current year is {current})")]
    ExpiredYear { year: i32, current: i32 },

    #[error("invalid CVV '{0}'")]
    InvalidCvv(String),

    #[error("CVV must be {expected} digits for this network, got {actual}")]
    CvvLengthMismatch { expected: usize, actual: usize },

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("amount must be between 1 and {max}, got {requested}")]
    InvalidCount { requested: usize, max: usize },

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("invalid card number: {0}")]
    InvalidNumber(String),

    #[error("pattern can only produce {available} unique numbers, {requested} requested")]
    ExhaustedPattern { requested: usize, available: u64 },

    #[error("card generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type alias for Smart Util operations
pub type Result<T> = std::result::Result<T, SmartUtilError>;

impl SmartUtilError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SmartUtilError::Card(CardError::GenerationFailed(_)) => ErrorSeverity::Error,
            SmartUtilError::Card(_) => ErrorSeverity::Info,
            SmartUtilError::Config(_) | SmartUtilError::ConfigLoad(_) => ErrorSeverity::Critical,
            SmartUtilError::PermissionDenied(_) => ErrorSeverity::Warning,
            SmartUtilError::RateLimitExceeded => ErrorSeverity::Warning,
            SmartUtilError::SessionExpired => ErrorSeverity::Info,
            SmartUtilError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTML text shown to the chat user for this error
    pub fn user_message(&self) -> String {
        match self {
            SmartUtilError::Card(e) => format!("❌ <b>{}</b>", html_escape::encode_text(&e.to_string())),
            SmartUtilError::InvalidInput(msg) => format!("❌ <b>{}</b>", html_escape::encode_text(msg)),
            SmartUtilError::PermissionDenied(msg) => format!("🚫 {}", html_escape::encode_text(msg)),
            SmartUtilError::RateLimitExceeded => {
                "⏳ Too many requests. Please wait a minute and try again.".to_string()
            }
            SmartUtilError::SessionExpired => {
                "⌛ This session has expired. Send the command again.".to_string()
            }
            _ => "⚠️ Something went wrong. Please try again later.".to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
