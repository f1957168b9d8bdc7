//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

use crate::card::GenerationLimits;

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub generator: GeneratorConfig,
    pub session: SessionConfig,
    pub rate_limit: RateLimitSettings,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    pub admin_ids: Vec<i64>,
    /// Users refused by the security check
    pub banned_ids: Vec<i64>,
}

/// Card generation policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    pub default_amount: usize,
    pub max_amount: usize,
    /// Results above this count are sent as a text file
    pub inline_limit: usize,
    /// Maximum BINs accepted by `/mgen`
    pub max_bins: usize,
    pub year_span: i32,
    pub extrapolate_keep_digits: usize,
}

impl GeneratorConfig {
    pub fn limits(&self) -> GenerationLimits {
        GenerationLimits {
            max_count: self.max_amount,
            year_span: self.year_span,
        }
    }
}

/// Session store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    Redis,
}

/// Session store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    pub redis_url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
    pub cleanup_interval_seconds: u64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_seconds: u64,
    pub burst_allowance: u32,
    pub admin_exempt: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when empty
    pub directory: String,
    pub file_prefix: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Environment keys use the `SMARTUTIL` prefix and `__` between sections,
    /// e.g. `SMARTUTIL_BOT__TOKEN`.
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("SMARTUTIL")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("bot.admin_ids")
                    .with_list_parse_key("bot.banned_ids")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::SmartUtilError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                admin_ids: vec![],
                banned_ids: vec![],
            },
            generator: GeneratorConfig {
                default_amount: 10,
                max_amount: 5000,
                inline_limit: 10,
                max_bins: 20,
                year_span: 5,
                extrapolate_keep_digits: 12,
            },
            session: SessionConfig {
                backend: SessionBackend::Memory,
                redis_url: "redis://localhost:6379".to_string(),
                prefix: "smartutil:".to_string(),
                ttl_seconds: 3600,
                cleanup_interval_seconds: 300,
            },
            rate_limit: RateLimitSettings {
                max_requests: 20,
                window_seconds: 60,
                burst_allowance: 5,
                admin_exempt: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "logs".to_string(),
                file_prefix: "smartutil.log".to_string(),
            },
        }
    }
}
