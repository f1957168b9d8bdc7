//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::settings::SessionBackend;
use super::Settings;
use crate::utils::errors::{Result, SmartUtilError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_generator_config(&settings.generator)?;
    validate_session_config(&settings.session)?;
    validate_rate_limit_config(&settings.rate_limit)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(SmartUtilError::Config("Bot token is required".to_string()));
    }

    if let Some(id) = config.banned_ids.iter().find(|id| config.admin_ids.contains(id)) {
        return Err(SmartUtilError::Config(format!(
            "User {} is listed as both admin and banned",
            id
        )));
    }

    Ok(())
}

/// Validate card generation policy
fn validate_generator_config(config: &super::GeneratorConfig) -> Result<()> {
    if config.max_amount == 0 {
        return Err(SmartUtilError::Config(
            "Max amount must be greater than 0".to_string(),
        ));
    }

    if config.default_amount == 0 || config.default_amount > config.max_amount {
        return Err(SmartUtilError::Config(
            "Default amount must be between 1 and max amount".to_string(),
        ));
    }

    if config.inline_limit == 0 {
        return Err(SmartUtilError::Config(
            "Inline limit must be greater than 0".to_string(),
        ));
    }

    if config.max_bins == 0 {
        return Err(SmartUtilError::Config(
            "Max BINs must be greater than 0".to_string(),
        ));
    }

    if config.year_span < 0 {
        return Err(SmartUtilError::Config(
            "Year span cannot be negative".to_string(),
        ));
    }

    if !(6..=15).contains(&config.extrapolate_keep_digits) {
        return Err(SmartUtilError::Config(
            "Extrapolation must keep between 6 and 15 digits".to_string(),
        ));
    }

    Ok(())
}

/// Validate session store configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if config.backend == SessionBackend::Redis && config.redis_url.is_empty() {
        return Err(SmartUtilError::Config(
            "Redis URL is required for the redis session backend".to_string(),
        ));
    }

    if config.ttl_seconds == 0 {
        return Err(SmartUtilError::Config(
            "Session TTL must be greater than 0".to_string(),
        ));
    }

    if config.cleanup_interval_seconds == 0 {
        return Err(SmartUtilError::Config(
            "Session cleanup interval must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate rate limiting configuration
fn validate_rate_limit_config(config: &super::RateLimitSettings) -> Result<()> {
    if config.max_requests == 0 {
        return Err(SmartUtilError::Config(
            "Rate limit max requests must be greater than 0".to_string(),
        ));
    }

    if config.window_seconds == 0 {
        return Err(SmartUtilError::Config(
            "Rate limit window must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SmartUtilError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SmartUtilError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    if !config.directory.is_empty() && config.file_prefix.is_empty() {
        return Err(SmartUtilError::Config(
            "Log file prefix is required when a log directory is set".to_string(),
        ));
    }

    Ok(())
}
