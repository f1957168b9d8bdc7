//! Rate limiting middleware
//!
//! This module provides rate limiting functionality to prevent abuse
//! and ensure fair usage of the bot's resources.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::RateLimitSettings;
use crate::utils::errors::{Result, SmartUtilError};
use crate::utils::logging::log_security_event;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window_duration: Duration,
    /// Burst allowance (extra requests allowed in short bursts)
    pub burst_allowance: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window_duration: Duration::from_secs(60),
            burst_allowance: 5,
        }
    }
}

impl From<&RateLimitSettings> for RateLimitConfig {
    fn from(settings: &RateLimitSettings) -> Self {
        Self {
            max_requests: settings.max_requests,
            window_duration: Duration::from_secs(settings.window_seconds),
            burst_allowance: settings.burst_allowance,
        }
    }
}

/// Rate limit entry for tracking user requests
#[derive(Debug, Clone)]
struct RateLimitEntry {
    requests: Vec<Instant>,
    burst_used: u32,
    last_reset: Instant,
}

impl RateLimitEntry {
    fn new() -> Self {
        Self {
            requests: Vec::new(),
            burst_used: 0,
            last_reset: Instant::now(),
        }
    }

    /// Clean up old requests outside the window
    fn cleanup(&mut self, window_duration: Duration) {
        let now = Instant::now();
        self.requests
            .retain(|&time| now.duration_since(time) < window_duration);

        if self.last_reset.elapsed() > window_duration {
            self.burst_used = 0;
            self.last_reset = now;
        }
    }

    /// Check if request is allowed
    fn is_allowed(&mut self, config: &RateLimitConfig) -> bool {
        self.cleanup(config.window_duration);

        if (self.requests.len() as u32) < config.max_requests {
            return true;
        }

        if self.burst_used < config.burst_allowance {
            self.burst_used += 1;
            return true;
        }

        false
    }

    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }
}

/// Rate limiting middleware
#[derive(Clone)]
pub struct RateLimitMiddleware {
    config: RateLimitConfig,
    entries: Arc<Mutex<HashMap<i64, RateLimitEntry>>>,
    admin_exempt: bool,
    admin_ids: Vec<i64>,
}

impl RateLimitMiddleware {
    /// Create a new RateLimitMiddleware instance
    pub fn new(config: RateLimitConfig, admin_exempt: bool, admin_ids: Vec<i64>) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
            admin_exempt,
            admin_ids,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<i64, RateLimitEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Check if user is rate limited, recording the request when it is allowed
    pub fn check_rate_limit(&self, user_id: i64) -> Result<()> {
        if self.admin_exempt && self.admin_ids.contains(&user_id) {
            debug!(user_id = user_id, "Admin user exempt from rate limiting");
            return Ok(());
        }

        let mut entries = self.entries();
        let entry = entries.entry(user_id).or_insert_with(RateLimitEntry::new);

        if entry.is_allowed(&self.config) {
            entry.record_request();
            debug!(user_id = user_id, "Rate limit check passed");
            Ok(())
        } else {
            log_security_event(user_id, "rate_limit_exceeded", None);
            Err(SmartUtilError::RateLimitExceeded)
        }
    }

    /// Get current rate limit status for user
    pub fn get_rate_limit_status(&self, user_id: i64) -> RateLimitStatus {
        let entries = self.entries();

        match entries.get(&user_id) {
            Some(entry) => {
                let mut entry = entry.clone();
                entry.cleanup(self.config.window_duration);

                let current_requests = entry.requests.len() as u32;
                RateLimitStatus {
                    current_requests,
                    max_requests: self.config.max_requests,
                    remaining: self.config.max_requests.saturating_sub(current_requests),
                    burst_remaining: self.config.burst_allowance.saturating_sub(entry.burst_used),
                }
            }
            None => RateLimitStatus {
                current_requests: 0,
                max_requests: self.config.max_requests,
                remaining: self.config.max_requests,
                burst_remaining: self.config.burst_allowance,
            },
        }
    }

    /// Cleanup old entries (should be called periodically)
    pub fn cleanup_old_entries(&self) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        // Keep entries for 2x window duration
        let keep_for = self.config.window_duration * 2;

        entries.retain(|_, entry| {
            entry
                .requests
                .iter()
                .any(|&time| time.elapsed() < keep_for)
        });

        let removed = before - entries.len();
        debug!(remaining_entries = entries.len(), removed = removed, "Cleaned up old rate limit entries");
        removed
    }
}

impl Default for RateLimitMiddleware {
    fn default() -> Self {
        Self::new(RateLimitConfig::default(), true, vec![])
    }
}

/// Rate limit status for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub current_requests: u32,
    pub max_requests: u32,
    pub remaining: u32,
    pub burst_remaining: u32,
}
