//! Authentication middleware
//!
//! Admin lookup and the ban list checked before any handler runs.

use std::collections::HashSet;

use tracing::debug;

use crate::config::BotConfig;
use crate::utils::errors::{Result, SmartUtilError};
use crate::utils::logging::log_security_event;

/// Authentication middleware
#[derive(Debug, Clone, Default)]
pub struct AuthMiddleware {
    admin_ids: HashSet<i64>,
    banned_ids: HashSet<i64>,
}

impl AuthMiddleware {
    pub fn new(admin_ids: impl IntoIterator<Item = i64>, banned_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            admin_ids: admin_ids.into_iter().collect(),
            banned_ids: banned_ids.into_iter().collect(),
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(config.admin_ids.iter().copied(), config.banned_ids.iter().copied())
    }

    /// Check if user is an admin
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    /// Admins are never treated as banned
    pub fn is_banned(&self, user_id: i64) -> bool {
        !self.is_admin(user_id) && self.banned_ids.contains(&user_id)
    }

    /// Refuse banned users
    pub fn check_access(&self, user_id: i64) -> Result<()> {
        if self.is_banned(user_id) {
            log_security_event(user_id, "banned_user", None);
            return Err(SmartUtilError::PermissionDenied(
                "You are banned from using this bot.".to_string(),
            ));
        }

        debug!(user_id = user_id, "Access check passed");
        Ok(())
    }

    pub fn admin_ids(&self) -> Vec<i64> {
        self.admin_ids.iter().copied().collect()
    }
}
