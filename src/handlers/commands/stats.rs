//! /stats command handler (admin only)

use teloxide::prelude::*;

use super::send_html;
use crate::middleware::rate_limit::RateLimitStatus;
use crate::state::{AppContext, StorageStats};
use crate::utils::errors::{Result, SmartUtilError};

pub const USAGE: &str = "<b>Usage:</b> <code>/stats [USER_ID]</code> (admins only)\n\
    Shows session storage figures and, for USER_ID, the current rate limit window.";

/// Handle /stats command
pub async fn handle_stats(bot: Bot, chat_id: ChatId, user_id: i64, args: String, ctx: AppContext) -> Result<()> {
    if !ctx.guard.auth().is_admin(user_id) {
        return Err(SmartUtilError::PermissionDenied(
            "Statistics are available to admins only.".to_string(),
        ));
    }

    let target = match args.trim() {
        "" => None,
        raw => Some(
            raw.parse::<i64>()
                .map_err(|_| SmartUtilError::InvalidInput(format!("'{}' is not a user id", raw)))?,
        ),
    };

    let stats = ctx.storage.stats().await?;
    let rate_limit = target.map(|id| (id, ctx.guard.rate_limit().get_rate_limit_status(id)));

    send_html(&bot, chat_id, format_stats(&stats, rate_limit)).await
}

pub fn format_stats(stats: &StorageStats, rate_limit: Option<(i64, RateLimitStatus)>) -> String {
    let mut text = format!(
        "📊 <b>Statistics</b>\n\n<b>Session backend ⇾</b> {}\n<b>Active sessions ⇾</b> {}\n<b>Expired sessions ⇾</b> {}",
        stats.backend, stats.active_sessions, stats.expired_sessions
    );

    if let Some((user_id, status)) = rate_limit {
        text.push_str(&format!(
            "\n\n<b>User ⇾</b> <code>{}</code>\n<b>Requests in window ⇾</b> {}/{}\n<b>Burst remaining ⇾</b> {}",
            user_id, status.current_requests, status.max_requests, status.burst_remaining
        ));
    }
    text
}
