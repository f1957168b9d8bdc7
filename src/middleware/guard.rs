//! Request pipeline
//!
//! Every update goes through the same explicit chain:
//! spawn a task, run the security checks (ban list, then rate limit), and only
//! then run the handler. Failures at any step are reported to the chat.

use std::future::Future;

use teloxide::{prelude::*, types::ParseMode};
use tokio::task::JoinHandle;
use tracing::warn;

use super::auth::AuthMiddleware;
use super::logging::LoggingMiddleware;
use super::rate_limit::{RateLimitConfig, RateLimitMiddleware};
use crate::config::Settings;
use crate::utils::errors::Result;

/// Security checks run before every handler
#[derive(Clone)]
pub struct Guard {
    auth: AuthMiddleware,
    rate_limit: RateLimitMiddleware,
}

impl Guard {
    pub fn new(auth: AuthMiddleware, rate_limit: RateLimitMiddleware) -> Self {
        Self { auth, rate_limit }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let auth = AuthMiddleware::from_config(&settings.bot);
        let rate_limit = RateLimitMiddleware::new(
            RateLimitConfig::from(&settings.rate_limit),
            settings.rate_limit.admin_exempt,
            auth.admin_ids(),
        );
        Self::new(auth, rate_limit)
    }

    /// Ban check first so banned users do not consume rate limit budget
    pub fn check(&self, user_id: i64) -> Result<()> {
        self.auth.check_access(user_id)?;
        self.rate_limit.check_rate_limit(user_id)
    }

    pub fn auth(&self) -> &AuthMiddleware {
        &self.auth
    }

    pub fn rate_limit(&self) -> &RateLimitMiddleware {
        &self.rate_limit
    }
}

/// Run `handler` in its own task once `guard` accepts `user_id`.
///
/// The handler future is not polled before the checks pass. Rejections and
/// handler errors are sent to `chat_id` as HTML.
pub fn spawn_guarded<Fut>(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    guard: Guard,
    logging: LoggingMiddleware,
    operation: &'static str,
    handler: Fut,
) -> JoinHandle<()>
where
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = guard.check(user_id) {
            logging.log_error(&e, operation, Some(user_id));
            notify(&bot, chat_id, &e.user_message()).await;
            return;
        }

        let tracker = logging.create_performance_span(operation);
        let result = handler.await;
        if let Some(tracker) = tracker {
            tracker.complete(result.is_ok());
        }

        if let Err(e) = result {
            logging.log_error(&e, operation, Some(user_id));
            notify(&bot, chat_id, &e.user_message()).await;
        }
    })
}

async fn notify(bot: &Bot, chat_id: ChatId, text: &str) {
    if let Err(e) = bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await
    {
        warn!(chat_id = chat_id.0, error = %e, "Failed to deliver error message");
    }
}
