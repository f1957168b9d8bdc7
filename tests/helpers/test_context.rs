//! Test context for unified test setup
//!
//! This module provides a unified test context that initializes the mock
//! Telegram server, a bot pointed at it and an in-memory application context.

use std::sync::Arc;

use smart_util::{config::Settings, state::AppContext, StateStorage};
use teloxide::Bot;

use super::telegram_mock::{TelegramMockServer, TEST_BOT_TOKEN};

/// Unified test context that manages all test components
pub struct TestContext {
    pub telegram_mock: TelegramMockServer,
    pub bot: Bot,
    pub app: AppContext,
}

impl TestContext {
    /// Create a new test context with default settings
    pub async fn new() -> Self {
        Self::with_settings(test_settings()).await
    }

    /// Create a new test context with custom settings
    pub async fn with_settings(settings: Settings) -> Self {
        // Initialize logging once
        let _ = tracing_subscriber::fmt::try_init();

        let telegram_mock = TelegramMockServer::new().await;
        telegram_mock.setup_default_mocks().await;

        let bot = Bot::new(TEST_BOT_TOKEN).set_api_url(
            telegram_mock
                .uri()
                .parse()
                .expect("mock server URI is a valid URL"),
        );

        let ttl = chrono::Duration::seconds(settings.session.ttl_seconds as i64);
        let storage = Arc::new(StateStorage::memory(ttl));
        let app = AppContext::new(settings, storage);

        Self {
            telegram_mock,
            bot,
            app,
        }
    }
}

/// Settings valid for tests: memory sessions and a small inline limit
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = TEST_BOT_TOKEN.to_string();
    settings.generator.inline_limit = 10;
    settings.logging.directory = String::new();
    settings
}
