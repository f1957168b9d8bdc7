//! Integration tests for session storage and the guarded request pipeline

mod helpers;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use assert_matches::assert_matches;
use serial_test::serial;
use teloxide::types::ChatId;

use helpers::*;
use smart_util::{
    handlers::commands::{dispatch_command, Command},
    middleware::spawn_guarded,
    state::{Session, SessionKey},
    SmartUtilError, StateStorage,
};

const BANNED_USER_ID: i64 = 666;

fn counting_handler(counter: Arc<AtomicUsize>) -> impl std::future::Future<Output = smart_util::Result<()>> {
    async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
#[serial]
async fn test_banned_user_never_reaches_handler() {
    let mut settings = test_settings();
    settings.bot.banned_ids = vec![BANNED_USER_ID];
    let ctx = TestContext::with_settings(settings).await;
    let counter = Arc::new(AtomicUsize::new(0));

    spawn_guarded(
        ctx.bot.clone(),
        ChatId(BANNED_USER_ID),
        BANNED_USER_ID,
        ctx.app.guard.clone(),
        ctx.app.logging.clone(),
        "gen",
        counting_handler(counter.clone()),
    )
    .await
    .unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 0);
    let bodies = ctx.telegram_mock.json_bodies("sendMessage").await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0]["text"].as_str().unwrap().starts_with("🚫"));
}

#[tokio::test]
#[serial]
async fn test_rate_limited_user_is_told_to_wait() {
    let mut settings = test_settings();
    settings.rate_limit.max_requests = 2;
    settings.rate_limit.burst_allowance = 0;
    let ctx = TestContext::with_settings(settings).await;
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        spawn_guarded(
            ctx.bot.clone(),
            ChatId(TEST_CHAT_ID),
            TEST_USER_ID,
            ctx.app.guard.clone(),
            ctx.app.logging.clone(),
            "gen",
            counting_handler(counter.clone()),
        )
        .await
        .unwrap();
    }

    assert_eq!(counter.load(Ordering::SeqCst), 2);
    let bodies = ctx.telegram_mock.json_bodies("sendMessage").await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0]["text"].as_str().unwrap().contains("Too many requests"));

    let status = ctx.app.guard.rate_limit().get_rate_limit_status(TEST_USER_ID);
    assert_eq!(status.remaining, 0);
}

#[tokio::test]
#[serial]
async fn test_admins_bypass_ban_and_rate_limit() {
    let mut settings = test_settings();
    settings.bot.admin_ids = vec![TEST_USER_ID];
    settings.rate_limit.max_requests = 1;
    settings.rate_limit.burst_allowance = 0;
    let ctx = TestContext::with_settings(settings).await;

    for _ in 0..5 {
        ctx.app.guard.check(TEST_USER_ID).unwrap();
    }
    assert!(ctx.app.guard.auth().is_admin(TEST_USER_ID));
}

#[tokio::test]
#[serial]
async fn test_sessions_are_scoped_per_chat_and_user() {
    let storage = StateStorage::memory(chrono::Duration::minutes(5));
    let key = SessionKey::new(-100, 7);

    let mut session = storage.load_or_new(key).await.unwrap();
    session.set("note", &"hello", storage.ttl()).unwrap();
    storage.save(&session).await.unwrap();

    let loaded = storage.load(key).await.unwrap().unwrap();
    assert_eq!(loaded.get::<String>("note").unwrap().as_deref(), Some("hello"));

    assert!(storage.load(SessionKey::new(-100, 8)).await.unwrap().is_none());
    assert!(storage.load(SessionKey::new(-101, 7)).await.unwrap().is_none());

    assert!(storage.delete(key).await.unwrap());
    assert!(storage.load(key).await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn test_expired_sessions_are_evicted() {
    let storage = StateStorage::memory(chrono::Duration::minutes(5));

    let expired = Session::new(SessionKey::new(1, 1), chrono::Duration::seconds(-1));
    let live = Session::new(SessionKey::new(2, 2), chrono::Duration::minutes(5));
    storage.save(&expired).await.unwrap();
    storage.save(&live).await.unwrap();

    let stats = storage.stats().await.unwrap();
    assert_eq!(stats.active_sessions, 1);
    assert_eq!(stats.expired_sessions, 1);

    assert_eq!(storage.cleanup_expired().await.unwrap(), 1);
    assert!(storage.load(SessionKey::new(1, 1)).await.unwrap().is_none());
    assert!(storage.load(SessionKey::new(2, 2)).await.unwrap().is_some());
}

#[tokio::test]
#[serial]
async fn test_guard_error_kinds() {
    let mut settings = test_settings();
    settings.bot.banned_ids = vec![BANNED_USER_ID];
    let ctx = TestContext::with_settings(settings).await;

    assert_matches!(
        ctx.app.guard.check(BANNED_USER_ID),
        Err(SmartUtilError::PermissionDenied(_))
    );
    assert!(ctx.app.guard.check(TEST_USER_ID).is_ok());
}

#[tokio::test]
#[serial]
async fn test_stats_command_for_admin() {
    let mut settings = test_settings();
    settings.bot.admin_ids = vec![TEST_USER_ID];
    let ctx = TestContext::with_settings(settings).await;

    let mut session = ctx.app.storage.load_or_new(SessionKey::new(TEST_CHAT_ID, 77)).await.unwrap();
    session.set("note", &1, ctx.app.storage.ttl()).unwrap();
    ctx.app.storage.save(&session).await.unwrap();
    ctx.app.guard.check(77).unwrap();

    dispatch_command(
        ctx.bot.clone(),
        ChatId(TEST_CHAT_ID),
        TEST_USER_ID,
        Command::Stats("77".to_string()),
        ctx.app.clone(),
    )
    .await
    .unwrap();

    let bodies = ctx.telegram_mock.json_bodies("sendMessage").await;
    assert_eq!(bodies.len(), 1);
    let text = bodies[0]["text"].as_str().unwrap();
    assert!(text.contains("<b>Session backend ⇾</b> memory"));
    assert!(text.contains("<b>Active sessions ⇾</b> 1"));
    assert!(text.contains("<b>Requests in window ⇾</b> 1/20"));
}

#[tokio::test]
#[serial]
async fn test_stats_command_refuses_regular_users() {
    let ctx = TestContext::new().await;

    let result = dispatch_command(
        ctx.bot.clone(),
        ChatId(TEST_CHAT_ID),
        TEST_USER_ID,
        Command::Stats(String::new()),
        ctx.app.clone(),
    )
    .await;

    assert_matches!(result, Err(SmartUtilError::PermissionDenied(_)));
    assert!(ctx.telegram_mock.requests_for("sendMessage").await.is_empty());
}
