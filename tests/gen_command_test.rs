//! Integration tests for the card commands against a mocked Bot API

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;
use teloxide::types::{CallbackQuery, ChatId};

use helpers::*;
use smart_util::{
    card::{is_luhn_valid, GenRequest},
    handlers::commands::{dispatch_command, gen, Command},
    handlers::callbacks::regenerate::handle_regenerate,
    middleware::spawn_guarded,
    state::SessionKey,
    CardError, SmartUtilError,
};

/// Card lines (`number|MM|YYYY|CVV`) found in a reply or an uploaded file
fn card_lines(text: &str, bin: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_start_matches("<code>").trim_end_matches("</code>"))
        .filter(|line| line.starts_with(bin) && line.contains('|'))
        .map(str::to_string)
        .collect()
}

async fn run(ctx: &TestContext, cmd: Command) -> smart_util::Result<()> {
    dispatch_command(
        ctx.bot.clone(),
        ChatId(TEST_CHAT_ID),
        TEST_USER_ID,
        cmd,
        ctx.app.clone(),
    )
    .await
}

#[tokio::test]
#[serial]
async fn test_gen_small_batch_is_sent_inline() {
    let ctx = TestContext::new().await;

    run(&ctx, Command::Gen("400000 5".to_string())).await.unwrap();

    let bodies = ctx.telegram_mock.json_bodies("sendMessage").await;
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["parse_mode"], "HTML");
    assert_eq!(body["reply_markup"]["inline_keyboard"][0][0]["callback_data"], "regen");

    let cards = card_lines(body["text"].as_str().unwrap(), "400000");
    assert_eq!(cards.len(), 5);
    for card in &cards {
        let number = card.split('|').next().unwrap();
        assert_eq!(number.len(), 16);
        assert!(is_luhn_valid(number));
    }

    assert!(ctx.telegram_mock.requests_for("sendDocument").await.is_empty());

    let session = ctx
        .app
        .storage
        .load(SessionKey::new(TEST_CHAT_ID, TEST_USER_ID))
        .await
        .unwrap()
        .expect("inline generation stores the request");
    let stored: GenRequest = session.get(gen::SESSION_LAST_GEN).unwrap().unwrap();
    assert_eq!(stored.bin, "400000");
    assert_eq!(stored.amount, 5);
}

#[tokio::test]
#[serial]
async fn test_gen_large_batch_is_sent_as_file() {
    let ctx = TestContext::new().await;

    run(&ctx, Command::Gen("400000 25".to_string())).await.unwrap();

    assert!(ctx.telegram_mock.requests_for("sendMessage").await.is_empty());
    let uploads = ctx.telegram_mock.raw_bodies("sendDocument").await;
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].contains("400000_x25.txt"));
    assert_eq!(card_lines(&uploads[0], "400000").len(), 25);

    let session = ctx
        .app
        .storage
        .load(SessionKey::new(TEST_CHAT_ID, TEST_USER_ID))
        .await
        .unwrap();
    assert!(session.is_none());
}

#[tokio::test]
#[serial]
async fn test_gen_fixed_fields_and_amex() {
    let ctx = TestContext::new().await;

    run(&ctx, Command::Gen("371234|04|2031|1234 3".to_string())).await.unwrap();

    let bodies = ctx.telegram_mock.json_bodies("sendMessage").await;
    let cards = card_lines(bodies[0]["text"].as_str().unwrap(), "371234");
    assert_eq!(cards.len(), 3);
    for card in &cards {
        let fields: Vec<&str> = card.split('|').collect();
        assert_eq!(fields[0].len(), 15);
        assert_eq!(&fields[1..], &["04", "2031", "1234"]);
    }
}

#[tokio::test]
#[serial]
async fn test_gen_rejects_full_length_bin() {
    let ctx = TestContext::new().await;

    let result = run(&ctx, Command::Gen("4000001234567890".to_string())).await;
    assert_matches!(
        result,
        Err(SmartUtilError::Card(CardError::NoRoomForCheckDigit { length: 16 }))
    );
    assert!(ctx.telegram_mock.requests_for("sendMessage").await.is_empty());
}

#[tokio::test]
#[serial]
async fn test_guarded_errors_are_reported_to_chat() {
    let ctx = TestContext::new().await;

    let task = dispatch_command(
        ctx.bot.clone(),
        ChatId(TEST_CHAT_ID),
        TEST_USER_ID,
        Command::Gen("400000|13 5".to_string()),
        ctx.app.clone(),
    );
    spawn_guarded(
        ctx.bot.clone(),
        ChatId(TEST_CHAT_ID),
        TEST_USER_ID,
        ctx.app.guard.clone(),
        ctx.app.logging.clone(),
        "gen",
        task,
    )
    .await
    .unwrap();

    let bodies = ctx.telegram_mock.json_bodies("sendMessage").await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["text"], "❌ <b>invalid month '13', expected 01-12</b>");
}

#[tokio::test]
#[serial]
async fn test_gen_without_arguments_shows_usage() {
    let ctx = TestContext::new().await;

    run(&ctx, Command::Gen(String::new())).await.unwrap();

    let bodies = ctx.telegram_mock.json_bodies("sendMessage").await;
    assert_eq!(bodies[0]["text"], gen::USAGE);
}

#[tokio::test]
#[serial]
async fn test_regenerate_replays_last_request() {
    let ctx = TestContext::new().await;
    let key = SessionKey::new(TEST_CHAT_ID, TEST_USER_ID);

    run(&ctx, Command::Gen("515462|12|30|321 3".to_string())).await.unwrap();
    let text = gen::regenerate(&ctx.app, key).await.unwrap();

    let cards = card_lines(&text, "515462");
    assert_eq!(cards.len(), 3);
    assert!(cards.iter().all(|card| card.ends_with("|12|2030|321")));
}

#[tokio::test]
#[serial]
async fn test_regenerate_without_session() {
    let ctx = TestContext::new().await;

    let result = gen::regenerate(&ctx.app, SessionKey::new(TEST_CHAT_ID, TEST_USER_ID)).await;
    assert_matches!(result, Err(SmartUtilError::SessionExpired));
}

#[tokio::test]
#[serial]
async fn test_regenerate_button_edits_message() {
    let ctx = TestContext::new().await;
    run(&ctx, Command::Gen("400000 4".to_string())).await.unwrap();

    let query: CallbackQuery =
        serde_json::from_value(callback_query(TEST_USER_ID, 123, "regen")).unwrap();
    handle_regenerate(ctx.bot.clone(), query, ctx.app.clone()).await.unwrap();

    assert_eq!(ctx.telegram_mock.requests_for("answerCallbackQuery").await.len(), 1);
    let edits = ctx.telegram_mock.json_bodies("editMessageText").await;
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0]["message_id"], 123);
    assert_eq!(card_lines(edits[0]["text"].as_str().unwrap(), "400000").len(), 4);
    assert_eq!(edits[0]["reply_markup"]["inline_keyboard"][0][0]["callback_data"], "regen");
}

#[tokio::test]
#[serial]
async fn test_regenerate_button_for_other_user_alerts() {
    let ctx = TestContext::new().await;
    run(&ctx, Command::Gen("400000 4".to_string())).await.unwrap();

    let query: CallbackQuery =
        serde_json::from_value(callback_query(TEST_USER_ID + 1, 123, "regen")).unwrap();
    handle_regenerate(ctx.bot.clone(), query, ctx.app.clone()).await.unwrap();

    let answers = ctx.telegram_mock.json_bodies("answerCallbackQuery").await;
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0]["show_alert"], true);
    assert!(answers[0]["text"].as_str().unwrap().contains("expired"));
    assert!(ctx.telegram_mock.requests_for("editMessageText").await.is_empty());
}

#[tokio::test]
#[serial]
async fn test_mgen_groups_by_bin() {
    let ctx = TestContext::new().await;

    run(&ctx, Command::Mgen("400000 515462 3".to_string())).await.unwrap();

    let bodies = ctx.telegram_mock.json_bodies("sendMessage").await;
    let text = bodies[0]["text"].as_str().unwrap();
    assert_eq!(card_lines(text, "400000").len(), 3);
    assert_eq!(card_lines(text, "515462").len(), 3);
}

#[tokio::test]
#[serial]
async fn test_mgen_large_batch_is_sent_as_file() {
    let ctx = TestContext::new().await;

    run(&ctx, Command::Mgen("400000,515462 8".to_string())).await.unwrap();

    let uploads = ctx.telegram_mock.raw_bodies("sendDocument").await;
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].contains("mgen_x16.txt"));
    assert_eq!(card_lines(&uploads[0], "400000").len(), 8);
    assert_eq!(card_lines(&uploads[0], "515462").len(), 8);
}

#[tokio::test]
#[serial]
async fn test_mgen_rejects_too_many_bins() {
    let mut settings = test_settings();
    settings.generator.max_bins = 2;
    let ctx = TestContext::with_settings(settings).await;

    let result = run(&ctx, Command::Mgen("400000 515462 371234 3".to_string())).await;
    assert_matches!(result, Err(SmartUtilError::InvalidInput(_)));
}

#[tokio::test]
#[serial]
async fn test_extp_keeps_sample_prefix() {
    let ctx = TestContext::new().await;

    run(&ctx, Command::Extp("4539148803436467 5".to_string())).await.unwrap();

    let bodies = ctx.telegram_mock.json_bodies("sendMessage").await;
    let cards = card_lines(bodies[0]["text"].as_str().unwrap(), "453914880343");
    assert_eq!(cards.len(), 5);
    for card in &cards {
        assert!(is_luhn_valid(card.split('|').next().unwrap()));
    }
}

#[tokio::test]
#[serial]
async fn test_luhn_command() {
    let ctx = TestContext::new().await;

    run(&ctx, Command::Luhn("4539148803436467".to_string())).await.unwrap();
    run(&ctx, Command::Luhn("4539148803436468".to_string())).await.unwrap();

    let bodies = ctx.telegram_mock.json_bodies("sendMessage").await;
    assert_eq!(bodies.len(), 2);
    assert!(bodies[0]["text"].as_str().unwrap().contains("✅ Valid"));
    assert!(bodies[1]["text"].as_str().unwrap().contains("❌ Invalid"));
}
