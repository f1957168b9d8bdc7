//! Mock Telegram API Server for testing
//!
//! This module provides a mock HTTP server that simulates the Telegram Bot API
//! for testing purposes. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "12345:test_token";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL to pass to `Bot::set_api_url`
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Match a Bot API method regardless of the casing used in the path
    fn method_path(api_method: &str) -> String {
        format!("(?i)/bot[^/]+/{}$", api_method)
    }

    async fn mount_ok(&self, api_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(path_regex(Self::method_path(api_method)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": result
            })))
            .mount(&self.server)
            .await;
    }

    /// Setup mock for sendMessage endpoint
    pub async fn mock_send_message(&self) {
        self.mount_ok("sendMessage", text_message(123, "Test message")).await;
    }

    /// Setup mock for sendDocument endpoint
    pub async fn mock_send_document(&self) {
        let mut message = text_message(124, "");
        if let Some(object) = message.as_object_mut() {
            object.remove("text");
            object.insert(
                "document".to_string(),
                json!({
                    "file_id": "BQACAgIAAxkBAAIB",
                    "file_unique_id": "AgADBAAD",
                    "file_name": "cards.txt",
                    "file_size": 1024
                }),
            );
        }
        self.mount_ok("sendDocument", message).await;
    }

    /// Setup mock for editMessageText endpoint
    pub async fn mock_edit_message_text(&self) {
        self.mount_ok("editMessageText", text_message(123, "Edited test message")).await;
    }

    /// Setup mock for answerCallbackQuery endpoint
    pub async fn mock_answer_callback_query(&self) {
        self.mount_ok("answerCallbackQuery", json!(true)).await;
    }

    /// Setup mock for setMyCommands endpoint
    pub async fn mock_set_my_commands(&self) {
        self.mount_ok("setMyCommands", json!(true)).await;
    }

    /// Setup all default mocks
    pub async fn setup_default_mocks(&self) {
        self.mock_send_message().await;
        self.mock_send_document().await;
        self.mock_edit_message_text().await;
        self.mock_answer_callback_query().await;
        self.mock_set_my_commands().await;
    }

    /// Requests received for one Bot API method
    pub async fn requests_for(&self, api_method: &str) -> Vec<Request> {
        let suffix = format!("/{}", api_method.to_lowercase());
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().to_lowercase().ends_with(&suffix))
            .collect()
    }

    /// JSON bodies of the requests received for one Bot API method
    pub async fn json_bodies(&self, api_method: &str) -> Vec<Value> {
        self.requests_for(api_method)
            .await
            .iter()
            .map(|request| serde_json::from_slice(&request.body).expect("request body is JSON"))
            .collect()
    }

    /// Raw bodies (e.g. multipart uploads) as lossy text
    pub async fn raw_bodies(&self, api_method: &str) -> Vec<String> {
        self.requests_for(api_method)
            .await
            .iter()
            .map(|request| String::from_utf8_lossy(&request.body).into_owned())
            .collect()
    }
}

/// A bot message in a private chat
pub fn text_message(message_id: i32, text: &str) -> Value {
    json!({
        "message_id": message_id,
        "from": {
            "id": 12345,
            "is_bot": true,
            "first_name": "TestBot",
            "username": "test_bot"
        },
        "chat": {
            "id": TEST_CHAT_ID,
            "type": "private",
            "first_name": "Test"
        },
        "date": 1700000000,
        "text": text
    })
}

/// Chat used by every test
pub const TEST_CHAT_ID: i64 = 555_000_111;

/// Regular user used by every test
pub const TEST_USER_ID: i64 = 555_000_111;

/// Callback query for a button under the bot message `message_id`
pub fn callback_query(user_id: i64, message_id: i32, data: &str) -> Value {
    json!({
        "id": "4382bfdwdsb323b2d9",
        "from": {
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
            "username": "test_user"
        },
        "message": text_message(message_id, "Previous cards"),
        "chat_instance": "-8470184395235489",
        "data": data
    })
}
