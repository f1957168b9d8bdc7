//! Per-chat user sessions
//!
//! A session holds the small amount of state a user's interaction needs
//! between updates (e.g. the last `/gen` request behind a "Regenerate" button).
//! Sessions are keyed by `(chat_id, user_id)` and carry their own expiry.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::utils::errors::Result;

/// Session identity: the same user has separate sessions per chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

/// Session contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub key: SessionKey,
    /// Named values, stored as JSON so any backend can persist them
    pub data: HashMap<String, serde_json::Value>,
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(key: SessionKey, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            key,
            data: HashMap::new(),
            expires_at: now + ttl,
            updated_at: now,
        }
    }

    /// Store a value and push the expiry forward by `ttl`
    pub fn set<T: Serialize>(&mut self, name: &str, value: &T, ttl: Duration) -> Result<()> {
        self.data.insert(name.to_string(), serde_json::to_value(value)?);
        self.touch(ttl);
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.data.get(name) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    pub fn touch(&mut self, ttl: Duration) {
        let now = Utc::now();
        self.updated_at = now;
        self.expires_at = now + ttl;
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Whole seconds left before expiry, zero once expired
    pub fn remaining_seconds(&self) -> u64 {
        (self.expires_at - Utc::now()).num_seconds().max(0) as u64
    }
}
