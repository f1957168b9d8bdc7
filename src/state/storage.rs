//! Session storage implementation
//!
//! Sessions live either in process memory or in Redis, chosen by
//! configuration. Both backends honour the session TTL: the memory backend
//! evicts lazily on read and during [`StateStorage::cleanup_expired`], Redis
//! expires keys on its own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use redis::AsyncCommands;
use tracing::{debug, error, info, warn};

use super::session::{Session, SessionKey};
use crate::config::{SessionBackend, SessionConfig};
use crate::utils::errors::Result;

/// Session store shared by all handlers
#[derive(Clone)]
pub struct StateStorage {
    backend: Backend,
    ttl: chrono::Duration,
}

#[derive(Clone)]
enum Backend {
    Memory(MemoryStorage),
    Redis(RedisStorage),
}

impl StateStorage {
    /// Create the backend selected in configuration
    pub async fn from_config(config: &SessionConfig) -> Result<Self> {
        let ttl = chrono::Duration::seconds(config.ttl_seconds as i64);
        let backend = match config.backend {
            SessionBackend::Memory => Backend::Memory(MemoryStorage::default()),
            SessionBackend::Redis => Backend::Redis(RedisStorage::new(config).await?),
        };

        info!(backend = ?config.backend, ttl_seconds = config.ttl_seconds, "Session storage ready");
        Ok(Self { backend, ttl })
    }

    /// In-memory storage with the given session TTL
    pub fn memory(ttl: chrono::Duration) -> Self {
        Self {
            backend: Backend::Memory(MemoryStorage::default()),
            ttl,
        }
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Memory(_) => "memory",
            Backend::Redis(_) => "redis",
        }
    }

    /// Save a session, replacing any previous one for the same key
    pub async fn save(&self, session: &Session) -> Result<()> {
        debug!(key = %session.key, "Saving session");
        match &self.backend {
            Backend::Memory(store) => {
                store.save(session);
                Ok(())
            }
            Backend::Redis(store) => store.save(session).await,
        }
    }

    /// Load a live session; expired sessions are removed and reported as missing
    pub async fn load(&self, key: SessionKey) -> Result<Option<Session>> {
        let session = match &self.backend {
            Backend::Memory(store) => store.load(key),
            Backend::Redis(store) => store.load(key).await?,
        };

        match session {
            Some(session) if session.is_expired() => {
                debug!(key = %key, expires_at = %session.expires_at, "Session has expired, removing");
                self.delete(key).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Load a session or start a fresh one
    pub async fn load_or_new(&self, key: SessionKey) -> Result<Session> {
        Ok(self
            .load(key)
            .await?
            .unwrap_or_else(|| Session::new(key, self.ttl)))
    }

    /// Delete a session; returns whether one existed
    pub async fn delete(&self, key: SessionKey) -> Result<bool> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.delete(key)),
            Backend::Redis(store) => store.delete(key).await,
        }
    }

    /// Drop expired sessions; returns how many were removed
    pub async fn cleanup_expired(&self) -> Result<usize> {
        let removed = match &self.backend {
            Backend::Memory(store) => store.cleanup_expired(),
            // Redis evicts through key expiry
            Backend::Redis(_) => 0,
        };

        if removed > 0 {
            info!(removed = removed, "Cleaned up expired sessions");
        }
        Ok(removed)
    }

    pub async fn stats(&self) -> Result<StorageStats> {
        let (active_sessions, expired_sessions) = match &self.backend {
            Backend::Memory(store) => store.counts(),
            Backend::Redis(store) => (store.count().await?, 0),
        };

        Ok(StorageStats {
            backend: self.backend_name(),
            active_sessions,
            expired_sessions,
        })
    }
}

/// Process-local session map
#[derive(Clone, Default)]
pub struct MemoryStorage {
    sessions: Arc<Mutex<HashMap<SessionKey, Session>>>,
}

impl MemoryStorage {
    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<SessionKey, Session>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, session: &Session) {
        self.sessions().insert(session.key, session.clone());
    }

    fn load(&self, key: SessionKey) -> Option<Session> {
        self.sessions().get(&key).cloned()
    }

    fn delete(&self, key: SessionKey) -> bool {
        self.sessions().remove(&key).is_some()
    }

    fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        before - sessions.len()
    }

    fn counts(&self) -> (usize, usize) {
        let sessions = self.sessions();
        let expired = sessions.values().filter(|s| s.is_expired()).count();
        (sessions.len() - expired, expired)
    }
}

/// Redis-backed sessions stored as JSON with `SET EX`
#[derive(Clone)]
pub struct RedisStorage {
    connection_manager: redis::aio::ConnectionManager,
    prefix: String,
}

impl RedisStorage {
    pub async fn new(config: &SessionConfig) -> Result<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            prefix: config.prefix.clone(),
        })
    }

    fn key(&self, key: SessionKey) -> String {
        format!("{}session:{}", self.prefix, key)
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let key = self.key(session.key);
        let serialized = serde_json::to_string(session)?;
        let ttl_seconds = session.remaining_seconds().max(1);

        let mut conn = self.connection_manager.clone();
        match conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            Ok(_) => {
                debug!(key = %key, ttl_seconds = ttl_seconds, "Session saved to Redis");
                Ok(())
            }
            Err(e) => {
                error!(key = %key, error = %e, "Failed to save session to Redis");
                Err(e.into())
            }
        }
    }

    async fn load(&self, key: SessionKey) -> Result<Option<Session>> {
        let redis_key = self.key(key);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = conn.get(&redis_key).await?;
        match serialized {
            Some(data) => match serde_json::from_str::<Session>(&data) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    warn!(key = %redis_key, error = %e, "Dropping unreadable session");
                    let _: u32 = conn.del(&redis_key).await?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn delete(&self, key: SessionKey) -> Result<bool> {
        let mut conn = self.connection_manager.clone();
        let deleted: u32 = conn.del(self.key(key)).await?;
        Ok(deleted > 0)
    }

    /// Count session keys with incremental `SCAN`
    async fn count(&self) -> Result<usize> {
        let mut conn = self.connection_manager.clone();
        let mut keys = conn
            .scan_match::<_, String>(format!("{}session:*", self.prefix))
            .await?;

        let mut count = 0;
        while keys.next_item().await.is_some() {
            count += 1;
        }
        Ok(count)
    }
}

/// Storage statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    pub backend: &'static str,
    pub active_sessions: usize,
    pub expired_sessions: usize,
}
