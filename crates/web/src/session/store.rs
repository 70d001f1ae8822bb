//! Session storage backends.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisError};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use common::{AppError, AppResult};

use super::SessionData;

/// Key prefix for sessions stored in Redis
const SESSION_KEY_PREFIX: &str = "session:";

/// Persistence for session data, keyed by session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session; `None` when unknown, expired or undecodable.
    async fn load(&self, id: &str) -> AppResult<Option<SessionData>>;

    /// Store a session for `ttl`.
    async fn save(&self, id: &str, data: &SessionData, ttl: Duration) -> AppResult<()>;

    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Connectivity check for health reporting.
    async fn ping(&self) -> AppResult<()>;
}

// =============================================================================
// Redis
// =============================================================================

/// Sessions stored as JSON strings in Redis with an expiry.
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    /// Connect to Redis.
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        debug!("Connecting to Redis at {}", url);
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    fn key(id: &str) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &str) -> AppResult<Option<SessionData>> {
        let mut conn = self.conn.clone();
        let stored: Option<String> = conn.get(Self::key(id)).await?;

        match stored {
            Some(json) => match serde_json::from_str(&json) {
                Ok(data) => Ok(Some(data)),
                Err(e) => {
                    warn!("Discarding undecodable session: {}", e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn save(&self, id: &str, data: &SessionData, ttl: Duration) -> AppResult<()> {
        let json = serde_json::to_string(data)
            .map_err(|e| AppError::internal(format!("Serialization error: {}", e)))?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(Self::key(id), json, ttl.as_secs().max(1))
            .await?;
        debug!("Session saved");
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::key(id)).await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>("health:ping").await?;
        Ok(())
    }
}

// =============================================================================
// In-process
// =============================================================================

/// Sessions kept in process memory. Lost on restart and not shared between
/// instances. Expired entries are swept whenever a session is saved.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, StoredSession>>,
}

struct StoredSession {
    data: SessionData,
    /// `None` when the ttl is too large to represent
    expires_at: Option<Instant>,
}

impl StoredSession {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|stored| stored.is_live(now))
            .count()
    }

    /// Number of stored entries, expired ones included
    #[cfg(test)]
    async fn stored(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> AppResult<Option<SessionData>> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(id) {
            Some(stored) if stored.is_live(Instant::now()) => Ok(Some(stored.data.clone())),
            Some(_) => {
                sessions.remove(id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, id: &str, data: &SessionData, ttl: Duration) -> AppResult<()> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, stored| stored.is_live(now));
        sessions.insert(
            id.to_string(),
            StoredSession {
                data: data.clone(),
                expires_at: now.checked_add(ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
