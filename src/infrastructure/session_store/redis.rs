use async_trait::async_trait;
use deadpool_redis::{
    redis::{cmd, AsyncCommands},
    Config, Connection, Pool, Runtime,
};
use uuid::Uuid;

use crate::domain::{ports::SessionStore, ChatSession, DomainError};

const SESSIONS_KEY: &str = "chat:sessions";

/// Sessions in a Redis hash keyed by conversation id. Best-effort local
/// persistence, nothing more: a lost write costs one sidebar entry.
pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    pub fn new(redis_url: &str) -> Result<Self, DomainError> {
        let cfg = Config::from_url(redis_url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| DomainError::external(format!("redis pool: {e}")))?;
        Ok(Self { pool })
    }

    async fn conn(&self) -> Result<Connection, DomainError> {
        self.pool
            .get()
            .await
            .map_err(|e| DomainError::external(format!("redis connection: {e}")))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn upsert(&self, session: &ChatSession) -> Result<(), DomainError> {
        let json =
            serde_json::to_string(session).map_err(|e| DomainError::internal(e.to_string()))?;

        let mut conn = self.conn().await?;
        conn.hset::<_, _, _, ()>(SESSIONS_KEY, session.conversation_id.to_string(), json)
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, conversation_id: Uuid) -> Result<Option<ChatSession>, DomainError> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn
            .hget(SESSIONS_KEY, conversation_id.to_string())
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| DomainError::internal(format!("corrupt session record: {e}"))),
            None => Ok(None),
        }
    }

    async fn read_all(&self) -> Result<Vec<ChatSession>, DomainError> {
        let mut conn = self.conn().await?;
        let raw: Vec<(String, String)> = conn
            .hgetall(SESSIONS_KEY)
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let mut sessions = Vec::with_capacity(raw.len());
        for (_, json) in raw {
            let session: ChatSession = serde_json::from_str(&json)
                .map_err(|e| DomainError::internal(format!("corrupt session record: {e}")))?;
            sessions.push(session);
        }

        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        let _: String = cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;
        Ok(())
    }
}
