use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::{ports::SessionStore, ChatSession, DomainError};

/// Process-local session store for tests and single-run setups.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, ChatSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn upsert(&self, session: &ChatSession) -> Result<(), DomainError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        sessions.insert(session.conversation_id, session.clone());
        Ok(())
    }

    async fn get(&self, conversation_id: Uuid) -> Result<Option<ChatSession>, DomainError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        Ok(sessions.get(&conversation_id).cloned())
    }

    async fn read_all(&self) -> Result<Vec<ChatSession>, DomainError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut all: Vec<ChatSession> = sessions.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_overwrites_instead_of_duplicating() {
        let store = InMemorySessionStore::new();
        let mut session = ChatSession::new("first question");

        store.upsert(&session).await.unwrap();
        session.record_exchange("first question", "an answer");
        store.upsert(&session).await.unwrap();

        let all = store.read_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].turns.len(), 2);
    }

    #[tokio::test]
    async fn test_read_all_is_newest_first() {
        let store = InMemorySessionStore::new();

        let older = ChatSession::new("older");
        store.upsert(&older).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let newer = ChatSession::new("newer");
        store.upsert(&newer).await.unwrap();

        let all = store.read_all().await.unwrap();
        assert_eq!(all[0].header, "newer");
        assert_eq!(all[1].header, "older");
    }

    #[tokio::test]
    async fn test_get_missing_session_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }
}
