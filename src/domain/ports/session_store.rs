use crate::domain::{errors::DomainError, ChatSession};
use async_trait::async_trait;
use uuid::Uuid;

/// Keyed upsert/read store for chat sessions, keyed by conversation id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn upsert(&self, session: &ChatSession) -> Result<(), DomainError>;
    async fn get(&self, conversation_id: Uuid) -> Result<Option<ChatSession>, DomainError>;

    /// All sessions, newest first.
    async fn read_all(&self) -> Result<Vec<ChatSession>, DomainError>;

    async fn ping(&self) -> Result<(), DomainError>;
}
