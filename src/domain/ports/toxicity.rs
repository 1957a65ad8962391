use crate::domain::{errors::DomainError, ToxicityVerdict};
use async_trait::async_trait;

#[async_trait]
pub trait ToxicityModel: Send + Sync {
    async fn classify(&self, text: &str) -> Result<ToxicityVerdict, DomainError>;

    /// Classifies every text, preserving order and length. One model error
    /// fails the whole batch.
    async fn classify_batch(&self, texts: &[&str]) -> Result<Vec<ToxicityVerdict>, DomainError>;
}
