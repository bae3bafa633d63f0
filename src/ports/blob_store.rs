use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("Failed to read blob '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write blob '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Key-value storage for serialized board snapshots.
///
/// `save` always receives the complete current snapshot, so implementations
/// may simply overwrite whatever the key held before.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn save(&self, key: &str, value: &str) -> PersistenceResult<()>;
    async fn load(&self, key: &str) -> PersistenceResult<Option<String>>;
}
