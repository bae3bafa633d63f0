use async_trait::async_trait;
use dashmap::DashMap;

use crate::ports::{BlobStore, PersistenceResult};

/// Process-local blob storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: DashMap<String, String>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.blobs.get(key).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn save(&self, key: &str, value: &str) -> PersistenceResult<()> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn load(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.get(key))
    }
}
