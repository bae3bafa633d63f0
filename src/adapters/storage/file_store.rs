use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{BlobStore, PersistenceError, PersistenceResult};

/// Stores each key as `<dir>/<key>.json`.
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> PersistenceResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(PersistenceError::Write {
                key: key.to_string(),
                reason: "key must be a plain file name".to_string(),
            });
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn save(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let path = self.blob_path(key)?;
        let write_err = |e: std::io::Error| PersistenceError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        };

        fs::create_dir_all(&self.dir).await.map_err(write_err)?;

        // Write beside the target and rename so a crash never leaves half a board.
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, value).await.map_err(write_err)?;
        fs::rename(&temp_path, &path).await.map_err(write_err)?;

        tracing::debug!("Saved {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn load(&self, key: &str) -> PersistenceResult<Option<String>> {
        let path = self.blob_path(key).map_err(|e| match e {
            PersistenceError::Write { key, reason } => PersistenceError::Read { key, reason },
            other => other,
        })?;

        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Read {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_creates_directory() {
        let temp = TempDir::new().unwrap();
        let store = FileBlobStore::new(temp.path().join("nested").join("data"));

        assert_eq!(store.load("ProjectStore").await.unwrap(), None);

        store.save("ProjectStore", r#"{"projects":[]}"#).await.unwrap();
        assert_eq!(
            store.load("ProjectStore").await.unwrap().as_deref(),
            Some(r#"{"projects":[]}"#)
        );
        assert!(store.dir().join("ProjectStore.json").exists());
        assert!(!store.dir().join("ProjectStore.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let temp = TempDir::new().unwrap();
        let store = FileBlobStore::new(temp.path());

        assert!(matches!(
            store.save("../escape", "x").await,
            Err(PersistenceError::Write { .. })
        ));
        assert!(matches!(
            store.load("a/b").await,
            Err(PersistenceError::Read { .. })
        ));
    }
}
