use crate::ports::{AppConfig, ConfigError, ConfigResult, ConfigStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    storage_key: Option<String>,
    default_columns: Option<Vec<String>>,
    log_level: Option<String>,
}

pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::ReadError("Cannot determine config directory".to_string())
        })?;

        Ok(Self::at(config_dir.join("taskboard").join("config.json")))
    }

    pub fn at(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    async fn ensure_config_dir(&self) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_config(&self) -> ConfigResult<AppConfig> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "No config at {}, using defaults",
                    self.config_path.display()
                );
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(ConfigError::ReadError(e.to_string())),
        };

        let config_file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let defaults = AppConfig::default();
        Ok(AppConfig {
            data_dir: config_file.data_dir,
            storage_key: config_file.storage_key.unwrap_or(defaults.storage_key),
            default_columns: config_file
                .default_columns
                .filter(|columns| !columns.is_empty())
                .unwrap_or(defaults.default_columns),
            log_level: config_file.log_level.unwrap_or(defaults.log_level),
        })
    }

    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()> {
        self.ensure_config_dir().await?;

        let config_file = ConfigFile {
            data_dir: config.data_dir.clone(),
            storage_key: Some(config.storage_key.clone()),
            default_columns: Some(config.default_columns.clone()),
            log_level: Some(config.log_level.clone()),
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let store = FileConfigStore::at(temp.path().join("config.json"));

        assert_eq!(store.load_config().await.unwrap(), AppConfig::default());
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{"storage_key":"Board","default_columns":[]}"#).unwrap();

        let config = FileConfigStore::at(&path).load_config().await.unwrap();
        assert_eq!(config.storage_key, "Board");
        assert_eq!(config.default_columns, AppConfig::default().default_columns);
        assert_eq!(config.log_level, "info");
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let store = FileConfigStore::at(temp.path().join("nested").join("config.json"));
        let config = AppConfig {
            data_dir: Some(temp.path().join("data")),
            default_columns: vec!["Backlog".into(), "Done".into()],
            log_level: "debug".into(),
            ..Default::default()
        };

        store.save_config(&config).await.unwrap();
        assert_eq!(store.load_config().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            FileConfigStore::at(&path).load_config().await,
            Err(ConfigError::InvalidFormat(_))
        ));
    }
}
