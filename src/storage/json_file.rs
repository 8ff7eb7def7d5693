use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::config::settings::Settings;

use super::{SettingsStore, StoreError};

/// File-backed store keeping the record as pretty-printed JSON.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located next to the executable, the same way the rest of the
    /// tool keeps its data files portable.
    pub fn next_to_executable(file_name: &str) -> Self {
        let path = std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("."))
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join(file_name);
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn load_data(&self) -> Result<Value, StoreError> {
        if !self.path.exists() {
            tracing::info!("No settings file at {:?}, starting fresh", self.path);
            return Ok(Value::Object(Default::default()));
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(StoreError::Read)?;
        let value: Value = serde_json::from_str(&content)?;
        tracing::info!("Loaded settings from {:?}", self.path);
        Ok(value)
    }

    async fn save_data(&self, settings: &Settings) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(StoreError::Write)?;
        tracing::info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}
