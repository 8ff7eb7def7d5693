//! Storage adapters for the preference record.
//!
//! The host environment decides where settings live; the service only sees
//! the [`SettingsStore`] trait. Loads return a raw JSON object (any subset of
//! keys, or empty when nothing was persisted yet) so the service can merge it
//! over the defaults.

pub mod json_file;

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::settings::Settings;

pub use json_file::JsonFileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read settings: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write settings: {0}")]
    Write(#[source] std::io::Error),

    #[error("malformed settings data: {0}")]
    Format(#[from] serde_json::Error),
}

/// Asynchronous persistence facility for a whole settings record.
///
/// Both operations are full-record; there is no partial save.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the persisted object. An empty object means a fresh start.
    async fn load_data(&self) -> Result<Value, StoreError>;

    /// Persist the full record, replacing whatever was stored before.
    async fn save_data(&self, settings: &Settings) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedding hosts that manage persistence
/// themselves.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Option<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a pre-existing persisted object.
    pub fn with_data(value: Value) -> Self {
        Self {
            data: Mutex::new(Some(value)),
        }
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load_data(&self) -> Result<Value, StoreError> {
        let guard = self.data.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone().unwrap_or_else(|| Value::Object(Default::default())))
    }

    async fn save_data(&self, settings: &Settings) -> Result<(), StoreError> {
        let value = serde_json::to_value(settings)?;
        let mut guard = self.data.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(value);
        Ok(())
    }
}
