//! Persistent settings store
//!
//! Named configuration scalars kept in the [`SETTINGS`] table.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use sitelog_core::{SettingValue, SettingsError, SettingsStore};

use super::tables::{RedbStorage, SETTINGS};
use crate::error::StorageError;

/// Settings store backed by redb
pub struct RedbSettingsStore {
    storage: Arc<RedbStorage>,
}

impl RedbSettingsStore {
    /// Create a settings store over an opened database
    pub fn new(storage: Arc<RedbStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl SettingsStore for RedbSettingsStore {
    async fn get(&self, name: &str) -> Result<Option<SettingValue>, SettingsError> {
        let Some(bytes) = self.storage.get(SETTINGS, name.as_bytes())? else {
            return Ok(None);
        };

        postcard::from_bytes(&bytes)
            .map(Some)
            .map_err(|e| SettingsError::Malformed {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    async fn set(&self, name: &str, value: SettingValue) -> Result<(), SettingsError> {
        let bytes = postcard::to_allocvec(&value)
            .map_err(|e| StorageError::serialization(e.to_string()))?;
        self.storage.put(SETTINGS, name.as_bytes(), &bytes)?;
        debug!(name, value = %value, "Persisted setting");
        Ok(())
    }
}
