//! In-memory storage implementations
//!
//! This module provides in-memory implementations of the repository and
//! settings traits, suitable for testing and embedding in short-lived hosts.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sitelog_core::{
    DocumentQuery, DocumentRepository, EntryId, Fields, LogEntry, LogKind, QueryOrder,
    RepositoryError, SettingValue, SettingsError, SettingsStore,
};
use tracing::{debug, trace};

/// In-memory implementation of DocumentRepository
///
/// Uses `DashMap` for concurrent access. Each kind keeps an ordered index of
/// `(created_at, id)` so oldest-first and newest-first scans are cheap.
#[derive(Debug)]
pub struct InMemoryDocumentRepository {
    /// Map from entry ID to entry
    documents: DashMap<EntryId, LogEntry>,
    /// Index: kind -> entries ordered by age
    by_kind: DashMap<LogKind, BTreeSet<(DateTime<Utc>, EntryId)>>,
    /// Next id to hand out
    next_id: AtomicU64,
}

impl Default for InMemoryDocumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentRepository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
            by_kind: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create_document(
        &self,
        kind: &LogKind,
        created_at: DateTime<Utc>,
        fields: Fields,
    ) -> Result<LogEntry, RepositoryError> {
        let id = EntryId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let entry = LogEntry::new(id, kind.clone(), created_at, fields);

        trace!(kind = %kind, id = %id, "Creating document");

        self.documents.insert(id, entry.clone());
        self.by_kind
            .entry(kind.clone())
            .or_default()
            .insert((created_at, id));

        Ok(entry)
    }

    async fn query_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<LogEntry>, RepositoryError> {
        let keys: Vec<EntryId> = match self.by_kind.get(&query.kind) {
            Some(index) => match query.order {
                QueryOrder::OldestFirst => index.iter().map(|(_, id)| *id).collect(),
                QueryOrder::NewestFirst => index.iter().rev().map(|(_, id)| *id).collect(),
            },
            None => return Ok(Vec::new()),
        };

        let entries: Vec<LogEntry> = keys
            .into_iter()
            .filter_map(|id| self.documents.get(&id).map(|e| e.clone()))
            .collect();

        Ok(query.paginate(entries))
    }

    async fn get_document(&self, id: EntryId) -> Result<Option<LogEntry>, RepositoryError> {
        Ok(self.documents.get(&id).map(|e| e.clone()))
    }

    async fn delete_document(&self, id: EntryId) -> Result<bool, RepositoryError> {
        match self.documents.remove(&id) {
            Some((_, entry)) => {
                if let Some(mut index) = self.by_kind.get_mut(&entry.kind) {
                    index.remove(&entry.age_key());
                }
                trace!(kind = %entry.kind, id = %id, "Deleted document");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_documents(&self, kind: &LogKind) -> Result<usize, RepositoryError> {
        Ok(self.by_kind.get(kind).map(|index| index.len()).unwrap_or(0))
    }
}

/// In-memory implementation of SettingsStore
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    values: DashMap<String, SettingValue>,
}

impl InMemorySettingsStore {
    /// Create an empty settings store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, name: &str) -> Result<Option<SettingValue>, SettingsError> {
        Ok(self.values.get(name).map(|v| v.clone()))
    }

    async fn set(&self, name: &str, value: SettingValue) -> Result<(), SettingsError> {
        debug!(name, value = %value, "Updated setting");
        self.values.insert(name.to_string(), value);
        Ok(())
    }
}
