//! Persistent document repository
//!
//! Stores log entries in redb. Each entry lives in [`DOCUMENTS`] keyed by id,
//! and a per-kind index in [`KIND_INDEX`] keeps entries sorted by
//! `(created_at, id)` so retention scans never deserialize more than they
//! return. The id counter is persisted in [`META`], so ids are not reused
//! after the database is reopened.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redb::ReadableTable;
use tracing::{debug, trace};

use sitelog_core::{
    DocumentQuery, DocumentRepository, EntryId, Fields, LogEntry, LogKind, QueryOrder,
    RepositoryError,
};

use super::tables::{DOCUMENTS, KIND_INDEX, META, RedbStorage};
use crate::error::StorageError;

const NEXT_ID_KEY: &[u8] = b"next_entry_id";

fn id_key(id: EntryId) -> [u8; 8] {
    id.value().to_be_bytes()
}

fn kind_prefix(kind: &LogKind) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(kind.as_str().len() + 1);
    prefix.extend_from_slice(kind.as_str().as_bytes());
    prefix.push(0x00);
    prefix
}

/// Upper bound of a kind's index range (exclusive)
fn kind_prefix_end(kind: &LogKind) -> Vec<u8> {
    let mut end = kind_prefix(kind);
    if let Some(last) = end.last_mut() {
        *last = 0x01;
    }
    end
}

/// Big-endian seconds then nanoseconds; negative timestamps sort first
fn sortable_time(at: DateTime<Utc>) -> [u8; 12] {
    let mut key = [0u8; 12];
    key[..8].copy_from_slice(&((at.timestamp() as u64) ^ (1 << 63)).to_be_bytes());
    key[8..].copy_from_slice(&at.timestamp_subsec_nanos().to_be_bytes());
    key
}

fn index_key(kind: &LogKind, created_at: DateTime<Utc>, id: EntryId) -> Vec<u8> {
    let mut key = kind_prefix(kind);
    key.extend_from_slice(&sortable_time(created_at));
    key.extend_from_slice(&id_key(id));
    key
}

fn decode_u64(bytes: &[u8]) -> Result<u64, StorageError> {
    let array: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StorageError::deserialization(format!("expected 8 bytes, got {}", bytes.len())))?;
    Ok(u64::from_be_bytes(array))
}

/// The id is the trailing 8 bytes of an index key
fn id_from_index_key(key: &[u8]) -> Result<EntryId, StorageError> {
    let start = key
        .len()
        .checked_sub(8)
        .ok_or_else(|| StorageError::deserialization("index key too short"))?;
    decode_u64(&key[start..]).map(EntryId::new)
}

/// Document repository backed by redb
pub struct RedbDocumentRepository {
    storage: Arc<RedbStorage>,
}

impl RedbDocumentRepository {
    /// Create a repository over an opened database
    pub fn new(storage: Arc<RedbStorage>) -> Self {
        Self { storage }
    }

    fn create(
        &self,
        kind: &LogKind,
        created_at: DateTime<Utc>,
        fields: Fields,
    ) -> Result<LogEntry, StorageError> {
        let write_txn = self
            .storage
            .db()
            .begin_write()
            .map_err(StorageError::database)?;

        let entry = {
            let mut meta = write_txn.open_table(META).map_err(StorageError::database)?;
            let next = match meta.get(NEXT_ID_KEY).map_err(StorageError::database)? {
                Some(value) => decode_u64(value.value())?,
                None => 1,
            };
            meta.insert(NEXT_ID_KEY, (next + 1).to_be_bytes().as_slice())
                .map_err(StorageError::database)?;

            let entry = LogEntry::new(EntryId::new(next), kind.clone(), created_at, fields);
            let value = postcard::to_allocvec(&entry)
                .map_err(|e| StorageError::serialization(e.to_string()))?;

            let mut documents = write_txn
                .open_table(DOCUMENTS)
                .map_err(StorageError::database)?;
            documents
                .insert(id_key(entry.id).as_slice(), value.as_slice())
                .map_err(StorageError::database)?;

            let mut index = write_txn
                .open_table(KIND_INDEX)
                .map_err(StorageError::database)?;
            index
                .insert(index_key(kind, created_at, entry.id).as_slice(), b"".as_slice())
                .map_err(StorageError::database)?;

            entry
        };

        write_txn.commit().map_err(StorageError::database)?;

        trace!(kind = %kind, id = %entry.id, "Stored document");
        Ok(entry)
    }

    fn query(&self, query: &DocumentQuery) -> Result<Vec<LogEntry>, StorageError> {
        let read_txn = self
            .storage
            .db()
            .begin_read()
            .map_err(StorageError::database)?;
        let index = read_txn
            .open_table(KIND_INDEX)
            .map_err(StorageError::database)?;
        let documents = read_txn
            .open_table(DOCUMENTS)
            .map_err(StorageError::database)?;

        let start = kind_prefix(&query.kind);
        let end = kind_prefix_end(&query.kind);

        let mut ids = Vec::new();
        for item in index
            .range(start.as_slice()..end.as_slice())
            .map_err(StorageError::database)?
        {
            let (key, _) = item.map_err(StorageError::database)?;
            ids.push(id_from_index_key(key.value())?);
        }

        if query.order == QueryOrder::NewestFirst {
            ids.reverse();
        }

        let page = ids
            .into_iter()
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX));

        let mut entries = Vec::new();
        for id in page {
            if let Some(value) = documents
                .get(id_key(id).as_slice())
                .map_err(StorageError::database)?
            {
                entries.push(postcard::from_bytes::<LogEntry>(value.value())?);
            }
        }

        Ok(entries)
    }

    fn get(&self, id: EntryId) -> Result<Option<LogEntry>, StorageError> {
        match self.storage.get(DOCUMENTS, &id_key(id))? {
            Some(value) => Ok(Some(postcard::from_bytes(&value)?)),
            None => Ok(None),
        }
    }

    fn delete(&self, id: EntryId) -> Result<bool, StorageError> {
        let write_txn = self
            .storage
            .db()
            .begin_write()
            .map_err(StorageError::database)?;

        let removed = {
            let mut documents = write_txn
                .open_table(DOCUMENTS)
                .map_err(StorageError::database)?;
            let bytes = documents
                .remove(id_key(id).as_slice())
                .map_err(StorageError::database)?
                .map(|v| v.value().to_vec());

            match bytes {
                Some(bytes) => {
                    let entry: LogEntry = postcard::from_bytes(&bytes)?;
                    let mut index = write_txn
                        .open_table(KIND_INDEX)
                        .map_err(StorageError::database)?;
                    index
                        .remove(index_key(&entry.kind, entry.created_at, id).as_slice())
                        .map_err(StorageError::database)?;
                    true
                }
                None => false,
            }
        };

        write_txn.commit().map_err(StorageError::database)?;

        if removed {
            debug!(id = %id, "Deleted document");
        }
        Ok(removed)
    }

    fn count(&self, kind: &LogKind) -> Result<usize, StorageError> {
        let read_txn = self
            .storage
            .db()
            .begin_read()
            .map_err(StorageError::database)?;
        let index = read_txn
            .open_table(KIND_INDEX)
            .map_err(StorageError::database)?;

        let start = kind_prefix(kind);
        let end = kind_prefix_end(kind);
        let range = index
            .range(start.as_slice()..end.as_slice())
            .map_err(StorageError::database)?;

        Ok(range.count())
    }
}

#[async_trait]
impl DocumentRepository for RedbDocumentRepository {
    async fn create_document(
        &self,
        kind: &LogKind,
        created_at: DateTime<Utc>,
        fields: Fields,
    ) -> Result<LogEntry, RepositoryError> {
        Ok(self.create(kind, created_at, fields)?)
    }

    async fn query_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<LogEntry>, RepositoryError> {
        Ok(self.query(query)?)
    }

    async fn get_document(&self, id: EntryId) -> Result<Option<LogEntry>, RepositoryError> {
        Ok(self.get(id)?)
    }

    async fn delete_document(&self, id: EntryId) -> Result<bool, RepositoryError> {
        Ok(self.delete(id)?)
    }

    async fn count_documents(&self, kind: &LogKind) -> Result<usize, RepositoryError> {
        Ok(self.count(kind)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured::RedbStorageConfig;
    use crate::memory::InMemoryDocumentRepository;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn create_test_repo() -> (RedbDocumentRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = RedbStorageConfig {
            db_path: temp_dir.path().join("docs.redb"),
            ..Default::default()
        };
        let storage = Arc::new(RedbStorage::open(config).unwrap());
        (RedbDocumentRepository::new(storage), temp_dir)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_sortable_time_orders_across_epoch() {
        assert!(sortable_time(at(-10)) < sortable_time(at(0)));
        assert!(sortable_time(at(0)) < sortable_time(at(10)));

        // Sub-second offsets before the epoch still sort by instant
        let before = at(-1) + Duration::nanoseconds(200);
        let later = at(-1) + Duration::nanoseconds(900);
        assert!(sortable_time(before) < sortable_time(later));
        assert!(sortable_time(later) < sortable_time(at(0)));
    }

    #[test]
    fn test_index_key_roundtrip_id() {
        let key = index_key(&LogKind::mail(), at(5), EntryId::new(77));
        assert!(key.starts_with(b"mail\x00"));
        assert_eq!(id_from_index_key(&key).unwrap(), EntryId::new(77));
    }

    #[tokio::test]
    async fn test_create_query_delete() {
        let (repo, _temp) = create_test_repo();
        let kind = LogKind::not_found();

        let mut fields = Fields::new();
        fields.insert("url".into(), "/gone".into());

        let entry = repo.create_document(&kind, at(100), fields).await.unwrap();
        assert_eq!(entry.id, EntryId::new(1));

        let fetched = repo.get_document(entry.id).await.unwrap().unwrap();
        assert_eq!(fetched, entry);
        assert_eq!(repo.count_documents(&kind).await.unwrap(), 1);

        assert!(repo.delete_document(entry.id).await.unwrap());
        assert!(!repo.delete_document(entry.id).await.unwrap());
        assert_eq!(repo.count_documents(&kind).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_query_order_and_page() {
        let (repo, _temp) = create_test_repo();
        let kind = LogKind::search();

        for i in 0..6 {
            repo.create_document(&kind, at(i), Fields::new()).await.unwrap();
        }

        let oldest = repo
            .query_documents(&DocumentQuery::all(kind.clone()).with_order(QueryOrder::OldestFirst))
            .await
            .unwrap();
        let ids: Vec<u64> = oldest.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

        let page = repo
            .query_documents(&DocumentQuery::all(kind).page(2, 1))
            .await
            .unwrap();
        let ids: Vec<u64> = page.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![5, 4]);
    }

    #[tokio::test]
    async fn test_sub_microsecond_order_matches_memory() {
        let (repo, _temp) = create_test_repo();
        let memory = InMemoryDocumentRepository::new();
        let kind = LogKind::not_found();
        let base = at(1_700_000_000);

        // Created out of time order, less than a microsecond apart
        for offset in [500, 100] {
            let created_at = base + Duration::nanoseconds(offset);
            repo.create_document(&kind, created_at, Fields::new())
                .await
                .unwrap();
            memory
                .create_document(&kind, created_at, Fields::new())
                .await
                .unwrap();
        }

        let query = DocumentQuery::all(kind).with_order(QueryOrder::OldestFirst);
        let redb_ids: Vec<u64> = repo
            .query_documents(&query)
            .await
            .unwrap()
            .iter()
            .map(|e| e.id.value())
            .collect();
        let memory_ids: Vec<u64> = memory
            .query_documents(&query)
            .await
            .unwrap()
            .iter()
            .map(|e| e.id.value())
            .collect();

        assert_eq!(redb_ids, vec![2, 1]);
        assert_eq!(redb_ids, memory_ids);
    }

    #[tokio::test]
    async fn test_kind_prefixes_do_not_overlap() {
        let (repo, _temp) = create_test_repo();

        // "mail" is a byte prefix of "mailer"; the separator keeps them apart
        repo.create_document(&LogKind::new("mail"), at(1), Fields::new())
            .await
            .unwrap();
        repo.create_document(&LogKind::new("mailer"), at(2), Fields::new())
            .await
            .unwrap();

        assert_eq!(repo.count_documents(&LogKind::new("mail")).await.unwrap(), 1);
        assert_eq!(repo.count_documents(&LogKind::new("mailer")).await.unwrap(), 1);
    }
}
