//! Bounded append-only log store
//!
//! [`LogStore`] keeps each log kind under its configured entry bound by
//! evicting the oldest entries before every insert. Entries and settings
//! live in the injected [`DocumentRepository`] and [`SettingsStore`].
//!
//! Appends come from host events and must never break the host: they
//! report problems through [`AppendOutcome`] instead of an error. Admin
//! operations (list, clear, delete, settings) return `Result`.
//!
//! ## Capacity under concurrency
//!
//! In [`CapacityMode::BestEffort`] concurrent appends to the same kind are
//! not excluded from each other, so the log can briefly hold more than
//! `max_entries` entries. The next append's eviction restores the bound.
//! [`CapacityMode::Serialized`] runs appends on one store one at a time,
//! which keeps the bound strict within a single process.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument, trace, warn};

use sitelog_core::{
    Clock, DocumentQuery, DocumentRepository, EntryId, Fields, LogEntry, LogKind, LogStoreError,
    QueryOrder, SettingValue, SettingsError, SettingsStore, SiteEvent, SystemClock,
};
use sitelog_storage::{InMemoryDocumentRepository, InMemorySettingsStore};

use crate::config::{
    CapacityMode, LogStoreConfig, SettingsUpdate, clamp_max_entries, enabled_setting,
    max_entries_setting,
};
use crate::retention::RetentionPolicy;

/// Result of an append
#[derive(Debug)]
#[must_use]
pub enum AppendOutcome {
    /// The entry was stored
    Appended(LogEntry),
    /// The log is disabled; nothing was stored
    Disabled,
    /// The entry could not be stored
    Failed(LogStoreError),
}

impl AppendOutcome {
    /// The stored entry, if any
    pub fn entry(&self) -> Option<&LogEntry> {
        match self {
            AppendOutcome::Appended(entry) => Some(entry),
            _ => None,
        }
    }

    /// Consume the outcome, keeping the stored entry
    pub fn into_entry(self) -> Option<LogEntry> {
        match self {
            AppendOutcome::Appended(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn is_appended(&self) -> bool {
        matches!(self, AppendOutcome::Appended(_))
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, AppendOutcome::Disabled)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AppendOutcome::Failed(_))
    }
}

/// Bounded log store over injected storage
pub struct LogStore {
    documents: Arc<dyn DocumentRepository>,
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    mode: CapacityMode,
    append_lock: Mutex<()>,
}

impl LogStore {
    /// Create a store using the system clock and best-effort capacity
    pub fn new(documents: Arc<dyn DocumentRepository>, settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            documents,
            settings,
            clock: Arc::new(SystemClock),
            mode: CapacityMode::default(),
            append_lock: Mutex::new(()),
        }
    }

    /// Create a store over fresh in-memory storage
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::new(InMemorySettingsStore::new()),
        )
    }

    /// Use a specific clock for `created_at` timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set how concurrent appends are coordinated
    pub fn with_capacity_mode(mut self, mode: CapacityMode) -> Self {
        self.mode = mode;
        self
    }

    /// Get the capacity mode
    pub fn capacity_mode(&self) -> CapacityMode {
        self.mode
    }

    fn check_kind(kind: &LogKind) -> Result<(), LogStoreError> {
        if kind.is_valid() {
            Ok(())
        } else {
            Err(LogStoreError::invalid_kind(kind))
        }
    }

    /// Append an entry, evicting the oldest entries first if the log is full
    ///
    /// Eviction failures are logged and do not stop the insert. Never
    /// returns an error: failures come back as [`AppendOutcome::Failed`].
    #[instrument(skip(self, fields), fields(kind = %kind))]
    pub async fn append(&self, kind: &LogKind, fields: Fields) -> AppendOutcome {
        if let Err(e) = Self::check_kind(kind) {
            warn!(error = %e, "Rejected append");
            return AppendOutcome::Failed(e);
        }

        let config = match self.get_settings(kind).await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Failed to read log settings");
                return AppendOutcome::Failed(e);
            }
        };

        if !config.enabled {
            trace!("Log disabled, dropping entry");
            return AppendOutcome::Disabled;
        }

        let _serialized = match self.mode {
            CapacityMode::Serialized => Some(self.append_lock.lock().await),
            CapacityMode::BestEffort => None,
        };

        self.enforce_capacity(kind, RetentionPolicy::new(config.max_entries))
            .await;

        match self
            .documents
            .create_document(kind, self.clock.now_utc(), fields)
            .await
        {
            Ok(entry) => {
                trace!(id = %entry.id, "Appended entry");
                AppendOutcome::Appended(entry)
            }
            Err(e) => {
                warn!(error = %e, "Failed to store entry");
                AppendOutcome::Failed(e.into())
            }
        }
    }

    async fn enforce_capacity(&self, kind: &LogKind, policy: RetentionPolicy) {
        let query = DocumentQuery::all(kind.clone()).with_order(QueryOrder::OldestFirst);
        let existing = match self.documents.query_documents(&query).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to read log for eviction");
                return;
            }
        };

        let victims = policy.select_for_eviction(&existing);
        if victims.is_empty() {
            return;
        }

        debug!(
            total = existing.len(),
            max_entries = policy.max_entries(),
            evicting = victims.len(),
            "Evicting oldest entries"
        );

        for id in victims {
            if let Err(e) = self.documents.delete_document(id).await {
                warn!(id = %id, error = %e, "Failed to evict entry");
            }
        }
    }

    /// Record a host event in its log
    ///
    /// Returns the stored entry, or `None` when the log is disabled or the
    /// write failed (failures are logged).
    pub async fn record(&self, event: SiteEvent) -> Option<LogEntry> {
        let kind = event.kind();
        match self.append(&kind, event.into_fields()).await {
            AppendOutcome::Appended(entry) => Some(entry),
            AppendOutcome::Disabled => None,
            AppendOutcome::Failed(e) => {
                warn!(kind = %kind, error = %e, "Dropped site event");
                None
            }
        }
    }

    /// List entries newest first
    pub async fn list(
        &self,
        kind: &LogKind,
        limit: Option<usize>,
        offset: usize,
    ) -> Result<Vec<LogEntry>, LogStoreError> {
        self.list_ordered(kind, limit, offset, QueryOrder::NewestFirst)
            .await
    }

    /// List entries in a chosen order
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn list_ordered(
        &self,
        kind: &LogKind,
        limit: Option<usize>,
        offset: usize,
        order: QueryOrder,
    ) -> Result<Vec<LogEntry>, LogStoreError> {
        Self::check_kind(kind)?;
        let query = DocumentQuery {
            kind: kind.clone(),
            order,
            limit,
            offset,
        };
        let entries = self.documents.query_documents(&query).await?;
        trace!(returned = entries.len(), "Listed entries");
        Ok(entries)
    }

    /// Delete every entry of a log, returning how many were removed
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn clear(&self, kind: &LogKind) -> Result<usize, LogStoreError> {
        Self::check_kind(kind)?;
        let entries = self
            .documents
            .query_documents(&DocumentQuery::all(kind.clone()))
            .await?;

        let mut removed = 0;
        for entry in entries {
            if self.documents.delete_document(entry.id).await? {
                removed += 1;
            }
        }

        debug!(removed, "Cleared log");
        Ok(removed)
    }

    /// Delete one entry if it exists and belongs to `kind`
    #[instrument(skip(self), fields(kind = %kind, id = %id))]
    pub async fn delete_one(&self, kind: &LogKind, id: EntryId) -> Result<bool, LogStoreError> {
        Self::check_kind(kind)?;
        match self.documents.get_document(id).await? {
            Some(entry) if entry.kind == *kind => {
                let removed = self.documents.delete_document(id).await?;
                trace!(removed, "Deleted entry");
                Ok(removed)
            }
            _ => Ok(false),
        }
    }

    /// Number of entries in a log
    pub async fn count(&self, kind: &LogKind) -> Result<usize, LogStoreError> {
        Self::check_kind(kind)?;
        Ok(self.documents.count_documents(kind).await?)
    }

    /// Read a stored setting, treating malformed values as absent
    async fn read_setting(&self, name: &str) -> Result<Option<SettingValue>, LogStoreError> {
        match self.settings.get(name).await {
            Ok(value) => Ok(value),
            Err(SettingsError::Malformed { name, reason }) => {
                warn!(setting = %name, %reason, "Ignoring malformed setting");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Effective configuration of a log
    ///
    /// Missing or malformed values fall back to the defaults, and a stored
    /// bound below 1 clamps to the default bound.
    pub async fn get_settings(&self, kind: &LogKind) -> Result<LogStoreConfig, LogStoreError> {
        Self::check_kind(kind)?;
        let defaults = LogStoreConfig::default();

        let enabled = self
            .read_setting(&enabled_setting(kind))
            .await?
            .and_then(|v| v.as_bool())
            .unwrap_or(defaults.enabled);

        let max_entries = self
            .read_setting(&max_entries_setting(kind))
            .await?
            .and_then(|v| v.as_int())
            .map(clamp_max_entries)
            .unwrap_or(defaults.max_entries);

        Ok(LogStoreConfig {
            enabled,
            max_entries,
        })
    }

    /// Write the supplied settings and return the effective configuration
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn update_settings(
        &self,
        kind: &LogKind,
        update: SettingsUpdate,
    ) -> Result<LogStoreConfig, LogStoreError> {
        Self::check_kind(kind)?;

        if let Some(enabled) = update.enabled {
            self.settings
                .set(&enabled_setting(kind), SettingValue::Bool(enabled))
                .await?;
        }

        if let Some(raw) = update.max_entries {
            let max_entries = clamp_max_entries(raw);
            if max_entries as i64 != raw {
                debug!(raw, max_entries, "Clamped max_entries");
            }
            self.settings
                .set(
                    &max_entries_setting(kind),
                    SettingValue::Int(i64::try_from(max_entries).unwrap_or(i64::MAX)),
                )
                .await?;
        }

        let config = self.get_settings(kind).await?;
        debug!(enabled = config.enabled, max_entries = config.max_entries, "Updated settings");
        Ok(config)
    }

    /// Write `defaults` for any setting of `kind` not stored yet
    ///
    /// Returns true if anything was written.
    pub async fn seed_settings(
        &self,
        kind: &LogKind,
        defaults: LogStoreConfig,
    ) -> Result<bool, LogStoreError> {
        Self::check_kind(kind)?;
        let defaults = defaults.normalized();
        let mut update = SettingsUpdate::default();

        if self.read_setting(&enabled_setting(kind)).await?.is_none() {
            update.enabled = Some(defaults.enabled);
        }
        if self.read_setting(&max_entries_setting(kind)).await?.is_none() {
            update.max_entries = Some(i64::try_from(defaults.max_entries).unwrap_or(i64::MAX));
        }

        if update.is_empty() {
            return Ok(false);
        }
        self.update_settings(kind, update).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use sitelog_core::{ManualClock, RepositoryError};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn start() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    /// Store whose clock ticks one second per append
    struct Fixture {
        store: LogStore,
        clock: Arc<ManualClock>,
        settings: Arc<InMemorySettingsStore>,
    }

    impl Fixture {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::new(start()));
            let settings = Arc::new(InMemorySettingsStore::new());
            let store = LogStore::new(Arc::new(InMemoryDocumentRepository::new()), settings.clone())
                .with_clock(clock.clone());
            Self {
                store,
                clock,
                settings,
            }
        }

        async fn append(&self, kind: &LogKind, name: &str) -> AppendOutcome {
            self.clock.advance(Duration::seconds(1));
            let mut fields = Fields::new();
            fields.insert("name".into(), name.into());
            self.store.append(kind, fields).await
        }
    }

    fn names(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().filter_map(|e| e.field("name")).collect()
    }

    /// Repository that can be switched into failing mode
    #[derive(Default)]
    struct FlakyRepository {
        inner: InMemoryDocumentRepository,
        fail_writes: AtomicBool,
        fail_deletes: AtomicBool,
        fail_reads: AtomicBool,
    }

    impl FlakyRepository {
        fn unavailable() -> RepositoryError {
            RepositoryError::Database("connection lost".into())
        }
    }

    #[async_trait]
    impl DocumentRepository for FlakyRepository {
        async fn create_document(
            &self,
            kind: &LogKind,
            created_at: DateTime<Utc>,
            fields: Fields,
        ) -> Result<LogEntry, RepositoryError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            self.inner.create_document(kind, created_at, fields).await
        }

        async fn query_documents(
            &self,
            query: &DocumentQuery,
        ) -> Result<Vec<LogEntry>, RepositoryError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            self.inner.query_documents(query).await
        }

        async fn get_document(&self, id: EntryId) -> Result<Option<LogEntry>, RepositoryError> {
            self.inner.get_document(id).await
        }

        async fn delete_document(&self, id: EntryId) -> Result<bool, RepositoryError> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(Self::unavailable());
            }
            self.inner.delete_document(id).await
        }

        async fn count_documents(&self, kind: &LogKind) -> Result<usize, RepositoryError> {
            self.inner.count_documents(kind).await
        }
    }

    #[tokio::test]
    async fn test_eviction_keeps_newest() {
        let f = Fixture::new();
        let kind = LogKind::not_found();
        let config = f
            .store
            .update_settings(&kind, SettingsUpdate::max_entries(3))
            .await
            .unwrap();
        assert_eq!(config.max_entries, 3);

        for name in ["E1", "E2", "E3", "E4"] {
            assert!(f.append(&kind, name).await.is_appended());
        }

        assert_eq!(f.store.count(&kind).await.unwrap(), 3);
        let entries = f.store.list(&kind, None, 0).await.unwrap();
        assert_eq!(names(&entries), vec!["E4", "E3", "E2"]);
    }

    #[tokio::test]
    async fn test_count_never_exceeds_bound() {
        let f = Fixture::new();
        let kind = LogKind::search();
        f.store
            .update_settings(&kind, SettingsUpdate::max_entries(5))
            .await
            .unwrap();

        for i in 0..20 {
            let _ = f.append(&kind, &format!("q{i}")).await;
            assert!(f.store.count(&kind).await.unwrap() <= 5);
        }

        let oldest_first = f
            .store
            .list_ordered(&kind, None, 0, QueryOrder::OldestFirst)
            .await
            .unwrap();
        assert_eq!(names(&oldest_first), vec!["q15", "q16", "q17", "q18", "q19"]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_evict_lowest_id() {
        let clock = Arc::new(ManualClock::new(start()));
        let store = LogStore::in_memory().with_clock(clock);
        let kind = LogKind::mail();
        store
            .update_settings(&kind, SettingsUpdate::max_entries(2))
            .await
            .unwrap();

        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(store.append(&kind, Fields::new()).await.into_entry().unwrap().id);
        }

        let remaining: Vec<EntryId> = store
            .list_ordered(&kind, None, 0, QueryOrder::OldestFirst)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(remaining, vec![ids[1], ids[2]]);
    }

    #[tokio::test]
    async fn test_disabled_append_is_noop() {
        let f = Fixture::new();
        let kind = LogKind::not_found();
        assert!(f.append(&kind, "before").await.is_appended());

        f.store
            .update_settings(&kind, SettingsUpdate::enabled(false))
            .await
            .unwrap();
        assert!(f.append(&kind, "dropped").await.is_disabled());
        assert_eq!(f.store.count(&kind).await.unwrap(), 1);

        // Reads and clears still work while disabled
        assert_eq!(f.store.list(&kind, None, 0).await.unwrap().len(), 1);
        assert_eq!(f.store.clear(&kind).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_settings_defaults_and_clamp() {
        let f = Fixture::new();
        let kind = LogKind::mail();

        assert_eq!(f.store.get_settings(&kind).await.unwrap(), LogStoreConfig::default());

        let config = f
            .store
            .update_settings(&kind, SettingsUpdate::max_entries(0))
            .await
            .unwrap();
        assert_eq!(config.max_entries, 100);

        let config = f
            .store
            .update_settings(&kind, SettingsUpdate::max_entries(-3))
            .await
            .unwrap();
        assert_eq!(config.max_entries, 100);
    }

    #[tokio::test]
    async fn test_update_writes_only_supplied_fields() {
        let f = Fixture::new();
        let kind = LogKind::search();
        f.store
            .update_settings(&kind, SettingsUpdate::max_entries(7))
            .await
            .unwrap();

        let config = f
            .store
            .update_settings(&kind, SettingsUpdate::enabled(false))
            .await
            .unwrap();
        assert!(!config.enabled);
        assert_eq!(config.max_entries, 7);
    }

    #[tokio::test]
    async fn test_stored_values_fall_back_to_defaults() {
        let f = Fixture::new();
        let kind = LogKind::not_found();

        f.settings
            .set(&max_entries_setting(&kind), SettingValue::Int(0))
            .await
            .unwrap();
        f.settings
            .set(&enabled_setting(&kind), SettingValue::Text("maybe".into()))
            .await
            .unwrap();

        let config = f.store.get_settings(&kind).await.unwrap();
        assert_eq!(config, LogStoreConfig::default());
    }

    #[tokio::test]
    async fn test_list_limit_and_offset() {
        let f = Fixture::new();
        let kind = LogKind::not_found();
        for i in 1..=5 {
            let _ = f.append(&kind, &format!("E{i}")).await;
        }

        let page = f.store.list(&kind, Some(2), 0).await.unwrap();
        assert_eq!(names(&page), vec!["E5", "E4"]);

        let page = f.store.list(&kind, Some(2), 4).await.unwrap();
        assert_eq!(names(&page), vec!["E1"]);

        let empty = f.store.list(&LogKind::search(), Some(10), 0).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let f = Fixture::new();
        let kind = LogKind::mail();
        for i in 0..4 {
            let _ = f.append(&kind, &format!("m{i}")).await;
        }
        let _ = f.append(&LogKind::search(), "other").await;

        assert_eq!(f.store.clear(&kind).await.unwrap(), 4);
        assert_eq!(f.store.count(&kind).await.unwrap(), 0);
        assert_eq!(f.store.clear(&kind).await.unwrap(), 0);

        // Other logs are untouched
        assert_eq!(f.store.count(&LogKind::search()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_one() {
        let f = Fixture::new();
        let kind = LogKind::not_found();
        let entry = f.append(&kind, "victim").await.into_entry().unwrap();
        let _ = f.append(&kind, "survivor").await;

        // Wrong kind does not delete
        assert!(!f.store.delete_one(&LogKind::mail(), entry.id).await.unwrap());
        // Missing id returns false and leaves the count alone
        assert!(!f.store.delete_one(&kind, EntryId::new(999)).await.unwrap());
        assert_eq!(f.store.count(&kind).await.unwrap(), 2);

        assert!(f.store.delete_one(&kind, entry.id).await.unwrap());
        assert!(!f.store.delete_one(&kind, entry.id).await.unwrap());
        assert_eq!(f.store.count(&kind).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_kind_rejected() {
        let store = LogStore::in_memory();
        let kind = LogKind::new("");

        assert!(matches!(
            store.append(&kind, Fields::new()).await,
            AppendOutcome::Failed(LogStoreError::InvalidKind(_))
        ));
        assert!(matches!(
            store.count(&kind).await,
            Err(LogStoreError::InvalidKind(_))
        ));
    }

    #[tokio::test]
    async fn test_record_events() {
        let store = LogStore::in_memory();

        let entry = store
            .record(SiteEvent::SearchPerformed {
                query: "rust logs".into(),
                ip_address: "203.0.113.9".into(),
                user_agent: "curl/8".into(),
            })
            .await
            .unwrap();
        assert_eq!(entry.kind, LogKind::search());
        assert_eq!(entry.field("query"), Some("rust logs"));

        store
            .update_settings(&LogKind::not_found(), SettingsUpdate::enabled(false))
            .await
            .unwrap();
        let dropped = store
            .record(SiteEvent::NotFound {
                url: "/missing".into(),
                referrer: String::new(),
                ip_address: "203.0.113.9".into(),
                user_agent: "curl/8".into(),
            })
            .await;
        assert!(dropped.is_none());
    }

    #[tokio::test]
    async fn test_repository_failure_is_swallowed() {
        let repo = Arc::new(FlakyRepository::default());
        let store = LogStore::new(repo.clone(), Arc::new(InMemorySettingsStore::new()));
        let kind = LogKind::mail();

        repo.fail_writes.store(true, Ordering::SeqCst);
        let outcome = store.append(&kind, Fields::new()).await;
        assert!(matches!(
            outcome,
            AppendOutcome::Failed(LogStoreError::StoreUnavailable(_))
        ));
        assert_eq!(store.count(&kind).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_eviction_failure_still_inserts() {
        let repo = Arc::new(FlakyRepository::default());
        let store = LogStore::new(repo.clone(), Arc::new(InMemorySettingsStore::new()));
        let kind = LogKind::not_found();
        store
            .update_settings(&kind, SettingsUpdate::max_entries(2))
            .await
            .unwrap();

        let _ = store.append(&kind, Fields::new()).await;
        let _ = store.append(&kind, Fields::new()).await;

        repo.fail_deletes.store(true, Ordering::SeqCst);
        assert!(store.append(&kind, Fields::new()).await.is_appended());
        assert_eq!(store.count(&kind).await.unwrap(), 3);

        repo.fail_reads.store(true, Ordering::SeqCst);
        assert!(store.append(&kind, Fields::new()).await.is_appended());

        // Admin reads surface the failure
        assert!(matches!(
            store.list(&kind, None, 0).await,
            Err(LogStoreError::StoreUnavailable(_))
        ));

        // Once the repository recovers the next append restores the bound
        repo.fail_reads.store(false, Ordering::SeqCst);
        repo.fail_deletes.store(false, Ordering::SeqCst);
        assert!(store.append(&kind, Fields::new()).await.is_appended());
        assert_eq!(store.count(&kind).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_seed_settings_only_fills_missing() {
        let store = LogStore::in_memory();
        let kind = LogKind::search();
        store
            .update_settings(&kind, SettingsUpdate::max_entries(9))
            .await
            .unwrap();

        let seeded = store
            .seed_settings(&kind, LogStoreConfig::new(false, 50))
            .await
            .unwrap();
        assert!(seeded);

        let config = store.get_settings(&kind).await.unwrap();
        assert!(!config.enabled);
        assert_eq!(config.max_entries, 9);

        assert!(!store
            .seed_settings(&kind, LogStoreConfig::default())
            .await
            .unwrap());
    }

    #[test]
    fn test_capacity_mode_builder() {
        let store = LogStore::in_memory().with_capacity_mode(CapacityMode::Serialized);
        assert_eq!(store.capacity_mode(), CapacityMode::Serialized);
        assert_eq!(LogStore::in_memory().capacity_mode(), CapacityMode::BestEffort);
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let store = LogStore::in_memory();
        let count = tokio_test::block_on(store.count(&LogKind::mail()));
        assert_eq!(count.unwrap(), 0);
    }

    #[test]
    fn test_append_outcome_accessors() {
        assert!(AppendOutcome::Disabled.entry().is_none());
        assert!(AppendOutcome::Failed(LogStoreError::StoreUnavailable("x".into())).is_failed());
    }
}
