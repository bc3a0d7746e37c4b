//! Core traits for sitelog
//!
//! These traits are the seams between the log store and its host:
//!
//! - [`DocumentRepository`]: Storage for entries and their attributes
//! - [`SettingsStore`]: Named configuration scalars
//! - [`Clock`]: Time abstraction for testability

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::entry::{DocumentQuery, EntryId, Fields, LogEntry, LogKind};
use crate::error::{RepositoryError, SettingsError};
use crate::settings::SettingValue;

/// Storage abstraction for log entries
///
/// This trait allows different storage backends (memory, embedded database,
/// a host CMS) to be used interchangeably. Implementations own id assignment
/// and must never reuse an id.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Create a document and return it with its assigned id
    async fn create_document(
        &self,
        kind: &LogKind,
        created_at: DateTime<Utc>,
        fields: Fields,
    ) -> Result<LogEntry, RepositoryError>;

    /// List documents of one kind in the requested order and page
    async fn query_documents(&self, query: &DocumentQuery)
    -> Result<Vec<LogEntry>, RepositoryError>;

    /// Fetch a single document by id
    async fn get_document(&self, id: EntryId) -> Result<Option<LogEntry>, RepositoryError>;

    /// Delete a document by id, returning whether it existed
    async fn delete_document(&self, id: EntryId) -> Result<bool, RepositoryError>;

    /// Count the documents of one kind
    async fn count_documents(&self, kind: &LogKind) -> Result<usize, RepositoryError>;
}

/// Named configuration scalars
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a setting, `None` if it was never written
    async fn get(&self, name: &str) -> Result<Option<SettingValue>, SettingsError>;

    /// Write a setting
    async fn set(&self, name: &str, value: SettingValue) -> Result<(), SettingsError>;

    /// Read a setting, falling back to `default` when unset
    async fn get_or(&self, name: &str, default: SettingValue) -> Result<SettingValue, SettingsError> {
        Ok(self.get(name).await?.unwrap_or(default))
    }
}

/// Time abstraction for testability
///
/// This trait allows tests to control time, enabling deterministic
/// testing of ordering and expiry.
pub trait Clock: Send + Sync {
    /// Get the current UTC datetime
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real clock implementation using system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for tests and simulations
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Jump to an absolute time
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::default())
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
