//! Log entry types

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attribute bag attached to every entry
///
/// The store never looks inside; each log kind has its own field set.
pub type Fields = BTreeMap<String, String>;

/// Unique identifier for a log entry
///
/// Assigned by the repository on creation. Identifiers increase
/// monotonically and are never handed out twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl EntryId {
    /// Create a new entry ID
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Identifies one independent bounded log
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogKind(String);

impl LogKind {
    /// Page-not-found hits
    pub const NOT_FOUND: &'static str = "404";
    /// Outgoing mail
    pub const MAIL: &'static str = "mail";
    /// Site searches
    pub const SEARCH: &'static str = "search";

    /// Create a log kind from any name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The `404` log
    pub fn not_found() -> Self {
        Self::new(Self::NOT_FOUND)
    }

    /// The `mail` log
    pub fn mail() -> Self {
        Self::new(Self::MAIL)
    }

    /// The `search` log
    pub fn search() -> Self {
        Self::new(Self::SEARCH)
    }

    /// Get the kind name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the kind name is usable (non-empty, no whitespace or control characters)
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && !self
                .0
                .chars()
                .any(|c| c.is_whitespace() || c.is_control())
    }
}

impl Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LogKind {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// One recorded event in a bounded log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Repository-assigned identifier
    pub id: EntryId,
    /// The log this entry belongs to
    pub kind: LogKind,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
    /// Kind-specific attributes
    pub fields: Fields,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(id: EntryId, kind: LogKind, created_at: DateTime<Utc>, fields: Fields) -> Self {
        Self {
            id,
            kind,
            created_at,
            fields,
        }
    }

    /// Look up a single attribute
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Sort key used for retention: creation time, then id
    pub fn age_key(&self) -> (DateTime<Utc>, EntryId) {
        (self.created_at, self.id)
    }
}

/// Ordering of query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum QueryOrder {
    /// Oldest first: `created_at` ascending, ties by ascending id
    OldestFirst,
    /// Newest first: `created_at` descending, ties by descending id (default)
    #[default]
    NewestFirst,
}

/// Query parameters for listing documents of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    /// Which log to read
    pub kind: LogKind,
    /// Result ordering
    pub order: QueryOrder,
    /// Maximum number of entries to return (`None` = all)
    pub limit: Option<usize>,
    /// Number of entries to skip
    pub offset: usize,
}

impl DocumentQuery {
    /// Query every entry of a kind, newest first
    pub fn all(kind: LogKind) -> Self {
        Self {
            kind,
            order: QueryOrder::default(),
            limit: None,
            offset: 0,
        }
    }

    /// Set the ordering
    pub fn with_order(mut self, order: QueryOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the page size and offset
    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    /// Apply offset and limit to an already-ordered result set
    pub fn paginate(&self, mut entries: Vec<LogEntry>) -> Vec<LogEntry> {
        let start = self.offset.min(entries.len());
        let mut page = entries.split_off(start);
        if let Some(limit) = self.limit {
            page.truncate(limit);
        }
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: u64, secs: i64) -> LogEntry {
        LogEntry::new(
            EntryId::new(id),
            LogKind::not_found(),
            Utc.timestamp_opt(secs, 0).unwrap(),
            Fields::new(),
        )
    }

    #[test]
    fn test_well_known_kinds() {
        assert_eq!(LogKind::not_found().as_str(), "404");
        assert_eq!(LogKind::mail().as_str(), "mail");
        assert_eq!(LogKind::search().as_str(), "search");
    }

    #[test]
    fn test_kind_validity() {
        assert!(LogKind::new("404").is_valid());
        assert!(!LogKind::new("").is_valid());
        assert!(!LogKind::new("bad kind").is_valid());
    }

    #[test]
    fn test_order_ties_broken_by_id() {
        let mut entries = vec![entry(3, 10), entry(1, 10), entry(2, 5)];

        entries.sort_by_key(LogEntry::age_key);
        let ids: Vec<u64> = entries.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_paginate() {
        let entries: Vec<_> = (1..=5).map(|i| entry(i, i as i64)).collect();
        let query = DocumentQuery::all(LogKind::not_found()).page(2, 1);

        let page = query.paginate(entries.clone());
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, EntryId::new(2));

        // Offset past the end yields nothing
        let query = DocumentQuery::all(LogKind::not_found()).page(2, 10);
        assert!(query.paginate(entries).is_empty());
    }

    #[test]
    fn test_entry_id_display() {
        assert_eq!(EntryId::new(42).to_string(), "#42");
    }
}
