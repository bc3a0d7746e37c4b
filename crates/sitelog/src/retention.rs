//! Retention policy for bounded logs
//!
//! Decides how many of a log's oldest entries must go before one more
//! entry is inserted.

use sitelog_core::{EntryId, LogEntry};

use crate::config::DEFAULT_MAX_ENTRIES;

/// Oldest-first retention bound for one log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    max_entries: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl RetentionPolicy {
    /// Create a policy; a zero bound falls back to the default
    pub fn new(max_entries: usize) -> Self {
        if max_entries == 0 {
            Self::default()
        } else {
            Self { max_entries }
        }
    }

    /// Get the entry bound
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Check if inserting one more entry would break the bound
    pub fn would_exceed(&self, current_count: usize) -> bool {
        current_count >= self.max_entries
    }

    /// Number of oldest entries to delete before inserting one more
    ///
    /// `total - max_entries + 1` once the log is full, zero otherwise.
    pub fn evictions_needed(&self, total: usize) -> usize {
        if self.would_exceed(total) {
            total - self.max_entries + 1
        } else {
            0
        }
    }

    /// Pick the entries to evict from a log listed oldest-first
    pub fn select_for_eviction(&self, oldest_first: &[LogEntry]) -> Vec<EntryId> {
        let to_evict = self.evictions_needed(oldest_first.len());
        oldest_first.iter().take(to_evict).map(|e| e.id).collect()
    }
}
