//! Structured storage using redb
//!
//! This module provides persistent storage for:
//! - Log entries, indexed per kind by age
//! - Named settings
//! - Id counters
//!
//! Every mutation runs inside a single redb write transaction.

mod documents;
mod settings;
mod tables;

pub use documents::RedbDocumentRepository;
pub use settings::RedbSettingsStore;
pub use tables::{RedbStorage, RedbStorageConfig};
