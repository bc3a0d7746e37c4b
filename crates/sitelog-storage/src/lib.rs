//! # Sitelog Storage
//!
//! Storage backends for the sitelog bounded log store.
//!
//! ## Features
//!
//! - **InMemoryDocumentRepository**: Concurrent in-memory entries for tests and short-lived hosts
//! - **InMemorySettingsStore**: In-memory named settings
//! - **RedbDocumentRepository**: Persistent entries with a per-kind age index
//! - **RedbSettingsStore**: Persistent named settings
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sitelog_storage::{RedbDocumentRepository, RedbSettingsStore, RedbStorage, RedbStorageConfig};
//!
//! let storage = Arc::new(RedbStorage::open(RedbStorageConfig::default())?);
//! let documents = RedbDocumentRepository::new(storage.clone());
//! let settings = RedbSettingsStore::new(storage);
//! ```

pub mod error;
pub mod memory;
pub mod structured;

// Re-exports
pub use error::StorageError;
pub use memory::{InMemoryDocumentRepository, InMemorySettingsStore};
pub use structured::{RedbDocumentRepository, RedbSettingsStore, RedbStorage, RedbStorageConfig};

// Re-export the storage traits from sitelog-core for convenience
pub use sitelog_core::{DocumentRepository, SettingsStore};
