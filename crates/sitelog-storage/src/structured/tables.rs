//! redb table definitions and storage manager
//!
//! Defines all tables used for structured storage.

use std::path::PathBuf;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use tracing::{debug, info, instrument};

use crate::error::StorageError;

// Table definitions
// Key: entry id (u64 big-endian), Value: serialized LogEntry
pub const DOCUMENTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("documents");

// Key: kind bytes, 0x00, created_at micros (sortable), entry id, Value: empty
pub const KIND_INDEX: TableDefinition<&[u8], &[u8]> = TableDefinition::new("kind_index");

// Key: setting name, Value: serialized SettingValue
pub const SETTINGS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("settings");

// Key: counter name, Value: u64 big-endian
pub const META: TableDefinition<&[u8], &[u8]> = TableDefinition::new("meta");

/// Configuration for redb storage
#[derive(Debug, Clone)]
pub struct RedbStorageConfig {
    /// Path to the database file
    pub db_path: PathBuf,
    /// Cache size in bytes
    pub cache_size: usize,
}

impl Default for RedbStorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/sitelog.redb"),
            cache_size: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Main redb storage manager
pub struct RedbStorage {
    db: Arc<Database>,
    config: RedbStorageConfig,
}

impl RedbStorage {
    /// Open or create the database
    #[instrument(skip(config), fields(path = %config.db_path.display()))]
    pub fn open(config: RedbStorageConfig) -> Result<Self, StorageError> {
        // Ensure parent directory exists
        if let Some(parent) = config.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::builder()
            .set_cache_size(config.cache_size)
            .create(&config.db_path)
            .map_err(StorageError::database)?;

        info!("Opened redb database");

        let storage = Self {
            db: Arc::new(db),
            config,
        };

        storage.init_tables()?;

        Ok(storage)
    }

    /// Initialize all tables
    fn init_tables(&self) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(StorageError::database)?;

        for table in [DOCUMENTS, KIND_INDEX, SETTINGS, META] {
            write_txn
                .open_table(table)
                .map_err(StorageError::database)?;
        }

        write_txn.commit().map_err(StorageError::database)?;

        debug!("Initialized redb tables");
        Ok(())
    }

    /// Get a reference to the database
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get the configuration
    pub fn config(&self) -> &RedbStorageConfig {
        &self.config
    }

    /// Put a key-value pair in a table
    pub fn put(
        &self,
        table: TableDefinition<&[u8], &[u8]>,
        key: &[u8],
        value: &[u8],
    ) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write().map_err(StorageError::database)?;

        {
            let mut table = write_txn
                .open_table(table)
                .map_err(StorageError::database)?;
            table.insert(key, value).map_err(StorageError::database)?;
        }

        write_txn.commit().map_err(StorageError::database)?;

        Ok(())
    }

    /// Get a value from a table
    pub fn get(
        &self,
        table: TableDefinition<&[u8], &[u8]>,
        key: &[u8],
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let read_txn = self.db.begin_read().map_err(StorageError::database)?;

        let table = read_txn
            .open_table(table)
            .map_err(StorageError::database)?;

        let value = table
            .get(key)
            .map_err(StorageError::database)?
            .map(|v| v.value().to_vec());

        Ok(value)
    }
}
