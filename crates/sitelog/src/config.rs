//! Per-kind log settings and host configuration
//!
//! [`LogStoreConfig`] is the effective runtime configuration of one log, read
//! from the settings store on every append. [`SitelogConfig`] is the host's
//! TOML file: where the database lives, how to log, and the per-kind settings
//! seeded the first time a database is opened.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use sitelog_core::LogKind;
use sitelog_logging::LogConfig;
use sitelog_storage::RedbStorageConfig;

/// Entry bound used when none is stored or the stored one is below 1
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Clamp raw admin input to a usable entry bound
pub fn clamp_max_entries(raw: i64) -> usize {
    if raw < 1 {
        DEFAULT_MAX_ENTRIES
    } else {
        usize::try_from(raw).unwrap_or(usize::MAX)
    }
}

fn deserialize_max_entries<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_max_entries)
}

/// Setting name holding whether a log accepts appends
pub fn enabled_setting(kind: &LogKind) -> String {
    format!("sitelog.{}.enabled", kind.as_str())
}

/// Setting name holding a log's entry bound
pub fn max_entries_setting(kind: &LogKind) -> String {
    format!("sitelog.{}.max_entries", kind.as_str())
}

/// Effective configuration of one log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogStoreConfig {
    /// When false, appends are dropped; reads and clears still work
    pub enabled: bool,
    /// Maximum number of entries kept, always at least 1
    #[serde(deserialize_with = "deserialize_max_entries")]
    pub max_entries: usize,
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl LogStoreConfig {
    /// Build a config from raw values, clamping the bound
    pub fn new(enabled: bool, max_entries: i64) -> Self {
        Self {
            enabled,
            max_entries: clamp_max_entries(max_entries),
        }
    }

    /// Copy with any zero bound replaced by the default
    pub fn normalized(self) -> Self {
        Self {
            max_entries: if self.max_entries == 0 {
                DEFAULT_MAX_ENTRIES
            } else {
                self.max_entries
            },
            ..self
        }
    }
}

/// Partial settings change from the admin surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub enabled: Option<bool>,
    /// Raw input; values below 1 clamp to [`DEFAULT_MAX_ENTRIES`]
    pub max_entries: Option<i64>,
}

impl SettingsUpdate {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn max_entries(max_entries: i64) -> Self {
        Self {
            max_entries: Some(max_entries),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.max_entries.is_none()
    }
}

/// How appends on one store coordinate the count, evict, insert sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityMode {
    /// No coordination; concurrent appends may briefly exceed the bound
    #[default]
    BestEffort,
    /// Appends on one store instance run one at a time, keeping the bound strict
    Serialized,
}

/// Errors loading a [`SitelogConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Database settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Path to the redb file
    pub db_path: PathBuf,
    /// Page cache size in bytes
    pub cache_size: usize,
}

impl Default for StorageSection {
    fn default() -> Self {
        let defaults = RedbStorageConfig::default();
        Self {
            db_path: defaults.db_path,
            cache_size: defaults.cache_size,
        }
    }
}

/// Host configuration file
///
/// ```toml
/// capacity_mode = "best_effort"
///
/// [storage]
/// db_path = "/var/lib/sitelog/sitelog.redb"
///
/// [logging]
/// default_level = "info"
///
/// [kinds.404]
/// max_entries = 500
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitelogConfig {
    pub storage: StorageSection,
    pub logging: LogConfig,
    pub capacity_mode: CapacityMode,
    /// Settings written for each kind when none are stored yet
    pub kinds: BTreeMap<String, LogStoreConfig>,
}

impl Default for SitelogConfig {
    fn default() -> Self {
        let kinds = [LogKind::NOT_FOUND, LogKind::MAIL, LogKind::SEARCH]
            .into_iter()
            .map(|kind| (kind.to_string(), LogStoreConfig::default()))
            .collect();

        Self {
            storage: StorageSection::default(),
            logging: LogConfig::default(),
            capacity_mode: CapacityMode::default(),
            kinds,
        }
    }
}

impl SitelogConfig {
    /// Parse a config from TOML text
    pub fn from_toml(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &contents)
    }

    /// Load a config file, using defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply a command-line log level to every output with its own level
    pub fn override_log_level(&mut self, level: &str) {
        self.logging.default_level = level.to_string();
        if self.logging.console.level.is_some() {
            self.logging.console.level = Some(level.to_string());
        }
    }

    /// Storage configuration for opening the database
    pub fn storage_config(&self) -> RedbStorageConfig {
        RedbStorageConfig {
            db_path: self.storage.db_path.clone(),
            cache_size: self.storage.cache_size,
        }
    }

    /// Seed settings per kind, with invalid kind names skipped
    pub fn seeded_kinds(&self) -> Vec<(LogKind, LogStoreConfig)> {
        self.kinds
            .iter()
            .map(|(name, config)| (LogKind::new(name.as_str()), config.normalized()))
            .filter(|(kind, _)| kind.is_valid())
            .collect()
    }
}
