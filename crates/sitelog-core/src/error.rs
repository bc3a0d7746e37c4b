//! Error types for sitelog

use thiserror::Error;

use crate::entry::LogKind;

/// Errors raised by a [`DocumentRepository`](crate::DocumentRepository)
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Repository I/O error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Errors raised by a [`SettingsStore`](crate::SettingsStore)
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Malformed setting {name}: {reason}")]
    Malformed { name: String, reason: String },
}

/// Errors surfaced by the log store to interactive callers
#[derive(Debug, Error)]
pub enum LogStoreError {
    /// The document repository or settings store failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The kind name cannot be used as a log
    #[error("Invalid log kind: {0:?}")]
    InvalidKind(String),
}

impl LogStoreError {
    /// Create an InvalidKind error
    pub fn invalid_kind(kind: &LogKind) -> Self {
        Self::InvalidKind(kind.as_str().to_string())
    }
}

impl From<RepositoryError> for LogStoreError {
    fn from(err: RepositoryError) -> Self {
        LogStoreError::StoreUnavailable(err.to_string())
    }
}

impl From<SettingsError> for LogStoreError {
    fn from(err: SettingsError) -> Self {
        LogStoreError::StoreUnavailable(err.to_string())
    }
}
