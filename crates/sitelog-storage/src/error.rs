//! Error types for sitelog-storage
//!
//! This module defines the error types used throughout the storage crate.

use sitelog_core::{RepositoryError, SettingsError};
use thiserror::Error;

/// Errors that can occur in storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during storage operations
    #[error("I/O error: {0}")]
    Io(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Error during serialization
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error during deserialization
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl StorageError {
    /// Create a new Database error
    pub fn database(message: impl ToString) -> Self {
        Self::Database(message.to_string())
    }

    /// Create a new Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create a new Deserialization error
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization(message.into())
    }
}

/// Convert from postcard Error to StorageError
impl From<postcard::Error> for StorageError {
    fn from(err: postcard::Error) -> Self {
        StorageError::Deserialization(err.to_string())
    }
}

impl From<StorageError> for RepositoryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(msg) => RepositoryError::Io(msg),
            StorageError::Database(msg) => RepositoryError::Database(msg),
            StorageError::Serialization(msg) => RepositoryError::Serialization(msg),
            StorageError::Deserialization(msg) => RepositoryError::Deserialization(msg),
        }
    }
}

impl From<StorageError> for SettingsError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(msg) => SettingsError::Io(msg),
            other => SettingsError::Database(other.to_string()),
        }
    }
}
