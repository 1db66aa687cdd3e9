//! Error types for volume configuration management.

use thiserror::Error;

/// Errors surfaced by a key-value store backend.
///
/// The repository passes these through without inspecting them, apart from
/// mapping `KeyNotFound` and `KeyExists` onto the operation-level kinds.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Key already exists: {0}")]
    KeyExists(String),

    #[error("Key is a directory: {0}")]
    NotAFile(String),

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Store encoding error: {0}")]
    Encoding(String),
}

/// An override value that could not be parsed into its field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value {value:?} for option '{key}': {reason}")]
pub struct MergeError {
    pub key: String,
    pub value: String,
    pub reason: String,
}

/// Semantic rule violations found by `VolumeOptions::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Volume size must be greater than zero")]
    ZeroSize,

    #[error("Snapshots are enabled but the frequency or keep count is unset")]
    UnusableSnapshots,
}

/// Operation-level errors returned by the configuration repository.
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("Volume {pool}/{name} already exists")]
    AlreadyExists { pool: String, name: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid identifier {0:?}: must be non-empty, must not contain '/' and must not be '.' or '..'")]
    InvalidIdentifier(String),

    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to decode stored value at {key}: {reason}")]
    Decode { key: String, reason: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for VolumeError {
    fn from(err: config::ConfigError) -> Self {
        VolumeError::ConfigError(err.to_string())
    }
}
