//! Configuration System
//!
//! Application settings for the store backend, key namespace and logging.
//! Loaded hierarchically with environment variable overrides and validated
//! before use.

use crate::error::VolumeError;
use crate::logging::LoggingConfig;
use crate::namespace::{Namespace, DEFAULT_ROOT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge_policy;
mod sources;

pub use facade::{ConfigLoader, ENV_PREFIX};
pub use merge_policy::default_store_path;
pub use sources::global_file::global_config_path;
pub use sources::local_file::LOCAL_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which `KeyValueStore` implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sled,
    /// Nothing persists past the process; useful for dry runs.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,

    /// Sled database directory
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Key prefix all entries live under
    #[serde(default = "default_root")]
    pub root: String,
}

fn default_backend() -> StoreBackend {
    StoreBackend::Sled
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_store_path(),
            root: default_root(),
        }
    }
}

impl StoreSettings {
    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.root.clone())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.backend == StoreBackend::Sled && self.path.as_os_str().is_empty() {
            return Err("Store path cannot be empty".to_string());
        }
        if !self.root.starts_with('/') {
            return Err(format!("Store root must start with '/': {:?}", self.root));
        }
        if self.root.trim_end_matches('/').is_empty() {
            return Err("Store root cannot be '/' alone".to_string());
        }
        Ok(())
    }
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), VolumeError> {
        self.store
            .validate()
            .map_err(|e| VolumeError::ConfigError(format!("store: {}", e)))?;

        match self.logging.format.as_str() {
            "json" | "text" => Ok(()),
            other => Err(VolumeError::ConfigError(format!(
                "logging: invalid format {:?} (must be 'json' or 'text')",
                other
            ))),
        }
    }
}
