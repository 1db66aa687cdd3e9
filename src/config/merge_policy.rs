//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use std::path::PathBuf;

use crate::namespace::DEFAULT_ROOT;

/// Default location of the sled database: the platform data directory, or
/// `.volconfig/store` when none can be determined.
pub fn default_store_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "volconfig")
        .map(|dirs| dirs.data_dir().join("store"))
        .unwrap_or_else(|| PathBuf::from(".volconfig/store"))
}

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("store.backend", "sled")?
        .set_default(
            "store.path",
            default_store_path().to_string_lossy().to_string(),
        )?
        .set_default("store.root", DEFAULT_ROOT)
}
