//! Configuration loading entry point.

use crate::config::merge_policy::builder_with_defaults;
use crate::config::sources::{global_file, local_file};
use crate::config::AppConfig;
use config::{ConfigError, Environment, File};
use std::path::Path;

pub const ENV_PREFIX: &str = "VOLCONFIG";

/// Loads `AppConfig` from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global file, then `<dir>/volconfig.toml`, then
    /// `VOLCONFIG_*` environment variables (`__` separates nested keys).
    pub fn load(dir: &Path) -> Result<AppConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = local_file::add_to_builder(builder, dir)?;
        builder
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Defaults plus a single explicit file, which must exist.
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
        builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

/// `VOLCONFIG_STORE__ROOT` sets `store.root`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
