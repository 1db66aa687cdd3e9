//! CLI route: single route table and run context. Dispatches to the repository and output.

use crate::cli::output::{format_json, format_name_list, format_volume_table};
use crate::cli::parse::{
    parse_volume_ref, Commands, PoolCommands, TenantCommands, VolumeCommands,
};
use crate::config::{AppConfig, ConfigLoader, StoreBackend};
use crate::error::VolumeError;
use crate::merge::merge_keys;
use crate::repository::ConfigRepository;
use crate::store::{KeyValueStore, MemoryStore, SledStore};
use crate::tenant::TenantConfig;
use crate::volume::VolumeOptions;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Runtime context for CLI execution: loaded configuration and the repository.
pub struct RunContext {
    repository: ConfigRepository<Box<dyn KeyValueStore>>,
}

impl RunContext {
    /// Load configuration (explicit file, or layered sources rooted at `dir`)
    /// and open the configured store.
    pub fn new(dir: PathBuf, config_path: Option<PathBuf>) -> Result<Self, VolumeError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&dir)?,
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, VolumeError> {
        config.validate()?;

        let store: Box<dyn KeyValueStore> = match config.store.backend {
            StoreBackend::Sled => {
                debug!(path = %config.store.path.display(), "Opening sled store");
                Box::new(SledStore::new(&config.store.path)?)
            }
            StoreBackend::Memory => Box::new(MemoryStore::new()),
        };

        Ok(Self {
            repository: ConfigRepository::new(store, config.store.namespace()),
        })
    }

    pub fn repository(&self) -> &ConfigRepository<Box<dyn KeyValueStore>> {
        &self.repository
    }

    /// Execute a command, returning the text to print.
    pub fn execute(&self, command: &Commands) -> Result<String, VolumeError> {
        match command {
            Commands::Volume { command } => self.execute_volume(command),
            Commands::Pool {
                command: PoolCommands::List,
            } => {
                let pools = self.repository.list_pools()?;
                Ok(format_name_list("pool", &pools))
            }
            Commands::Tenant { command } => self.execute_tenant(command),
            Commands::Keys => Ok(merge_keys::<VolumeOptions>().join("\n")),
        }
    }

    fn execute_volume(&self, command: &VolumeCommands) -> Result<String, VolumeError> {
        match command {
            VolumeCommands::Create {
                tenant,
                volume,
                opts,
            } => {
                let (pool, name) = split_volume(volume)?;
                let overrides: HashMap<String, String> = opts.iter().cloned().collect();
                let config = self
                    .repository
                    .create_volume(name, tenant, pool, &overrides)?;
                format_json(&config)
            }
            VolumeCommands::Get { volume } => {
                let (pool, name) = split_volume(volume)?;
                format_json(&self.repository.get_volume(pool, name)?)
            }
            VolumeCommands::Remove { volume } => {
                let (pool, name) = split_volume(volume)?;
                self.repository.remove_volume(pool, name)?;
                Ok(format!("Removed volume {}/{}", pool, name))
            }
            VolumeCommands::List { pool } => {
                let volumes = self.repository.list_volumes(pool)?;
                Ok(format_volume_table(&volumes))
            }
        }
    }

    fn execute_tenant(&self, command: &TenantCommands) -> Result<String, VolumeError> {
        match command {
            TenantCommands::Upload { name, file } => {
                let config = read_tenant_file(file)?;
                self.repository.publish_tenant(name, &config)?;
                Ok(format!("Uploaded tenant {}", name))
            }
            TenantCommands::Get { name } => format_json(&self.repository.get_tenant(name)?),
            TenantCommands::Delete { name } => {
                self.repository.delete_tenant(name)?;
                Ok(format!("Deleted tenant {}", name))
            }
            TenantCommands::List => {
                let tenants = self.repository.list_tenants()?;
                Ok(format_name_list("tenant", &tenants))
            }
        }
    }
}

fn split_volume(volume: &str) -> Result<(&str, &str), VolumeError> {
    parse_volume_ref(volume).ok_or_else(|| VolumeError::InvalidIdentifier(volume.to_string()))
}

/// Read a tenant configuration; `.toml` files are TOML, anything else JSON.
pub fn read_tenant_file(path: &Path) -> Result<TenantConfig, VolumeError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        VolumeError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let is_toml = path.extension().and_then(|ext| ext.to_str()) == Some("toml");
    let parsed: Result<TenantConfig, String> = if is_toml {
        toml::from_str(&contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    };

    parsed.map_err(|e| {
        VolumeError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
    })
}
