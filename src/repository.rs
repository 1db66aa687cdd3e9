//! Configuration Repository
//!
//! Sequences volume and tenant operations against a [`KeyValueStore`]:
//! load tenant defaults, merge overrides, validate, persist. Holds no state
//! of its own between calls; existence races are settled by the store's
//! conditional create.

use crate::error::{StoreError, VolumeError};
use crate::merge::merged;
use crate::namespace::{child_name, Namespace};
use crate::store::{KeyValueStore, Node};
use crate::tenant::{TenantConfig, TenantDefaults};
use crate::volume::{VolumeConfig, VolumeOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

pub struct ConfigRepository<S> {
    store: S,
    namespace: Namespace,
}

fn decode<T: DeserializeOwned>(key: &str, value: &str) -> Result<T, VolumeError> {
    serde_json::from_str(value).map_err(|e| VolumeError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<String, VolumeError> {
    serde_json::to_string(value).map_err(|e| {
        VolumeError::Store(StoreError::Encoding(format!(
            "Failed to encode value for {}: {}",
            key, e
        )))
    })
}

/// Map a missing key onto `NotFound`, pass everything else through.
fn not_found(what: String) -> impl FnOnce(StoreError) -> VolumeError {
    move |err| match err {
        StoreError::KeyNotFound(_) => VolumeError::NotFound(what),
        other => VolumeError::Store(other),
    }
}

impl<S: KeyValueStore> ConfigRepository<S> {
    pub fn new(store: S, namespace: Namespace) -> Self {
        Self { store, namespace }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Children of a directory key, or nothing if it does not exist yet.
    fn list_dir(&self, key: &str) -> Result<Vec<Node>, VolumeError> {
        match self.store.get(key, true, true) {
            Ok(node) => Ok(node.nodes),
            Err(StoreError::KeyNotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Create a volume from the tenant's stored defaults.
    pub fn create_volume(
        &self,
        name: &str,
        tenant: &str,
        pool: &str,
        overrides: &HashMap<String, String>,
    ) -> Result<VolumeConfig, VolumeError> {
        self.create_volume_from(self, name, tenant, pool, overrides)
    }

    /// Create a volume, reading tenant defaults from `tenants`.
    ///
    /// Fails with `AlreadyExists` if `(pool, name)` is taken; the stored
    /// entry is not touched in that case. The merged configuration is
    /// validated before it is written.
    pub fn create_volume_from<T: TenantDefaults + ?Sized>(
        &self,
        tenants: &T,
        name: &str,
        tenant: &str,
        pool: &str,
        overrides: &HashMap<String, String>,
    ) -> Result<VolumeConfig, VolumeError> {
        let key = self.namespace.volume(pool, name)?;
        let already_exists = || VolumeError::AlreadyExists {
            pool: pool.to_string(),
            name: name.to_string(),
        };

        match self.store.get(&key, false, false) {
            Ok(_) => return Err(already_exists()),
            Err(StoreError::KeyNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let defaults = tenants.tenant_defaults(tenant)?;
        let options = merged(&defaults, overrides)?;
        let config = VolumeConfig::new(pool, name, options);
        config.validate()?;

        let value = encode(&key, &config)?;
        self.store
            .create(&key, &value, None)
            .map_err(|err| match err {
                StoreError::KeyExists(_) => already_exists(),
                other => VolumeError::Store(other),
            })?;

        info!(pool, volume = name, tenant, "Volume created");
        Ok(config)
    }

    pub fn get_volume(&self, pool: &str, name: &str) -> Result<VolumeConfig, VolumeError> {
        let key = self.namespace.volume(pool, name)?;
        let node = self
            .store
            .get(&key, false, false)
            .map_err(not_found(format!("volume {}/{}", pool, name)))?;
        decode(&key, &node.value)
    }

    /// Remove a volume's configuration. A missing volume is `NotFound`.
    pub fn remove_volume(&self, pool: &str, name: &str) -> Result<(), VolumeError> {
        let key = self.namespace.volume(pool, name)?;
        self.store
            .delete(&key, true)
            .map_err(not_found(format!("volume {}/{}", pool, name)))?;
        info!(pool, volume = name, "Volume removed");
        Ok(())
    }

    /// Volume name -> configuration for every live volume in `pool`.
    ///
    /// Entries with an empty value are skipped.
    pub fn list_volumes(&self, pool: &str) -> Result<BTreeMap<String, VolumeConfig>, VolumeError> {
        let pool_key = self.namespace.pool(pool)?;
        let mut volumes = BTreeMap::new();

        for node in self.list_dir(&pool_key)? {
            if node.dir || node.value.is_empty() {
                debug!(key = %node.key, "Skipping empty entry");
                continue;
            }
            let Some(name) = child_name(&pool_key, &node.key) else {
                continue;
            };
            let config: VolumeConfig = decode(&node.key, &node.value)?;
            volumes.insert(name.to_string(), config);
        }

        Ok(volumes)
    }

    /// Pools that have at least one entry under the volume namespace.
    pub fn list_pools(&self) -> Result<Vec<String>, VolumeError> {
        let root = self.namespace.volume_root();
        Ok(self
            .list_dir(&root)?
            .iter()
            .filter_map(|node| child_name(&root, &node.key))
            .map(str::to_string)
            .collect())
    }

    /// Store (or replace) a tenant's configuration after validating it.
    pub fn publish_tenant(&self, tenant: &str, config: &TenantConfig) -> Result<(), VolumeError> {
        let key = self.namespace.tenant(tenant)?;
        config.validate()?;
        let value = encode(&key, config)?;
        self.store.set(&key, &value, None)?;
        info!(tenant, "Tenant published");
        Ok(())
    }

    pub fn get_tenant(&self, tenant: &str) -> Result<TenantConfig, VolumeError> {
        let key = self.namespace.tenant(tenant)?;
        let node = self
            .store
            .get(&key, false, false)
            .map_err(not_found(format!("tenant {}", tenant)))?;
        decode(&key, &node.value)
    }

    pub fn delete_tenant(&self, tenant: &str) -> Result<(), VolumeError> {
        let key = self.namespace.tenant(tenant)?;
        self.store
            .delete(&key, false)
            .map_err(not_found(format!("tenant {}", tenant)))?;
        info!(tenant, "Tenant deleted");
        Ok(())
    }

    pub fn list_tenants(&self) -> Result<Vec<String>, VolumeError> {
        let root = self.namespace.tenant_root();
        Ok(self
            .list_dir(&root)?
            .iter()
            .filter(|node| !node.dir && !node.value.is_empty())
            .filter_map(|node| child_name(&root, &node.key))
            .map(str::to_string)
            .collect())
    }
}

impl<S: KeyValueStore> TenantDefaults for ConfigRepository<S> {
    fn tenant_defaults(&self, tenant: &str) -> Result<VolumeOptions, VolumeError> {
        Ok(self.get_tenant(tenant)?.default_volume_options)
    }
}
