//! Tenant configuration
//!
//! A tenant owns the default `VolumeOptions` its volumes start from before
//! per-volume overrides are merged in.

use crate::error::VolumeError;
use crate::volume::VolumeOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-tenant settings as persisted under `<root>/tenants/<tenant>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfig {
    #[serde(rename = "default-options", default)]
    pub default_volume_options: VolumeOptions,
}

impl TenantConfig {
    pub fn new(default_volume_options: VolumeOptions) -> Self {
        Self {
            default_volume_options,
        }
    }

    /// Tenant defaults must themselves describe a usable volume.
    pub fn validate(&self) -> Result<(), VolumeError> {
        self.default_volume_options.validate()?;
        Ok(())
    }
}

/// Source of tenant default options.
pub trait TenantDefaults {
    fn tenant_defaults(&self, tenant: &str) -> Result<VolumeOptions, VolumeError>;
}

/// Fixed set of tenants held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticTenants {
    tenants: HashMap<String, TenantConfig>,
}

impl StaticTenants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant(mut self, name: impl Into<String>, config: TenantConfig) -> Self {
        self.tenants.insert(name.into(), config);
        self
    }
}

impl TenantDefaults for StaticTenants {
    fn tenant_defaults(&self, tenant: &str) -> Result<VolumeOptions, VolumeError> {
        self.tenants
            .get(tenant)
            .map(|t| t.default_volume_options.clone())
            .ok_or_else(|| VolumeError::NotFound(format!("tenant {}", tenant)))
    }
}
