//! Storage key namespace
//!
//! Maps pools, volumes and tenants onto hierarchical store keys:
//!
//! ```text
//! <root>/volume/<pool>/<name>
//! <root>/tenants/<tenant>
//! ```
//!
//! Identifiers are validated rather than escaped: a name that is empty,
//! contains the `/` separator, or is `.`/`..` is rejected.

use crate::error::VolumeError;

pub const DEFAULT_ROOT: &str = "/volplugin";

const VOLUME_DIR: &str = "volume";
const TENANT_DIR: &str = "tenants";
const SEPARATOR: char = '/';

/// Key layout under a fixed root prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    root: String,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

impl Namespace {
    /// Trailing separators on `root` are dropped.
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        let trimmed = root.trim_end_matches(SEPARATOR);
        Self {
            root: trimmed.to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    fn prefixed(&self, segments: &[&str]) -> String {
        let mut key = self.root.clone();
        for segment in segments {
            key.push(SEPARATOR);
            key.push_str(segment);
        }
        key
    }

    /// `<root>/volume`
    pub fn volume_root(&self) -> String {
        self.prefixed(&[VOLUME_DIR])
    }

    /// `<root>/volume/<pool>`
    pub fn pool(&self, pool: &str) -> Result<String, VolumeError> {
        check_identifier(pool)?;
        Ok(self.prefixed(&[VOLUME_DIR, pool]))
    }

    /// `<root>/volume/<pool>/<name>`
    pub fn volume(&self, pool: &str, name: &str) -> Result<String, VolumeError> {
        check_identifier(pool)?;
        check_identifier(name)?;
        Ok(self.prefixed(&[VOLUME_DIR, pool, name]))
    }

    /// `<root>/tenants`
    pub fn tenant_root(&self) -> String {
        self.prefixed(&[TENANT_DIR])
    }

    /// `<root>/tenants/<tenant>`
    pub fn tenant(&self, tenant: &str) -> Result<String, VolumeError> {
        check_identifier(tenant)?;
        Ok(self.prefixed(&[TENANT_DIR, tenant]))
    }
}

/// Reject identifiers that would not map onto exactly one key segment.
pub fn check_identifier(id: &str) -> Result<(), VolumeError> {
    if id.is_empty() || id == "." || id == ".." || id.contains(SEPARATOR) {
        return Err(VolumeError::InvalidIdentifier(id.to_string()));
    }
    Ok(())
}

/// Last segment of `key` relative to `parent`, if `key` is a direct child.
pub fn child_name<'a>(parent: &str, key: &'a str) -> Option<&'a str> {
    let rest = key.strip_prefix(parent)?.strip_prefix(SEPARATOR)?;
    if rest.is_empty() || rest.contains(SEPARATOR) {
        None
    } else {
        Some(rest)
    }
}
