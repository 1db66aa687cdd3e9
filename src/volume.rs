//! Volume configuration types
//!
//! `VolumeOptions` is the user-tunable part of a volume and the target of
//! option merging; `VolumeConfig` adds the volume's identity.

use crate::error::ValidationError;
use crate::merge::{MergeField, Mergeable};
use serde::{Deserialize, Serialize};

/// Stored configuration of one volume, keyed by `(pool, name)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeConfig {
    pub name: String,
    pub pool: String,
    #[serde(default)]
    pub options: VolumeOptions,
}

/// Options a volume accepts at creation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeOptions {
    /// Capacity; must be nonzero.
    #[serde(default)]
    pub size: u64,

    #[serde(rename = "snapshots", default)]
    pub use_snapshots: bool,

    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Snapshot schedule. Only consulted when snapshots are enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Interval between snapshots, e.g. "10m". Not interpreted here.
    #[serde(default)]
    pub frequency: String,

    /// Number of snapshots retained.
    #[serde(default)]
    pub keep: u32,
}

impl Mergeable for VolumeOptions {
    fn merge_fields(&mut self) -> Vec<MergeField<'_>> {
        vec![
            MergeField::u64("size", &mut self.size),
            MergeField::flag("snapshots", &mut self.use_snapshots),
            MergeField::nested("", &mut self.snapshot),
        ]
    }
}

impl Mergeable for SnapshotConfig {
    fn merge_fields(&mut self) -> Vec<MergeField<'_>> {
        vec![
            MergeField::text("snapshots.frequency", &mut self.frequency),
            MergeField::u32("snapshots.keep", &mut self.keep),
        ]
    }
}

impl VolumeOptions {
    /// Check the options are usable. Rules are checked in order and the
    /// first failure is returned.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.size == 0 {
            return Err(ValidationError::ZeroSize);
        }

        if self.use_snapshots && (self.snapshot.frequency.is_empty() || self.snapshot.keep == 0) {
            return Err(ValidationError::UnusableSnapshots);
        }

        Ok(())
    }
}

impl VolumeConfig {
    pub fn new(pool: impl Into<String>, name: impl Into<String>, options: VolumeOptions) -> Self {
        Self {
            name: name.into(),
            pool: pool.into(),
            options,
        }
    }

    /// Validate the configuration before it is committed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.options.validate()
    }
}
