//! Integration tests for the configuration repository over the in-memory store

use std::collections::HashMap;
use volconfig::error::{ValidationError, VolumeError};
use volconfig::namespace::Namespace;
use volconfig::repository::ConfigRepository;
use volconfig::store::{KeyValueStore, MemoryStore};
use volconfig::tenant::TenantConfig;
use volconfig::volume::{SnapshotConfig, VolumeOptions};

fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn repository_with_tenant() -> ConfigRepository<MemoryStore> {
    let repo = ConfigRepository::new(MemoryStore::new(), Namespace::default());
    repo.publish_tenant(
        "acme",
        &TenantConfig::new(VolumeOptions {
            size: 1,
            use_snapshots: false,
            snapshot: SnapshotConfig::default(),
        }),
    )
    .unwrap();
    repo
}

#[test]
fn test_create_applies_documented_override_example() {
    let repo = repository_with_tenant();
    let config = repo
        .create_volume(
            "db",
            "acme",
            "tank",
            &overrides(&[
                ("size", "10"),
                ("snapshots", "false"),
                ("snapshots.frequency", "10m"),
                ("snapshots.keep", "20"),
            ]),
        )
        .unwrap();

    assert_eq!(config.options.size, 10);
    assert!(!config.options.use_snapshots);
    assert_eq!(config.options.snapshot.frequency, "10m");
    assert_eq!(config.options.snapshot.keep, 20);
}

#[test]
fn test_persisted_document_is_field_named() {
    let repo = repository_with_tenant();
    repo.create_volume("db", "acme", "tank", &overrides(&[("size", "7")]))
        .unwrap();

    let node = repo
        .store()
        .get("/volplugin/volume/tank/db", false, false)
        .unwrap();
    let doc: serde_json::Value = serde_json::from_str(&node.value).unwrap();
    assert_eq!(doc["name"], "db");
    assert_eq!(doc["pool"], "tank");
    assert_eq!(doc["options"]["size"], 7);
}

#[test]
fn test_unknown_override_keys_are_ignored() {
    let repo = repository_with_tenant();
    let config = repo
        .create_volume(
            "db",
            "acme",
            "tank",
            &overrides(&[("filesystem", "ext4"), ("size", "3")]),
        )
        .unwrap();
    assert_eq!(config.options.size, 3);
}

#[test]
fn test_snapshots_without_schedule_are_rejected() {
    let repo = repository_with_tenant();
    let err = repo
        .create_volume("db", "acme", "tank", &overrides(&[("snapshots", "true")]))
        .unwrap_err();
    assert!(matches!(
        err,
        VolumeError::Validation(ValidationError::UnusableSnapshots)
    ));
    assert!(repo.list_pools().unwrap().is_empty());
}

#[test]
fn test_existing_volume_is_not_overwritten() {
    let repo = repository_with_tenant();
    let first = repo
        .create_volume("db", "acme", "tank", &overrides(&[("size", "5")]))
        .unwrap();

    let err = repo
        .create_volume("db", "acme", "tank", &overrides(&[("size", "50")]))
        .unwrap_err();

    match err {
        VolumeError::AlreadyExists { pool, name } => {
            assert_eq!(pool, "tank");
            assert_eq!(name, "db");
        }
        other => panic!("expected AlreadyExists, got {}", other),
    }
    assert_eq!(repo.get_volume("tank", "db").unwrap(), first);
}

#[test]
fn test_same_name_in_different_pools() {
    let repo = repository_with_tenant();
    repo.create_volume("db", "acme", "tank", &HashMap::new())
        .unwrap();
    repo.create_volume("db", "acme", "fast", &overrides(&[("size", "2")]))
        .unwrap();

    assert_eq!(repo.get_volume("tank", "db").unwrap().options.size, 1);
    assert_eq!(repo.get_volume("fast", "db").unwrap().options.size, 2);
}

#[test]
fn test_list_by_pool_skips_tombstones() {
    let repo = repository_with_tenant();
    repo.create_volume("live", "acme", "tank", &HashMap::new())
        .unwrap();
    repo.store()
        .set("/volplugin/volume/tank/gone", "", None)
        .unwrap();

    let volumes = repo.list_volumes("tank").unwrap();
    assert_eq!(volumes.keys().collect::<Vec<_>>(), vec!["live"]);
    assert_eq!(volumes["live"].pool, "tank");
}

#[test]
fn test_list_pools_and_remove() {
    let repo = repository_with_tenant();
    for (pool, name) in [("tank", "a"), ("tank", "b"), ("fast", "c")] {
        repo.create_volume(name, "acme", pool, &HashMap::new())
            .unwrap();
    }
    assert_eq!(repo.list_pools().unwrap(), vec!["fast", "tank"]);

    repo.remove_volume("fast", "c").unwrap();
    assert_eq!(repo.list_pools().unwrap(), vec!["tank"]);
    assert_eq!(repo.list_volumes("tank").unwrap().len(), 2);
}

#[test]
fn test_custom_namespace_root() {
    let repo = ConfigRepository::new(MemoryStore::new(), Namespace::new("/cluster-b"));
    repo.publish_tenant(
        "acme",
        &TenantConfig::new(VolumeOptions {
            size: 1,
            ..Default::default()
        }),
    )
    .unwrap();
    repo.create_volume("db", "acme", "tank", &HashMap::new())
        .unwrap();

    assert!(repo
        .store()
        .get("/cluster-b/volume/tank/db", false, false)
        .is_ok());
    assert!(repo
        .store()
        .get("/volplugin/volume/tank/db", false, false)
        .is_err());
}
