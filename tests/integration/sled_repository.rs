//! Integration tests for the configuration repository over the sled store

use std::collections::HashMap;
use tempfile::TempDir;
use volconfig::error::VolumeError;
use volconfig::namespace::Namespace;
use volconfig::repository::ConfigRepository;
use volconfig::store::SledStore;
use volconfig::tenant::TenantConfig;
use volconfig::volume::VolumeOptions;

fn publish_default_tenant(repo: &ConfigRepository<SledStore>) {
    repo.publish_tenant(
        "acme",
        &TenantConfig::new(VolumeOptions {
            size: 100,
            ..Default::default()
        }),
    )
    .unwrap();
}

#[test]
fn test_volumes_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = SledStore::new(temp_dir.path()).unwrap();
        let repo = ConfigRepository::new(store, Namespace::default());
        publish_default_tenant(&repo);
        repo.create_volume("db", "acme", "tank", &HashMap::new())
            .unwrap();
        repo.store().flush().unwrap();
    }

    let store = SledStore::new(temp_dir.path()).unwrap();
    let repo = ConfigRepository::new(store, Namespace::default());

    let config = repo.get_volume("tank", "db").unwrap();
    assert_eq!(config.options.size, 100);
    assert_eq!(repo.list_pools().unwrap(), vec!["tank"]);
    assert_eq!(repo.list_tenants().unwrap(), vec!["acme"]);
}

#[test]
fn test_sled_create_conflict_and_delete() {
    let temp_dir = TempDir::new().unwrap();
    let repo = ConfigRepository::new(SledStore::new(temp_dir.path()).unwrap(), Namespace::default());
    publish_default_tenant(&repo);

    repo.create_volume("db", "acme", "tank", &HashMap::new())
        .unwrap();
    assert!(matches!(
        repo.create_volume("db", "acme", "tank", &HashMap::new()),
        Err(VolumeError::AlreadyExists { .. })
    ));

    repo.remove_volume("tank", "db").unwrap();
    assert!(matches!(
        repo.get_volume("tank", "db"),
        Err(VolumeError::NotFound(_))
    ));
    assert!(repo.list_volumes("tank").unwrap().is_empty());
}

#[test]
fn test_undecodable_entry_is_reported() {
    use volconfig::store::KeyValueStore;

    let repo = ConfigRepository::new(SledStore::temporary().unwrap(), Namespace::default());
    repo.store()
        .set("/volplugin/volume/tank/broken", "not json", None)
        .unwrap();

    assert!(matches!(
        repo.get_volume("tank", "broken"),
        Err(VolumeError::Decode { .. })
    ));
    assert!(matches!(
        repo.list_volumes("tank"),
        Err(VolumeError::Decode { .. })
    ));
}
