//! Integration tests for configuration loading and the CLI run context

use tempfile::TempDir;
use volconfig::cli::{Commands, RunContext, TenantCommands, VolumeCommands};
use volconfig::config::{ConfigLoader, StoreBackend, LOCAL_CONFIG_FILE};

fn write_config(dir: &TempDir, store_path: &std::path::Path) -> std::path::PathBuf {
    let path = dir.path().join(LOCAL_CONFIG_FILE);
    std::fs::write(
        &path,
        format!(
            r#"
[store]
backend = "sled"
path = {:?}
root = "/itest"
"#,
            store_path.display().to_string()
        ),
    )
    .unwrap();
    path
}

#[test]
fn test_load_local_file() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store");
    write_config(&temp_dir, &store_path);

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.store.backend, StoreBackend::Sled);
    assert_eq!(config.store.path, store_path);
    assert_eq!(config.store.root, "/itest");
    assert!(config.validate().is_ok());
}

#[test]
fn test_run_context_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store");
    let config_path = write_config(&temp_dir, &store_path);

    let tenant_file = temp_dir.path().join("acme.json");
    std::fs::write(
        &tenant_file,
        r#"{"default-options":{"size":10,"snapshots":true,"snapshot":{"frequency":"1h","keep":3}}}"#,
    )
    .unwrap();

    let ctx = RunContext::new(temp_dir.path().to_path_buf(), Some(config_path)).unwrap();
    ctx.execute(&Commands::Tenant {
        command: TenantCommands::Upload {
            name: "acme".to_string(),
            file: tenant_file,
        },
    })
    .unwrap();

    ctx.execute(&Commands::Volume {
        command: VolumeCommands::Create {
            tenant: "acme".to_string(),
            volume: "tank/db".to_string(),
            opts: vec![("snapshots.keep".to_string(), "9".to_string())],
        },
    })
    .unwrap();

    let shown = ctx
        .execute(&Commands::Volume {
            command: VolumeCommands::Get {
                volume: "tank/db".to_string(),
            },
        })
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(value["options"]["snapshot"]["keep"], 9);
    assert_eq!(value["options"]["snapshot"]["frequency"], "1h");

    let listed = ctx
        .execute(&Commands::Volume {
            command: VolumeCommands::List {
                pool: "tank".to_string(),
            },
        })
        .unwrap();
    assert!(listed.contains("db"));
}
