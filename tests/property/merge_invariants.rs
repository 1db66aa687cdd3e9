//! Property-based tests for option merging and validation

use proptest::prelude::*;
use std::collections::HashMap;
use volconfig::error::ValidationError;
use volconfig::merge::merge;
use volconfig::volume::{SnapshotConfig, VolumeConfig, VolumeOptions};

const KNOWN_KEYS: [&str; 4] = ["size", "snapshots", "snapshots.frequency", "snapshots.keep"];

/// Override maps built only from recognised keys with parseable values.
fn valid_overrides() -> impl Strategy<Value = HashMap<String, String>> {
    (
        proptest::option::of(any::<u64>()),
        proptest::option::of(any::<bool>()),
        proptest::option::of("[a-z0-9]{0,6}"),
        proptest::option::of(any::<u32>()),
    )
        .prop_map(|(size, snapshots, frequency, keep)| {
            let mut map = HashMap::new();
            if let Some(v) = size {
                map.insert("size".to_string(), v.to_string());
            }
            if let Some(v) = snapshots {
                map.insert("snapshots".to_string(), v.to_string());
            }
            if let Some(v) = frequency {
                map.insert("snapshots.frequency".to_string(), v);
            }
            if let Some(v) = keep {
                map.insert("snapshots.keep".to_string(), v.to_string());
            }
            map
        })
}

fn any_options() -> impl Strategy<Value = VolumeOptions> {
    (any::<u64>(), any::<bool>(), "[a-z0-9]{0,6}", any::<u32>()).prop_map(
        |(size, use_snapshots, frequency, keep)| VolumeOptions {
            size,
            use_snapshots,
            snapshot: SnapshotConfig { frequency, keep },
        },
    )
}

proptest! {
    #[test]
    fn merge_sets_exactly_the_named_fields(overrides in valid_overrides()) {
        let mut options = VolumeOptions::default();
        merge(&mut options, &overrides).unwrap();

        let expected_size = overrides.get("size").map(|v| v.parse::<u64>().unwrap()).unwrap_or(0);
        let expected_snapshots = overrides.get("snapshots").map(|v| v == "true").unwrap_or(false);
        let expected_frequency = overrides.get("snapshots.frequency").cloned().unwrap_or_default();
        let expected_keep = overrides.get("snapshots.keep").map(|v| v.parse::<u32>().unwrap()).unwrap_or(0);

        prop_assert_eq!(options.size, expected_size);
        prop_assert_eq!(options.use_snapshots, expected_snapshots);
        prop_assert_eq!(options.snapshot.frequency, expected_frequency);
        prop_assert_eq!(options.snapshot.keep, expected_keep);
    }

    #[test]
    fn merge_is_idempotent(start in any_options(), overrides in valid_overrides()) {
        let mut once = start.clone();
        merge(&mut once, &overrides).unwrap();

        let mut twice = start;
        merge(&mut twice, &overrides).unwrap();
        merge(&mut twice, &overrides).unwrap();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn unknown_keys_change_nothing(
        start in any_options(),
        extra in proptest::collection::hash_map("[a-z]{1,8}(\\.[a-z]{1,8})?", ".*", 0..6),
    ) {
        let unknown: HashMap<String, String> = extra
            .into_iter()
            .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
            .collect();

        let mut options = start.clone();
        prop_assert!(merge(&mut options, &unknown).is_ok());
        prop_assert_eq!(options, start);
    }

    #[test]
    fn malformed_value_leaves_target_unchanged(
        start in any_options(),
        overrides in valid_overrides(),
        bad_key in prop::sample::select(vec!["size", "snapshots", "snapshots.keep"]),
        bad_value in "[a-z]{1,5}x",
    ) {
        let mut overrides = overrides;
        overrides.insert(bad_key.to_string(), bad_value);

        let mut options = start.clone();
        let err = merge(&mut options, &overrides).unwrap_err();

        prop_assert_eq!(err.key.as_str(), bad_key);
        prop_assert_eq!(options, start);
    }

    #[test]
    fn zero_size_is_always_rejected(options in any_options()) {
        let config = VolumeConfig::new("tank", "db", VolumeOptions { size: 0, ..options });
        prop_assert_eq!(config.validate(), Err(ValidationError::ZeroSize));
    }

    #[test]
    fn snapshot_schedule_rule(options in any_options()) {
        prop_assume!(options.size > 0);
        let options = VolumeOptions { use_snapshots: true, ..options };

        let usable = !options.snapshot.frequency.is_empty() && options.snapshot.keep > 0;
        if usable {
            prop_assert!(options.validate().is_ok());
        } else {
            prop_assert_eq!(options.validate(), Err(ValidationError::UnusableSnapshots));
        }
    }
}
