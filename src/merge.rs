//! Merge Engine
//!
//! Applies a flat map of dotted-key string options onto a typed configuration
//! value. Each type declares its field table through [`Mergeable`]; the engine
//! walks that table once, depth-first, and resolves every override key against
//! the resulting flat path map.
//!
//! Unrecognized keys are ignored. A value that does not parse for its field
//! fails the whole merge and leaves the target untouched.

mod field;

pub use field::{FieldSlot, LeafSlot, MergeField, Mergeable};

use crate::error::MergeError;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Flatten the field tree of `target` into dotted path -> assignable slot.
///
/// Nested fields are recursed into; their own key becomes a prefix and is
/// not itself present in the result.
pub fn field_paths<'a>(target: &'a mut dyn Mergeable) -> BTreeMap<String, LeafSlot<'a>> {
    let mut paths = BTreeMap::new();
    collect_paths("", target, &mut paths);
    paths
}

fn collect_paths<'a>(
    prefix: &str,
    target: &'a mut dyn Mergeable,
    paths: &mut BTreeMap<String, LeafSlot<'a>>,
) {
    for field in target.merge_fields() {
        let path = join_key(prefix, field.key);
        match field.slot {
            FieldSlot::Leaf(slot) => {
                let previous = paths.insert(path, slot);
                debug_assert!(previous.is_none(), "duplicate merge key in field table");
            }
            FieldSlot::Nested(child) => collect_paths(&path, child, paths),
        }
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    match (prefix.is_empty(), key.is_empty()) {
        (true, _) => key.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}.{}", prefix, key),
    }
}

/// Overwrite the fields of `target` named in `overrides`.
///
/// Every matching value is parsed before any field is written, so an error
/// leaves `target` exactly as it was. Overrides are examined in key order;
/// the first unparseable one is reported.
pub fn merge<T: Mergeable>(
    target: &mut T,
    overrides: &HashMap<String, String>,
) -> Result<(), MergeError> {
    let mut sorted: Vec<(&String, &String)> = overrides.iter().collect();
    sorted.sort();

    let mut paths = field_paths(target);
    let mut pending = Vec::with_capacity(sorted.len());

    for (key, raw) in sorted {
        match paths.remove(key.as_str()) {
            Some(slot) => pending.push(slot.prepare(key, raw)?),
            None => debug!(option = %key, "Ignoring unrecognized option"),
        }
    }

    for write in pending {
        write.apply();
    }

    Ok(())
}

/// Produce a new value from `defaults` with `overrides` applied.
///
/// `defaults` itself is never modified.
pub fn merged<T: Mergeable + Clone>(
    defaults: &T,
    overrides: &HashMap<String, String>,
) -> Result<T, MergeError> {
    let mut value = defaults.clone();
    merge(&mut value, overrides)?;
    Ok(value)
}

/// All dotted keys `T` accepts, sorted.
pub fn merge_keys<T: Mergeable + Default>() -> Vec<String> {
    let mut probe = T::default();
    field_paths(&mut probe).into_keys().collect()
}
