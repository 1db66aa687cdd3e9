//! In-memory key-value store

use crate::error::StoreError;
use crate::store::{ancestors, build_node, is_within, now_millis, KeyValueStore, Node, StoredValue};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::time::Duration;

/// Non-durable store backed by an ordered map. Same semantics as
/// [`SledStore`](crate::store::SledStore).
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, StoredValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now = now_millis();
        self.entries.read().values().filter(|v| v.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn live_under(entries: &BTreeMap<String, StoredValue>, key: &str, now: i64) -> Vec<(String, String)> {
    entries
        .range::<str, _>((Bound::Included(key), Bound::Unbounded))
        .take_while(|(k, _)| k.starts_with(key))
        .filter(|(k, v)| is_within(key, k) && v.is_live(now))
        .map(|(k, v)| (k.clone(), v.value.clone()))
        .collect()
}

fn check_placement(
    entries: &BTreeMap<String, StoredValue>,
    key: &str,
    now: i64,
) -> Result<(), StoreError> {
    for ancestor in ancestors(key) {
        if entries.get(ancestor).is_some_and(|v| v.is_live(now)) {
            return Err(StoreError::NotAFile(ancestor.to_string()));
        }
    }
    if live_under(entries, key, now).iter().any(|(k, _)| k != key) {
        return Err(StoreError::NotAFile(key.to_string()));
    }
    Ok(())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str, recursive: bool, _sorted: bool) -> Result<Node, StoreError> {
        let entries = self.entries.read();
        build_node(key, live_under(&entries, key, now_millis()), recursive)
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        check_placement(&entries, key, now_millis())?;
        entries.insert(key.to_string(), StoredValue::new(value, ttl));
        Ok(())
    }

    fn create(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        let now = now_millis();
        if entries.get(key).is_some_and(|v| v.is_live(now)) {
            return Err(StoreError::KeyExists(key.to_string()));
        }
        check_placement(&entries, key, now)?;
        entries.insert(key.to_string(), StoredValue::new(value, ttl));
        Ok(())
    }

    fn delete(&self, key: &str, recursive: bool) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        let matched: Vec<String> = live_under(&entries, key, now_millis())
            .into_iter()
            .map(|(k, _)| k)
            .collect();

        if matched.is_empty() {
            return Err(StoreError::KeyNotFound(key.to_string()));
        }
        if !recursive && matched.iter().any(|k| k != key) {
            return Err(StoreError::NotAFile(key.to_string()));
        }

        for k in matched {
            entries.remove(&k);
        }
        Ok(())
    }
}
