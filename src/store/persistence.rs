//! Sled-backed key-value store

use crate::error::StoreError;
use crate::store::{ancestors, build_node, is_within, now_millis, KeyValueStore, Node, StoredValue};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Durable implementation of [`KeyValueStore`].
///
/// Values are stored as bincode-encoded records carrying their expiry.
/// Expired records read as absent and are overwritten on the next write.
pub struct SledStore {
    db: sled::Db,
}

fn backend(context: &str, e: sled::Error) -> StoreError {
    StoreError::Backend(format!("{}: {}", context, e))
}

fn encode(record: &StoredValue) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(record)
        .map_err(|e| StoreError::Encoding(format!("Failed to serialize value: {}", e)))
}

fn decode(bytes: &[u8]) -> Result<StoredValue, StoreError> {
    bincode::deserialize(bytes)
        .map_err(|e| StoreError::Encoding(format!("Failed to deserialize value: {}", e)))
}

impl SledStore {
    /// Open (or create) a sled database at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| backend("Failed to open sled database", e))?;
        Ok(Self { db })
    }

    /// Throwaway database that is removed when dropped.
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| backend("Failed to open temporary sled database", e))?;
        Ok(Self { db })
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| backend("Failed to flush database", e))?;
        Ok(())
    }

    fn read_live(&self, key: &str, now: i64) -> Result<Option<StoredValue>, StoreError> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| backend("Failed to read key", e))?
        {
            Some(bytes) => {
                let record = decode(&bytes)?;
                Ok(record.is_live(now).then_some(record))
            }
            None => Ok(None),
        }
    }

    /// Every live entry at or below `key`, in key order.
    fn live_under(&self, key: &str, now: i64) -> Result<Vec<(String, String)>, StoreError> {
        let mut found = Vec::new();
        for item in self.db.scan_prefix(key.as_bytes()) {
            let (k, v) = item.map_err(|e| backend("Failed to iterate store", e))?;
            let k = String::from_utf8(k.to_vec())
                .map_err(|e| StoreError::Encoding(format!("Non UTF-8 key in store: {}", e)))?;
            if !is_within(key, &k) {
                continue;
            }
            let record = decode(&v)?;
            if record.is_live(now) {
                found.push((k, record.value));
            }
        }
        Ok(found)
    }

    fn check_placement(&self, key: &str, now: i64) -> Result<(), StoreError> {
        for ancestor in ancestors(key) {
            if self.read_live(ancestor, now)?.is_some() {
                return Err(StoreError::NotAFile(ancestor.to_string()));
            }
        }
        if self.live_under(key, now)?.iter().any(|(k, _)| k != key) {
            return Err(StoreError::NotAFile(key.to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str, recursive: bool, _sorted: bool) -> Result<Node, StoreError> {
        build_node(key, self.live_under(key, now_millis())?, recursive)
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        self.check_placement(key, now_millis())?;
        let bytes = encode(&StoredValue::new(value, ttl))?;
        self.db
            .insert(key.as_bytes(), bytes)
            .map_err(|e| backend("Failed to write key", e))?;
        Ok(())
    }

    fn create(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let bytes = encode(&StoredValue::new(value, ttl))?;

        loop {
            let now = now_millis();
            let current = self
                .db
                .get(key.as_bytes())
                .map_err(|e| backend("Failed to read key", e))?;

            if let Some(existing) = &current {
                if decode(existing)?.is_live(now) {
                    return Err(StoreError::KeyExists(key.to_string()));
                }
            }
            self.check_placement(key, now)?;

            let swapped = self
                .db
                .compare_and_swap(key.as_bytes(), current, Some(bytes.as_slice()))
                .map_err(|e| backend("Failed to create key", e))?;

            match swapped {
                Ok(()) => return Ok(()),
                Err(_) => debug!(key = %key, "Concurrent write during create, retrying"),
            }
        }
    }

    fn delete(&self, key: &str, recursive: bool) -> Result<(), StoreError> {
        let matched = self.live_under(key, now_millis())?;

        if matched.is_empty() {
            return Err(StoreError::KeyNotFound(key.to_string()));
        }
        if !recursive && matched.iter().any(|(k, _)| k != key) {
            return Err(StoreError::NotAFile(key.to_string()));
        }

        let mut batch = sled::Batch::default();
        for (k, _) in matched {
            batch.remove(k.as_bytes());
        }
        self.db
            .apply_batch(batch)
            .map_err(|e| backend("Failed to apply batch", e))?;
        Ok(())
    }
}
