//! Key-Value Store
//!
//! Hierarchical key-value interface the configuration repository persists
//! through. Keys are `/`-separated paths; directories are implicit and exist
//! while at least one key lives below them.

pub mod memory;
pub mod persistence;

pub use memory::MemoryStore;
pub use persistence::SledStore;

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Store interface consumed by the repository.
///
/// Implementations return entries in key order, so `sorted` is always
/// honoured.
pub trait KeyValueStore {
    /// Fetch `key`. For a directory, `nodes` holds its children; with
    /// `recursive` set, their descendants as well.
    fn get(&self, key: &str, recursive: bool, sorted: bool) -> Result<Node, StoreError>;

    /// Write `value` at `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    /// Write `value` at `key` only if no live value is present.
    fn create(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    /// Remove `key`. Directories require `recursive`.
    fn delete(&self, key: &str, recursive: bool) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str, recursive: bool, sorted: bool) -> Result<Node, StoreError> {
        (**self).get(key, recursive, sorted)
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        (**self).set(key, value, ttl)
    }

    fn create(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        (**self).create(key, value, ttl)
    }

    fn delete(&self, key: &str, recursive: bool) -> Result<(), StoreError> {
        (**self).delete(key, recursive)
    }
}

/// A key with its value, or a directory with its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub key: String,
    /// Empty for directories.
    pub value: String,
    pub dir: bool,
    pub nodes: Vec<Node>,
}

impl Node {
    fn leaf(key: &str, value: String) -> Self {
        Self {
            key: key.to_string(),
            value,
            dir: false,
            nodes: Vec::new(),
        }
    }

    fn directory(key: &str, nodes: Vec<Node>) -> Self {
        Self {
            key: key.to_string(),
            value: String::new(),
            dir: true,
            nodes,
        }
    }
}

/// Value as held by a backend, with its optional expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredValue {
    pub value: String,
    /// Unix timestamp in milliseconds.
    pub expires_at: Option<i64>,
}

impl StoredValue {
    pub fn new(value: &str, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|ttl| now_millis().saturating_add(ttl.as_millis() as i64));
        Self {
            value: value.to_string(),
            expires_at,
        }
    }

    pub fn is_live(&self, now: i64) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Whether `candidate` is `key` itself or lies below it.
pub(crate) fn is_within(key: &str, candidate: &str) -> bool {
    match candidate.strip_prefix(key) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Proper ancestors of `key`, nearest first. `/a/b/c` yields `/a/b`, `/a`.
pub(crate) fn ancestors(key: &str) -> impl Iterator<Item = &str> {
    let mut current = key;
    std::iter::from_fn(move || {
        let idx = current.rfind('/')?;
        current = &current[..idx];
        if current.is_empty() {
            None
        } else {
            Some(current)
        }
    })
}

/// Assemble the node for `key` from every live entry at or below it.
pub(crate) fn build_node(
    key: &str,
    entries: Vec<(String, String)>,
    recursive: bool,
) -> Result<Node, StoreError> {
    let mut own = None;
    let mut descendants = Vec::new();
    for (k, v) in entries {
        if k == key {
            own = Some(v);
        } else {
            descendants.push((k, v));
        }
    }

    if descendants.is_empty() {
        return match own {
            Some(value) => Ok(Node::leaf(key, value)),
            None => Err(StoreError::KeyNotFound(key.to_string())),
        };
    }

    Ok(Node::directory(key, children(key, descendants, recursive)))
}

fn children(parent: &str, descendants: Vec<(String, String)>, recursive: bool) -> Vec<Node> {
    // segment -> (own value, deeper entries)
    let mut groups: BTreeMap<String, (Option<String>, Vec<(String, String)>)> = BTreeMap::new();

    for (k, v) in descendants {
        let rest = &k[parent.len() + 1..];
        let (segment, deeper) = match rest.find('/') {
            Some(idx) => (&rest[..idx], true),
            None => (rest, false),
        };
        let group = groups.entry(segment.to_string()).or_default();
        if deeper {
            group.1.push((k, v));
        } else {
            group.0 = Some(v);
        }
    }

    groups
        .into_iter()
        .map(|(segment, (own, deeper))| {
            let child_key = format!("{}/{}", parent, segment);
            if deeper.is_empty() {
                Node::leaf(&child_key, own.unwrap_or_default())
            } else if recursive {
                let nodes = children(&child_key, deeper, true);
                Node::directory(&child_key, nodes)
            } else {
                Node::directory(&child_key, Vec::new())
            }
        })
        .collect()
}
