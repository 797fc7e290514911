// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flattening of nested documents into key-path addressable entries.

use crate::domain::{KeyPath, RawValue};
use std::collections::HashMap;

/// A flat view of a nested raw value tree.
///
/// Every mapping entry becomes addressable by its full key path. Intermediate
/// mappings are stored whole as well, so a lookup of `db` returns the entire
/// `db` mapping while `db.host` returns the leaf. Sequences are never split.
///
/// Map keys are lower-cased like every [`KeyPath`] segment; keys that cannot
/// form a segment (the empty string) are skipped.
#[derive(Debug, Clone, Default)]
pub struct FlatStore {
    entries: HashMap<KeyPath, RawValue>,
}

impl FlatStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens `tree`. A tree that is not a mapping has no addressable
    /// entries.
    pub fn from_tree(tree: &RawValue) -> Self {
        let mut store = Self::new();
        match tree {
            RawValue::Map(map) => {
                for (key, value) in map {
                    match KeyPath::new([key]) {
                        Ok(path) => store.flatten(path, value),
                        Err(_) => tracing::debug!("Skipping entry with an empty key"),
                    }
                }
            }
            RawValue::Null => {}
            other => tracing::debug!(
                "Document root is a {}, not a mapping; no keys are addressable",
                other.type_name()
            ),
        }
        store
    }

    fn flatten(&mut self, path: KeyPath, value: &RawValue) {
        if let RawValue::Map(map) = value {
            for (key, child) in map {
                match path.child(key) {
                    Ok(child_path) => self.flatten(child_path, child),
                    Err(_) => tracing::debug!("Skipping empty key under '{}'", path),
                }
            }
        }
        self.entries.insert(path, value.clone());
    }

    /// Returns the entry at `key`.
    pub fn get(&self, key: &KeyPath) -> Option<&RawValue> {
        self.entries.get(key)
    }

    /// Returns every addressable key, sorted.
    pub fn keys(&self) -> Vec<KeyPath> {
        let mut keys: Vec<KeyPath> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the number of addressable entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is addressable.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
