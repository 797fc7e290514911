// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory configuration source adapter.
//!
//! This module provides an adapter over a literal mapping. It is the usual way to
//! supply storage-level defaults behind file and environment sources, and the
//! simplest source to use in tests.

use crate::adapters::flat::FlatStore;
use crate::domain::{KeyPath, RawValue, Result};
use crate::ports::ConfigSource;

/// Configuration source adapter for an in-memory mapping.
///
/// The mapping is flattened once at construction: nested mappings are
/// addressable whole and leaf by leaf.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::DictAdapter;
/// use layercfg::ports::ConfigSource;
///
/// let adapter = DictAdapter::from_pairs([("app.port", "9000"), ("app.host", "localhost")]).unwrap();
/// assert!(adapter.get_str("app.port").unwrap().is_some());
/// assert!(adapter.get_str("app").unwrap().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct DictAdapter {
    name: String,
    store: FlatStore,
}

impl DictAdapter {
    /// Creates an adapter over a nested raw value tree.
    pub fn new(tree: RawValue) -> Self {
        let store = FlatStore::from_tree(&tree);
        tracing::debug!("Loaded {} in-memory configuration entries", store.len());
        Self {
            name: "dict".to_string(),
            store,
        }
    }

    /// Creates an adapter from dotted keys and values.
    ///
    /// `"db.host"` is stored under the nested mapping `db`, so both `db` and
    /// `db.host` are addressable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKey` if a key has an empty segment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
    {
        let mut tree = RawValue::Map(Default::default());
        for (key, value) in pairs {
            let path = KeyPath::parse(key.as_ref())?;
            tree.insert_path(path.segments(), value.into());
        }
        Ok(Self::new(tree))
    }

    /// Creates an adapter with no entries.
    pub fn empty() -> Self {
        Self::new(RawValue::Null)
    }

    /// Renames the source, for clearer diagnostics when several in-memory
    /// sources are chained.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl ConfigSource for DictAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &KeyPath) -> Result<Option<RawValue>> {
        Ok(self.store.get(key).cloned())
    }

    fn all_keys(&self) -> Result<Vec<KeyPath>> {
        Ok(self.store.keys())
    }
}

impl From<RawValue> for DictAdapter {
    fn from(tree: RawValue) -> Self {
        Self::new(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dict_adapter_name() {
        assert_eq!(DictAdapter::empty().name(), "dict");
        assert_eq!(DictAdapter::empty().with_name("defaults").name(), "defaults");
    }

    #[test]
    fn test_dict_adapter_nested_tree() {
        let tree: RawValue = [(
            "app",
            [("port", RawValue::from("9000"))].into_iter().collect::<RawValue>(),
        )]
        .into_iter()
        .collect();
        let adapter = DictAdapter::new(tree);

        assert_eq!(
            adapter.get_str("app.port").unwrap(),
            Some(RawValue::from("9000"))
        );
        assert!(adapter.get_str("app.host").unwrap().is_none());
    }

    #[test]
    fn test_dict_adapter_from_pairs_dotted() {
        let adapter =
            DictAdapter::from_pairs([("DB.Host", RawValue::from("x")), ("db.port", RawValue::Int(1))])
                .unwrap();

        assert_eq!(adapter.get_str("db.host").unwrap(), Some(RawValue::from("x")));
        let db = adapter.get_str("db").unwrap().unwrap();
        assert_eq!(db.get("port"), Some(&RawValue::Int(1)));
        assert_eq!(adapter.all_keys().unwrap().len(), 3);
    }

    #[test]
    fn test_dict_adapter_keeps_null() {
        let adapter = DictAdapter::from_pairs([("port", RawValue::Null)]).unwrap();
        assert_eq!(adapter.get_str("port").unwrap(), Some(RawValue::Null));
    }

    #[test]
    fn test_dict_adapter_rejects_empty_segment() {
        assert!(DictAdapter::from_pairs([("a..b", "x")]).is_err());
    }
}
