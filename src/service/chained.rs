// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered composition of configuration sources.

use crate::domain::{KeyPath, RawValue, Result};
use crate::ports::ConfigSource;
use std::fmt;

/// An ordered list of sources queried in turn; the first hit wins.
///
/// The order is fixed once the chain is built and is the only precedence
/// mechanism: sources earlier in the chain override later ones. Each source
/// answers a lookup for the whole key; values are never merged across sources.
///
/// An error returned by a source aborts the lookup and is propagated.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::DictAdapter;
/// use layercfg::domain::RawValue;
/// use layercfg::ports::ConfigSource;
/// use layercfg::service::ChainedSource;
///
/// let chain = ChainedSource::new()
///     .with_source(DictAdapter::from_pairs([("k", "1")]).unwrap())
///     .with_source(DictAdapter::from_pairs([("k", "2"), ("other", "3")]).unwrap());
///
/// assert_eq!(chain.get_str("k").unwrap(), Some(RawValue::from("1")));
/// assert_eq!(chain.get_str("other").unwrap(), Some(RawValue::from("3")));
/// ```
#[derive(Default)]
pub struct ChainedSource {
    /// Sources in precedence order (highest first)
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ChainedSource {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chain from sources in precedence order.
    pub fn from_sources(sources: Vec<Box<dyn ConfigSource>>) -> Self {
        Self { sources }
    }

    /// Appends a source with lower precedence than every source already in
    /// the chain.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Returns the number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if the chain has no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Returns the source names in precedence order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

impl ConfigSource for ChainedSource {
    fn name(&self) -> &str {
        "chain"
    }

    fn get(&self, key: &KeyPath) -> Result<Option<RawValue>> {
        for source in &self.sources {
            if let Some(value) = source.get(key)? {
                tracing::trace!("Configuration key '{}' found in source '{}'", key, source.name());
                return Ok(Some(value));
            }
        }
        tracing::trace!("Configuration key '{}' not found in any source", key);
        Ok(None)
    }

    fn all_keys(&self) -> Result<Vec<KeyPath>> {
        let mut keys = Vec::new();
        for source in &self.sources {
            keys.extend(source.all_keys()?);
        }
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}

impl fmt::Debug for ChainedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedSource")
            .field("sources", &self.source_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigError;
    use std::collections::HashMap;

    // Mock source for testing
    struct MockSource {
        name: String,
        values: HashMap<String, RawValue>,
        fail: bool,
    }

    impl MockSource {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                values: HashMap::new(),
                fail: false,
            }
        }

        fn with_value(mut self, key: &str, value: impl Into<RawValue>) -> Self {
            self.values.insert(key.to_string(), value.into());
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }
    }

    impl ConfigSource for MockSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn get(&self, key: &KeyPath) -> Result<Option<RawValue>> {
            if self.fail {
                return Err(ConfigError::SourceError {
                    source_name: self.name.clone(),
                    message: "backend down".to_string(),
                    source: None,
                });
            }
            Ok(self.values.get(&key.to_string()).cloned())
        }

        fn all_keys(&self) -> Result<Vec<KeyPath>> {
            self.values.keys().map(|k| KeyPath::parse(k)).collect()
        }
    }

    #[test]
    fn test_chain_empty() {
        let chain = ChainedSource::new();
        assert!(chain.is_empty());
        assert!(chain.get_str("anything").unwrap().is_none());
    }

    #[test]
    fn test_chain_first_hit_wins() {
        let chain = ChainedSource::new()
            .with_source(MockSource::new("a").with_value("k", "1"))
            .with_source(MockSource::new("b").with_value("k", "2"))
            .with_source(MockSource::new("c").with_value("k", "3"));

        assert_eq!(chain.get_str("k").unwrap(), Some(RawValue::from("1")));
        assert_eq!(chain.source_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_chain_falls_through_to_later_sources() {
        let chain = ChainedSource::new()
            .with_source(MockSource::new("a"))
            .with_source(MockSource::new("b").with_value("k", "2"));

        assert_eq!(chain.get_str("k").unwrap(), Some(RawValue::from("2")));
    }

    #[test]
    fn test_chain_null_is_a_hit() {
        let chain = ChainedSource::new()
            .with_source(MockSource::new("a").with_value("k", RawValue::Null))
            .with_source(MockSource::new("b").with_value("k", "2"));

        assert_eq!(chain.get_str("k").unwrap(), Some(RawValue::Null));
    }

    #[test]
    fn test_chain_propagates_source_errors() {
        let chain = ChainedSource::new()
            .with_source(MockSource::new("broken").failing())
            .with_source(MockSource::new("b").with_value("k", "2"));

        assert!(matches!(
            chain.get_str("k"),
            Err(ConfigError::SourceError { .. })
        ));
    }

    #[test]
    fn test_chain_error_after_hit_is_not_reached() {
        let chain = ChainedSource::new()
            .with_source(MockSource::new("a").with_value("k", "1"))
            .with_source(MockSource::new("broken").failing());

        assert_eq!(chain.get_str("k").unwrap(), Some(RawValue::from("1")));
    }

    #[test]
    fn test_chain_all_keys_deduplicated() {
        let chain = ChainedSource::from_sources(vec![
            Box::new(MockSource::new("a").with_value("x", "1").with_value("y", "1")),
            Box::new(MockSource::new("b").with_value("y", "2")),
        ]);

        let keys: Vec<String> = chain.all_keys().unwrap().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["x", "y"]);
        assert_eq!(chain.len(), 2);
    }
}
