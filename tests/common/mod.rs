// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use layercfg::domain::{ConfigError, KeyPath, RawValue, Result};
use layercfg::ports::ConfigSource;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// An in-memory source whose values can be changed after it has been shared.
///
/// Clones share the same storage, so a test can keep one handle for mutation
/// and hand another to a builder.
#[derive(Debug, Clone)]
pub struct MockSource {
    name: String,
    values: Arc<RwLock<HashMap<String, RawValue>>>,
    fail: Arc<RwLock<bool>>,
}

impl MockSource {
    /// Creates an empty mock source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Arc::new(RwLock::new(HashMap::new())),
            fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Adds a value under a dotted, lower-case key.
    pub fn with_value(self, key: &str, value: impl Into<RawValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Replaces a value in place.
    pub fn set(&self, key: &str, value: impl Into<RawValue>) {
        self.values
            .write()
            .unwrap()
            .insert(key.to_lowercase(), value.into());
    }

    /// Removes a value in place.
    pub fn remove(&self, key: &str) {
        self.values.write().unwrap().remove(&key.to_lowercase());
    }

    /// Makes every lookup fail.
    pub fn set_failing(&self, fail: bool) {
        *self.fail.write().unwrap() = fail;
    }
}

impl ConfigSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &KeyPath) -> Result<Option<RawValue>> {
        if *self.fail.read().unwrap() {
            return Err(ConfigError::SourceError {
                source_name: self.name.clone(),
                message: "mock lookup failure".to_string(),
                source: None,
            });
        }
        Ok(self.values.read().unwrap().get(&key.to_string()).cloned())
    }

    fn all_keys(&self) -> Result<Vec<KeyPath>> {
        self.values
            .read()
            .unwrap()
            .keys()
            .map(|k| KeyPath::parse(k))
            .collect()
    }
}

/// Creates a temporary file with the given suffix and content.
pub fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

/// Creates three sources that all define `key1`, for precedence tests.
pub fn precedence_sources() -> (MockSource, MockSource, MockSource) {
    let first = MockSource::new("first")
        .with_value("key1", "from_first")
        .with_value("key2", "first_value");

    let second = MockSource::new("second")
        .with_value("key1", "from_second")
        .with_value("key3", "second_value");

    let third = MockSource::new("third")
        .with_value("key1", "from_third")
        .with_value("key4", "third_value");

    (first, second, third)
}
