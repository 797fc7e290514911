// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file configuration source adapter.
//!
//! This module provides a parser and a file adapter for YAML documents.

use crate::adapters::file::FileAdapter;
use crate::domain::{ConfigError, RawValue, Result};
use crate::ports::ConfigParser;
use std::collections::BTreeMap;

/// YAML parser implementation.
///
/// Scalars keep their native type, sequences stay sequences and mappings
/// become nested raw mappings. Non-string mapping keys are stringified.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::YamlParser;
/// use layercfg::domain::RawValue;
/// use layercfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let tree = parser.parse("database:\n  host: localhost\n  port: 5432").unwrap();
/// let db = tree.get("database").unwrap();
/// assert_eq!(db.get("port"), Some(&RawValue::Int(5432)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<RawValue> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;
        Ok(RawValue::from(value))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn format_name(&self) -> &str {
        "yaml"
    }
}

impl From<serde_yaml::Value> for RawValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => RawValue::Null,
            serde_yaml::Value::Bool(b) => RawValue::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Int(i),
                None => n.as_f64().map_or(RawValue::Null, RawValue::Float),
            },
            serde_yaml::Value::String(s) => RawValue::String(s),
            serde_yaml::Value::Sequence(seq) => {
                RawValue::List(seq.into_iter().map(RawValue::from).collect())
            }
            serde_yaml::Value::Mapping(map) => {
                let mut entries = BTreeMap::new();
                for (key, val) in map {
                    match yaml_key(key) {
                        Some(key) => {
                            entries.insert(key, RawValue::from(val));
                        }
                        None => tracing::debug!("Skipping YAML entry with a non-scalar key"),
                    }
                }
                RawValue::Map(entries)
            }
            serde_yaml::Value::Tagged(tagged) => RawValue::from(tagged.value),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Configuration source adapter for YAML files.
///
/// # Examples
///
/// ```rust,no_run
/// use layercfg::adapters::YamlFileAdapter;
///
/// let adapter = YamlFileAdapter::open("/etc/myapp/config.yaml", true).unwrap();
/// ```
pub type YamlFileAdapter = FileAdapter<YamlParser>;
