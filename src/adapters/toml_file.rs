// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML file configuration source adapter.

use crate::adapters::file::FileAdapter;
use crate::domain::{ConfigError, RawValue, Result};
use crate::ports::ConfigParser;

/// TOML parser implementation.
///
/// Datetimes have no raw counterpart and are kept as their TOML text.
#[derive(Debug, Clone, Default)]
pub struct TomlParser;

impl TomlParser {
    /// Creates a new TOML parser.
    pub fn new() -> Self {
        TomlParser
    }
}

impl ConfigParser for TomlParser {
    fn parse(&self, content: &str) -> Result<RawValue> {
        let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
            ConfigError::ParseError {
                message: format!("Failed to parse TOML: {}", e),
                source: Some(Box::new(e)),
            }
        })?;
        Ok(RawValue::from(toml::Value::Table(table)))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["toml"]
    }

    fn format_name(&self) -> &str {
        "toml"
    }
}

impl From<toml::Value> for RawValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => RawValue::String(s),
            toml::Value::Integer(i) => RawValue::Int(i),
            toml::Value::Float(x) => RawValue::Float(x),
            toml::Value::Boolean(b) => RawValue::Bool(b),
            toml::Value::Datetime(dt) => RawValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                RawValue::List(items.into_iter().map(RawValue::from).collect())
            }
            toml::Value::Table(table) => RawValue::Map(
                table
                    .into_iter()
                    .map(|(key, val)| (key, RawValue::from(val)))
                    .collect(),
            ),
        }
    }
}

/// Configuration source adapter for TOML files.
pub type TomlFileAdapter = FileAdapter<TomlParser>;
