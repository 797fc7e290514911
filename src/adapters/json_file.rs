// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file configuration source adapter.

use crate::adapters::file::FileAdapter;
use crate::domain::{ConfigError, RawValue, Result};
use crate::ports::ConfigParser;

/// JSON parser implementation.
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonParser
    }
}

impl ConfigParser for JsonParser {
    fn parse(&self, content: &str) -> Result<RawValue> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse JSON: {}", e),
                source: Some(Box::new(e)),
            })?;
        Ok(RawValue::from(value))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn format_name(&self) -> &str {
        "json"
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Int(i),
                None => n.as_f64().map_or(RawValue::Null, RawValue::Float),
            },
            serde_json::Value::String(s) => RawValue::String(s),
            serde_json::Value::Array(items) => {
                RawValue::List(items.into_iter().map(RawValue::from).collect())
            }
            serde_json::Value::Object(map) => RawValue::Map(
                map.into_iter()
                    .map(|(key, val)| (key, RawValue::from(val)))
                    .collect(),
            ),
        }
    }
}

/// Configuration source adapter for JSON files.
pub type JsonFileAdapter = FileAdapter<JsonParser>;
