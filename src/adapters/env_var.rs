// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! This module provides an adapter that reads configuration values from
//! environment variables, plus the name table shared with the dotenv adapter.

use crate::domain::{KeyPath, RawValue, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;
use std::env;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Default delimiter between the prefix and the key segments of a variable name.
pub const DEFAULT_DELIMITER: &str = "_";

/// A table of flat variable names, looked up by key path.
///
/// The key path `(database, host)` under prefix `APP` and delimiter `_` is
/// looked up as `APP_DATABASE_HOST`. Names are compared upper-case.
#[derive(Debug, Clone)]
pub(crate) struct EnvTable {
    prefix: Option<String>,
    delimiter: String,
    vars: HashMap<String, String>,
}

impl EnvTable {
    pub(crate) fn new<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        // A name already written upper-case wins over one that folds onto it.
        let mut vars_map = HashMap::new();
        let mut folded = Vec::new();
        for (name, value) in vars {
            let upper = name.to_uppercase();
            if upper == name {
                vars_map.insert(upper, value);
            } else {
                folded.push((upper, value));
            }
        }
        for (upper, value) in folded {
            vars_map.entry(upper).or_insert(value);
        }

        Self {
            prefix: None,
            delimiter: DEFAULT_DELIMITER.to_string(),
            vars: vars_map,
        }
    }

    /// An empty prefix disables filtering, like no prefix at all.
    pub(crate) fn set_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() {
            None
        } else {
            Some(prefix.to_uppercase())
        };
    }

    pub(crate) fn set_delimiter(&mut self, delimiter: impl Into<String>) {
        self.delimiter = delimiter.into().to_uppercase();
    }

    pub(crate) fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub(crate) fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub(crate) fn len(&self) -> usize {
        self.vars.len()
    }

    /// Builds the variable name for `key`.
    pub(crate) fn name_for(&self, key: &KeyPath) -> String {
        let joined = key.join(&self.delimiter);
        match &self.prefix {
            Some(prefix) => format!("{}{}{}", prefix, self.delimiter, joined),
            None => joined,
        }
        .to_uppercase()
    }

    pub(crate) fn get(&self, key: &KeyPath) -> Option<&str> {
        self.vars.get(&self.name_for(key)).map(String::as_str)
    }

    /// Converts every name under the prefix back into a key path.
    pub(crate) fn keys(&self) -> Vec<KeyPath> {
        let head = self
            .prefix
            .as_ref()
            .map(|prefix| format!("{}{}", prefix, self.delimiter));

        let mut keys: Vec<KeyPath> = self
            .vars
            .keys()
            .filter_map(|name| match &head {
                Some(head) => name.strip_prefix(head.as_str()),
                None => Some(name.as_str()),
            })
            .filter_map(|rest| {
                if self.delimiter.is_empty() {
                    KeyPath::new([rest]).ok()
                } else {
                    KeyPath::new(rest.split(self.delimiter.as_str())).ok()
                }
            })
            .collect();
        keys.sort();
        keys
    }
}

/// Configuration source adapter for environment variables.
///
/// The environment is snapshotted once when the adapter is created; later
/// changes to the process environment are not observed. A key path is turned
/// into a variable name by joining the optional prefix and the segments with
/// the delimiter (`_` by default) and upper-casing the result, so
/// `database.host` under prefix `app` reads `APP_DATABASE_HOST`.
///
/// Values are always raw strings.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::EnvVarAdapter;
/// use layercfg::domain::RawValue;
/// use layercfg::ports::ConfigSource;
/// use std::collections::HashMap;
///
/// let mut values = HashMap::new();
/// values.insert("APP_DATABASE_HOST".to_string(), "localhost".to_string());
///
/// let adapter = EnvVarAdapter::with_values(values).prefix("app");
/// assert_eq!(
///     adapter.get_str("database.host").unwrap(),
///     Some(RawValue::from("localhost"))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EnvVarAdapter {
    table: EnvTable,
}

impl EnvVarAdapter {
    /// Creates an adapter over a snapshot of the whole process environment.
    pub fn new() -> Self {
        let mut skipped = 0usize;
        let vars: Vec<(String, String)> = env::vars_os()
            .filter_map(|(key, value)| {
                // Non UTF-8 variables cannot be addressed by a key path.
                let (key, value) = (key.into_string().ok()?, value.into_string().ok()?);
                if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                    skipped += 1;
                    return None;
                }
                Some((key, value))
            })
            .collect();

        if skipped > 0 {
            tracing::debug!(
                "Skipped {} oversized environment variables (max key={}, max value={})",
                skipped,
                MAX_ENV_KEY_LEN,
                MAX_ENV_VALUE_LEN
            );
        }

        let adapter = Self {
            table: EnvTable::new(vars),
        };
        tracing::debug!("Snapshotted {} environment variables", adapter.table.len());
        adapter
    }

    /// Creates an adapter over the process environment that only answers
    /// for variables under `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::new().prefix(prefix)
    }

    /// Creates an adapter with pre-populated values instead of the process
    /// environment.
    ///
    /// **Note**: This method is primarily intended for testing. Names are
    /// compared upper-case, exactly as for real environment variables.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            table: EnvTable::new(values),
        }
    }

    /// Sets the prefix. An empty prefix disables filtering.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table.set_prefix(prefix);
        self
    }

    /// Sets the delimiter placed between the prefix and each key segment.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.table.set_delimiter(delimiter);
        self
    }

    /// Returns the variable name a key path is looked up as.
    ///
    /// ```rust
    /// use layercfg::adapters::EnvVarAdapter;
    /// use layercfg::domain::KeyPath;
    /// use std::collections::HashMap;
    ///
    /// let adapter = EnvVarAdapter::with_values(HashMap::new()).prefix("app").delimiter("__");
    /// let key = KeyPath::parse("db.host").unwrap();
    /// assert_eq!(adapter.variable_name(&key), "APP__DB__HOST");
    /// ```
    pub fn variable_name(&self, key: &KeyPath) -> String {
        self.table.name_for(key)
    }

    /// Returns the configured prefix, upper-cased.
    pub fn get_prefix(&self) -> Option<&str> {
        self.table.prefix()
    }

    /// Returns the configured delimiter.
    pub fn get_delimiter(&self) -> &str {
        self.table.delimiter()
    }
}

impl Default for EnvVarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &KeyPath) -> Result<Option<RawValue>> {
        Ok(self.table.get(key).map(RawValue::from))
    }

    fn all_keys(&self) -> Result<Vec<KeyPath>> {
        Ok(self.table.keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn key(s: &str) -> KeyPath {
        KeyPath::parse(s).unwrap()
    }

    #[test]
    fn test_env_adapter_name() {
        let adapter = EnvVarAdapter::with_values(HashMap::new());
        assert_eq!(adapter.name(), "env");
    }

    #[test]
    fn test_env_adapter_get_without_prefix() {
        let adapter = EnvVarAdapter::with_values(values(&[("DATABASE_HOST", "db")]));
        assert_eq!(
            adapter.get(&key("database.host")).unwrap(),
            Some(RawValue::from("db"))
        );
        assert!(adapter.get(&key("database.port")).unwrap().is_none());
    }

    #[test]
    fn test_env_adapter_upper_case_name_wins() {
        for _ in 0..20 {
            let adapter =
                EnvVarAdapter::with_values(values(&[("APP_PORT", "1"), ("app_port", "2")]))
                    .prefix("app");
            assert_eq!(adapter.get_str("port").unwrap(), Some(RawValue::from("1")));
        }

        let adapter = EnvVarAdapter::with_values(values(&[("app_Host", "mixed")])).prefix("app");
        assert_eq!(adapter.get_str("host").unwrap(), Some(RawValue::from("mixed")));
    }

    #[test]
    fn test_env_adapter_prefix_filters() {
        let adapter = EnvVarAdapter::with_values(values(&[
            ("MYAPP_DATABASE_HOST", "localhost"),
            ("OTHER_VAR", "should_not_appear"),
        ]))
        .prefix("myapp");

        assert_eq!(
            adapter.get(&key("database.host")).unwrap(),
            Some(RawValue::from("localhost"))
        );
        assert!(adapter.get(&key("other.var")).unwrap().is_none());
        assert_eq!(adapter.get_prefix(), Some("MYAPP"));
    }

    #[test]
    fn test_env_adapter_empty_prefix_disables_filtering() {
        let adapter = EnvVarAdapter::with_values(values(&[("PORT", "1")])).prefix("");
        assert!(adapter.get_prefix().is_none());
        assert!(adapter.get(&key("port")).unwrap().is_some());
    }

    #[test]
    fn test_env_adapter_names_compared_uppercase() {
        let adapter = EnvVarAdapter::with_values(values(&[("app_Mixed_Case", "v")])).prefix("APP");
        assert_eq!(adapter.get(&key("mixed.case")).unwrap(), Some(RawValue::from("v")));
    }

    #[test]
    fn test_env_adapter_custom_delimiter() {
        let adapter = EnvVarAdapter::with_values(values(&[
            ("APP__SOME_KEY__PORT", "8080"),
            ("APP_SOME_KEY_PORT", "1"),
        ]))
        .prefix("app")
        .delimiter("__");

        assert_eq!(
            adapter.get(&key("some_key.port")).unwrap(),
            Some(RawValue::from("8080"))
        );
        assert_eq!(adapter.get_delimiter(), "__");
    }

    #[test]
    fn test_env_adapter_all_keys() {
        let adapter = EnvVarAdapter::with_values(values(&[
            ("TEST_KEY_1", "value1"),
            ("TEST_KEY_2", "value2"),
            ("UNRELATED", "x"),
        ]))
        .prefix("TEST");

        assert_eq!(adapter.all_keys().unwrap(), vec![key("key.1"), key("key.2")]);
    }

    #[test]
    #[serial]
    fn test_env_adapter_snapshots_process_environment() {
        temp_env::with_var("LAYERCFG_SNAPSHOT_VALUE", Some("initial"), || {
            let adapter = EnvVarAdapter::with_prefix("layercfg");
            std::env::set_var("LAYERCFG_SNAPSHOT_VALUE", "updated");

            assert_eq!(
                adapter.get(&key("snapshot.value")).unwrap(),
                Some(RawValue::from("initial"))
            );
            assert_eq!(
                EnvVarAdapter::with_prefix("layercfg")
                    .get(&key("snapshot.value"))
                    .unwrap(),
                Some(RawValue::from("updated"))
            );
        });
    }

    #[test]
    #[serial]
    fn test_env_adapter_skips_oversized_values() {
        let big = "x".repeat(MAX_ENV_VALUE_LEN + 1);
        temp_env::with_var("LAYERCFG_BIG_VALUE", Some(big.as_str()), || {
            let adapter = EnvVarAdapter::with_prefix("layercfg");
            assert!(adapter.get(&key("big.value")).unwrap().is_none());
        });
    }
}
