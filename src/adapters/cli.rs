// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument configuration source adapter.
//!
//! This module provides an adapter that reads configuration values from
//! command-line arguments.

use crate::domain::{KeyPath, RawValue, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;

/// Configuration source adapter for command-line arguments.
///
/// This adapter reads configuration values from command-line arguments. It supports
/// multiple argument formats:
/// - `--key=value`: Long form with equals sign
/// - `--key value`: Long form with space-separated value
/// - `-k value`: Short form with space-separated value
///
/// Keys are dotted key paths (`--database.host=localhost`). Arguments whose key
/// is not a valid key path, and positional arguments, are ignored. When a key
/// is given more than once, the last value wins. Values are raw strings.
///
/// A separate value may not start with `-` unless it is a number, so
/// `--offset -5` works but `--pattern -x` must be written `--pattern=-x`.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::CommandLineAdapter;
/// use layercfg::domain::RawValue;
/// use layercfg::ports::ConfigSource;
///
/// let args = vec!["--database.host=localhost", "--port", "5432"];
/// let adapter = CommandLineAdapter::from_args(args);
/// assert_eq!(adapter.get_str("port").unwrap(), Some(RawValue::from("5432")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineAdapter {
    /// Parsed configuration values
    values: HashMap<KeyPath, String>,
}

impl CommandLineAdapter {
    /// Creates a new command-line adapter with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new command-line adapter from a list of arguments.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let mut adapter = Self::new();
        adapter.parse_args(&args);
        tracing::debug!("Parsed {} command-line configuration values", adapter.values.len());
        adapter
    }

    /// Creates a new command-line adapter from the process's command-line arguments.
    ///
    /// This skips the first argument (the program name) and parses the rest.
    pub fn from_env_args() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    fn insert(&mut self, key: &str, value: &str) {
        match KeyPath::parse(key) {
            Ok(path) => {
                self.values.insert(path, value.to_string());
            }
            Err(_) => tracing::debug!("Ignoring command-line argument with invalid key '{}'", key),
        }
    }

    /// Returns the value following the flag at `i`, unless it is another flag.
    /// Negative numbers are values.
    fn value_after<'a, S: AsRef<str>>(args: &'a [S], i: usize) -> Option<&'a str> {
        args.get(i + 1)
            .map(|next| next.as_ref())
            .filter(|next| !next.starts_with('-') || next.parse::<f64>().is_ok())
    }

    /// Parses command-line arguments and populates the values map.
    fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) {
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_ref();

            if let Some(long) = arg.strip_prefix("--") {
                // Handle --key=value format
                if let Some((key, value)) = long.split_once('=') {
                    self.insert(key, value);
                    i += 1;
                    continue;
                }
                // Handle --key value format
                match Self::value_after(args, i) {
                    Some(value) => {
                        self.insert(long, value);
                        i += 2;
                    }
                    None => i += 1,
                }
            } else if arg.len() == 2 && arg.starts_with('-') {
                // Handle -k value format (single character short form)
                match Self::value_after(args, i) {
                    Some(value) => {
                        self.insert(&arg[1..], value);
                        i += 2;
                    }
                    None => i += 1,
                }
            } else {
                i += 1;
            }
        }
    }
}

impl ConfigSource for CommandLineAdapter {
    fn name(&self) -> &str {
        "cli"
    }

    fn get(&self, key: &KeyPath) -> Result<Option<RawValue>> {
        Ok(self.values.get(key).map(|v| RawValue::from(v.as_str())))
    }

    fn all_keys(&self) -> Result<Vec<KeyPath>> {
        let mut keys: Vec<KeyPath> = self.values.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
