// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dotenv file configuration source adapter.

use crate::adapters::env_var::EnvTable;
use crate::domain::{ConfigError, KeyPath, RawValue, Result};
use crate::ports::ConfigSource;
use std::path::{Path, PathBuf};

/// Configuration source adapter for `.env` files.
///
/// The file is read once with `dotenvy`, without touching the process
/// environment. Key paths map onto variable names exactly as for
/// [`EnvVarAdapter`](crate::adapters::EnvVarAdapter): optional prefix, `_`
/// delimiter by default, compared upper-case. Values are trimmed strings.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::DotEnvAdapter;
/// use layercfg::ports::ConfigSource;
///
/// // A missing file is tolerated when `missing_ok` is set.
/// let adapter = DotEnvAdapter::from_file("/no/such/.env", true).unwrap();
/// assert!(adapter.all_keys().unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DotEnvAdapter {
    file_path: PathBuf,
    table: EnvTable,
}

impl DotEnvAdapter {
    /// Reads the dotenv file at `path`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::SourceUnavailable` if the file is missing and
    ///   `missing_ok` is false, or cannot be read
    /// - `ConfigError::ParseError` if a line cannot be parsed
    pub fn from_file<P: AsRef<Path>>(path: P, missing_ok: bool) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();

        let iter = match dotenvy::from_path_iter(&file_path) {
            Ok(iter) => iter,
            Err(e) if is_not_found(&e) && missing_ok => {
                tracing::debug!("Dotenv file {} not found, using no entries", file_path.display());
                return Ok(Self {
                    file_path,
                    table: EnvTable::new(Vec::new()),
                });
            }
            Err(e) => return Err(unavailable(&file_path, e)),
        };

        let mut vars = Vec::new();
        for item in iter {
            match item {
                Ok((key, value)) => vars.push((key, value.trim().to_string())),
                Err(dotenvy::Error::LineParse(line, idx)) => {
                    return Err(ConfigError::ParseError {
                        message: format!(
                            "Failed to parse dotenv line '{}' at position {} in {}",
                            line,
                            idx,
                            file_path.display()
                        ),
                        source: None,
                    });
                }
                Err(e) => return Err(unavailable(&file_path, e)),
            }
        }

        tracing::debug!(
            "Loaded {} entries from dotenv file {}",
            vars.len(),
            file_path.display()
        );

        Ok(Self {
            file_path,
            table: EnvTable::new(vars),
        })
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

    /// Returns the path this adapter was created from.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl ConfigSource for DotEnvAdapter {
    fn name(&self) -> &str {
        "dotenv-file"
    }

    fn get(&self, key: &KeyPath) -> Result<Option<RawValue>> {
        Ok(self.table.get(key).map(RawValue::from))
    }

    fn all_keys(&self) -> Result<Vec<KeyPath>> {
        Ok(self.table.keys())
    }
}

fn is_not_found(err: &dotenvy::Error) -> bool {
    matches!(
        err,
        dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
    )
}

fn unavailable(path: &Path, err: dotenvy::Error) -> ConfigError {
    ConfigError::SourceUnavailable {
        source_name: "dotenv-file".to_string(),
        message: format!("Failed to read {}", path.display()),
        source: Some(Box::new(err)),
    }
}
