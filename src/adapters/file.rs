// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic file configuration source adapter.
//!
//! This module provides `FileAdapter`, which reads a document once, parses it with
//! a [`ConfigParser`] and flattens it into key-path addressable entries. The
//! YAML, JSON, TOML and INI adapters are aliases of it.

use crate::adapters::flat::FlatStore;
use crate::domain::{ConfigError, KeyPath, RawValue, Result};
use crate::ports::{ConfigParser, ConfigSource};
use directories::ProjectDirs;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed size for configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Configuration source adapter for a parsed document file.
///
/// The file is read and parsed exactly once, when the adapter is created. When
/// the file does not exist, `missing_ok` decides between an empty source and a
/// `ConfigError::SourceUnavailable` error.
///
/// # Examples
///
/// ```rust,no_run
/// use layercfg::adapters::YamlFileAdapter;
/// use layercfg::ports::ConfigSource;
///
/// // Load from a specific file
/// let adapter = YamlFileAdapter::from_file("/path/to/config.yaml").unwrap();
///
/// // Load from the default OS location, tolerating its absence
/// let adapter = YamlFileAdapter::from_default_location("myapp", "com.example", true).unwrap();
/// ```
#[derive(Clone)]
pub struct FileAdapter<P> {
    /// Path to the file, canonicalized when it exists
    file_path: PathBuf,
    /// Source name, e.g. `yaml-file`
    name: String,
    /// Flattened entries
    store: FlatStore,
    parser: P,
}

impl<P: ConfigParser + Default> FileAdapter<P> {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::SourceUnavailable` if the file is missing (and
    ///   `missing_ok` is false), unreadable or too large
    /// - `ConfigError::ParseError` if the content is malformed
    pub fn open<T: AsRef<Path>>(path: T, missing_ok: bool) -> Result<Self> {
        Self::with_parser(P::default(), path, missing_ok)
    }

    /// Reads and parses the file at `path`, which must exist.
    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self> {
        Self::open(path, false)
    }

    /// Reads `config.<ext>` from the OS-appropriate configuration directory,
    /// where `<ext>` is the parser's first supported extension.
    ///
    /// This method uses the `directories` crate to determine the appropriate
    /// configuration directory for the current operating system.
    pub fn from_default_location(app_name: &str, qualifier: &str, missing_ok: bool) -> Result<Self> {
        let parser = P::default();
        let extension = parser.supported_extensions().first().copied().unwrap_or("conf");
        let filename = format!("config.{}", extension);
        let path = default_location(app_name, qualifier, &filename, parser.format_name())?;
        Self::with_parser(parser, path, missing_ok)
    }

    /// Reads `filename` from the OS-appropriate configuration directory.
    pub fn with_filename(
        app_name: &str,
        qualifier: &str,
        filename: &str,
        missing_ok: bool,
    ) -> Result<Self> {
        let parser = P::default();
        let path = default_location(app_name, qualifier, filename, parser.format_name())?;
        Self::with_parser(parser, path, missing_ok)
    }
}

impl<P: ConfigParser> FileAdapter<P> {
    /// Reads the file at `path` with an explicitly configured parser.
    pub fn with_parser<T: AsRef<Path>>(parser: P, path: T, missing_ok: bool) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let name = format!("{}-file", parser.format_name());

        if !file_path.is_file() {
            if missing_ok {
                tracing::debug!(
                    "Configuration file {} not found, {} source is empty",
                    file_path.display(),
                    name
                );
                return Ok(Self {
                    file_path,
                    name,
                    store: FlatStore::new(),
                    parser,
                });
            }
            return Err(ConfigError::SourceUnavailable {
                source_name: name,
                message: format!("Configuration file not found: {}", display_name(&file_path)),
                source: None,
            });
        }

        // Canonicalize path to prevent directory traversal attacks
        let canonical_path = file_path
            .canonicalize()
            .map_err(|e| unavailable(&name, "Invalid or inaccessible path", &file_path, e))?;

        // Check file size before reading to prevent DoS via large files
        let metadata = fs::metadata(&canonical_path)
            .map_err(|e| unavailable(&name, "Failed to read file metadata", &canonical_path, e))?;

        if metadata.len() > MAX_FILE_SIZE {
            return Err(ConfigError::SourceUnavailable {
                source_name: name,
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_FILE_SIZE
                ),
                source: None,
            });
        }

        let content = fs::read_to_string(&canonical_path).map_err(|e| {
            unavailable(&name, "Failed to read configuration file", &canonical_path, e)
        })?;

        let tree = parser.parse(&content)?;
        let store = FlatStore::from_tree(&tree);
        tracing::debug!(
            "Loaded {} entries from {} ({})",
            store.len(),
            display_name(&canonical_path),
            name
        );

        Ok(Self {
            file_path: canonical_path,
            name,
            store,
            parser,
        })
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the parser this adapter was created with.
    pub fn parser(&self) -> &P {
        &self.parser
    }
}

impl<P: ConfigParser> ConfigSource for FileAdapter<P> {
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

impl<P> fmt::Debug for FileAdapter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileAdapter")
            .field("name", &self.name)
            .field("file_path", &self.file_path)
            .field("entries", &self.store.len())
            .finish()
    }
}

fn default_location(app_name: &str, qualifier: &str, filename: &str, format: &str) -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceUnavailable {
            source_name: format!("{}-file", format),
            message: "Failed to determine project directories".to_string(),
            source: None,
        })?;

    Ok(proj_dirs.config_dir().join(filename))
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

fn unavailable(name: &str, what: &str, path: &Path, err: std::io::Error) -> ConfigError {
    ConfigError::SourceUnavailable {
        source_name: name.to_string(),
        message: format!("{}: {}", what, display_name(path)),
        source: Some(Box::new(err)),
    }
}
