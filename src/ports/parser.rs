// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! parsing configuration documents in different formats (YAML, TOML, JSON, INI).

use crate::domain::{RawValue, Result};

/// A trait for parsing configuration documents.
///
/// A parser turns the text of a document into a [`RawValue`] tree, keeping
/// native scalars and nesting. File adapters flatten that tree so every
/// mapping and leaf is addressable by key path.
///
/// For example, the YAML document
///
/// ```yaml
/// database:
///   host: localhost
///   port: 5432
/// ```
///
/// parses into a mapping whose `database` entry is itself a mapping holding
/// the string `"localhost"` and the integer `5432`.
///
/// # Examples
///
/// ```rust
/// use layercfg::ports::ConfigParser;
/// use layercfg::domain::{RawValue, Result};
///
/// /// One `key=value` pair per line.
/// struct LineParser;
///
/// impl ConfigParser for LineParser {
///     fn parse(&self, content: &str) -> Result<RawValue> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim(), v.trim()))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
///
///     fn format_name(&self) -> &str {
///         "lines"
///     }
/// }
///
/// let tree = LineParser.parse("a = 1\nb = 2").unwrap();
/// assert_eq!(tree.get("a"), Some(&RawValue::from("1")));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses document content into a raw value tree.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when the content is not valid for
    /// this format.
    fn parse(&self, content: &str) -> Result<RawValue>;

    /// Returns the file extensions supported by this parser, without the
    /// leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Returns a short name for the format, used to name file sources
    /// (`"yaml"` gives a `yaml-file` source).
    fn format_name(&self) -> &str;
}
