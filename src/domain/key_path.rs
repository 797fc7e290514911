// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key path type for addressing values inside configuration sources.
//!
//! This module provides the `KeyPath` type, an ordered, immutable sequence of
//! lower-cased segments. Every lookup against a source goes through a `KeyPath`,
//! so case-insensitivity is settled once, at construction.

use crate::domain::errors::{ConfigError, Result};
use std::fmt;
use std::str::FromStr;

/// An ordered, case-insensitive sequence of key segments.
///
/// Segments are lower-cased when the path is built, so two paths are equal
/// exactly when their lower-cased segment sequences are equal. A `KeyPath`
/// always has at least one segment and no segment is empty.
///
/// # Examples
///
/// ```
/// use layercfg::domain::KeyPath;
///
/// let key = KeyPath::parse("Database.Host").unwrap();
/// assert_eq!(key.segments(), ["database", "host"]);
/// assert_eq!(key.to_string(), "database.host");
///
/// let port = key.parent().unwrap().child("PORT").unwrap();
/// assert_eq!(port, KeyPath::parse("database.port").unwrap());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Creates a new `KeyPath` from a sequence of segments.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKey` if the sequence is empty or any
    /// segment is empty.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();

        if segments.is_empty() {
            return Err(ConfigError::InvalidKey {
                key: String::new(),
                message: "a key path needs at least one segment".to_string(),
            });
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ConfigError::InvalidKey {
                key: segments.join("."),
                message: "key path segments must not be empty".to_string(),
            });
        }

        Ok(KeyPath(segments))
    }

    /// Parses a dotted key such as `"database.host"`.
    pub fn parse(dotted: &str) -> Result<Self> {
        Self::new(dotted.split('.'))
    }

    /// Builds the path of a child named `segment` under an optional prefix.
    ///
    /// This is how configuration groups compute the effective path of each
    /// declared member: the parent path (if any) extended by the member's
    /// alias or attribute name.
    ///
    /// ```
    /// use layercfg::domain::KeyPath;
    ///
    /// let root = KeyPath::compose(None, "Database").unwrap();
    /// let host = KeyPath::compose(Some(&root), "host").unwrap();
    /// assert_eq!(host.to_string(), "database.host");
    /// ```
    pub fn compose(prefix: Option<&KeyPath>, segment: &str) -> Result<Self> {
        match prefix {
            Some(parent) => parent.child(segment),
            None => Self::new([segment]),
        }
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: &str) -> Result<Self> {
        if segment.is_empty() {
            return Err(ConfigError::InvalidKey {
                key: format!("{}.", self),
                message: "key path segments must not be empty".to_string(),
            });
        }
        let mut segments = self.0.clone();
        segments.push(segment.to_lowercase());
        Ok(KeyPath(segments))
    }

    /// Returns the path without its last segment, or `None` for a
    /// single-segment path.
    pub fn parent(&self) -> Option<KeyPath> {
        if self.0.len() > 1 {
            Some(KeyPath(self.0[..self.0.len() - 1].to_vec()))
        } else {
            None
        }
    }

    /// Returns the segments of this path.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the last segment.
    pub fn last(&self) -> &str {
        // Never empty, see `new`.
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Returns the number of segments.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if `self` equals `prefix` or lies underneath it.
    pub fn starts_with(&self, prefix: &KeyPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Joins the segments with `delimiter`.
    pub fn join(&self, delimiter: &str) -> String {
        self.0.join(delimiter)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join("."))
    }
}

impl FromStr for KeyPath {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for KeyPath {
    type Error = ConfigError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<KeyPath> for Vec<String> {
    fn from(key: KeyPath) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_key_path_new_lowercases() {
        let key = KeyPath::new(["App", "PORT"]).unwrap();
        assert_eq!(key.segments(), ["app", "port"]);
    }

    #[test]
    fn test_key_path_empty_is_invalid() {
        let result = KeyPath::new(Vec::<String>::new());
        assert!(matches!(result, Err(ConfigError::InvalidKey { .. })));
    }

    #[test]
    fn test_key_path_empty_segment_is_invalid() {
        assert!(KeyPath::parse("a..b").is_err());
        assert!(KeyPath::parse("").is_err());
    }

    #[test]
    fn test_key_path_equality_is_case_insensitive() {
        let key1 = KeyPath::parse("database.host").unwrap();
        let key2 = KeyPath::parse("DATABASE.Host").unwrap();
        let key3 = KeyPath::parse("database.port").unwrap();

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
    }

    #[test]
    fn test_key_path_compose() {
        let root = KeyPath::compose(None, "database").unwrap();
        assert_eq!(root.len(), 1);

        let child = KeyPath::compose(Some(&root), "Host").unwrap();
        assert_eq!(child.segments(), ["database", "host"]);
        assert!(child.starts_with(&root));
        assert!(!root.starts_with(&child));
    }

    #[test]
    fn test_key_path_child_rejects_empty() {
        let root = KeyPath::parse("app").unwrap();
        assert!(root.child("").is_err());
    }

    #[test]
    fn test_key_path_parent_and_last() {
        let key = KeyPath::parse("a.b.c").unwrap();
        assert_eq!(key.last(), "c");
        assert_eq!(key.parent().unwrap().to_string(), "a.b");
        assert!(KeyPath::parse("a").unwrap().parent().is_none());
    }

    #[test]
    fn test_key_path_join() {
        let key = KeyPath::parse("database.host").unwrap();
        assert_eq!(key.join("_"), "database_host");
        assert_eq!(format!("{}", key), "database.host");
    }

    #[test]
    fn test_key_path_hash() {
        let mut map = HashMap::new();
        map.insert(KeyPath::parse("App.Name").unwrap(), "value1");

        assert_eq!(map.get(&KeyPath::parse("app.name").unwrap()), Some(&"value1"));
        assert_eq!(map.get(&KeyPath::parse("app.other").unwrap()), None);
    }

    #[test]
    fn test_key_path_from_str() {
        let key: KeyPath = "x.y".parse().unwrap();
        let segments: Vec<String> = key.into();
        assert_eq!(segments, vec!["x".to_string(), "y".to_string()]);
    }
}
