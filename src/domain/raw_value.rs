// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw configuration values as they are stored in a source.
//!
//! This module provides the `RawValue` type. Sources hand out raw values exactly
//! as found in their backing store: plain strings for environment variables,
//! dotenv and INI files, native scalars and structures for YAML, JSON and TOML.
//! Converting a raw value into a typed one is the job of a field kind, never of
//! the source.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A raw value read from a configuration source.
///
/// # Examples
///
/// ```
/// use layercfg::domain::RawValue;
///
/// let value = RawValue::from("42");
/// assert_eq!(value.as_str(), Some("42"));
/// assert!(!value.is_null());
///
/// let db: RawValue = [("host", "localhost"), ("port", "5432")].into_iter().collect();
/// assert_eq!(db.get("host"), Some(&RawValue::from("localhost")));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// An explicit null (`~` in YAML, `null` in JSON).
    Null,
    /// A native boolean.
    Bool(bool),
    /// A native integer.
    Int(i64),
    /// A native floating point number.
    Float(f64),
    /// A string, the only shape flat sources ever produce.
    String(String),
    /// A sequence, kept whole so list fields can consume it.
    List(Vec<RawValue>),
    /// A nested mapping.
    Map(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Returns true for `RawValue::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Returns the string slice if this is a `RawValue::String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested mapping if this is a `RawValue::Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, RawValue>> {
        match self {
            RawValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a direct child of a mapping.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// A short name for the shape of this value, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::String(_) => "string",
            RawValue::List(_) => "list",
            RawValue::Map(_) => "mapping",
        }
    }

    /// Inserts `value` under the nested `segments`, creating intermediate
    /// mappings as needed. Any non-mapping value in the way is replaced.
    pub fn insert_path<S: AsRef<str>>(&mut self, segments: &[S], value: RawValue) {
        let Some((first, rest)) = segments.split_first() else {
            *self = value;
            return;
        };

        if !matches!(self, RawValue::Map(_)) {
            *self = RawValue::Map(BTreeMap::new());
        }
        if let RawValue::Map(map) = self {
            let entry = map
                .entry(first.as_ref().to_string())
                .or_insert(RawValue::Null);
            entry.insert_path(rest, value);
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "null"),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(i) => write!(f, "{}", i),
            RawValue::Float(x) => write!(f, "{}", x),
            RawValue::String(s) => write!(f, "{}", s),
            RawValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            RawValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<i32> for RawValue {
    fn from(i: i32) -> Self {
        RawValue::Int(i64::from(i))
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        RawValue::Float(x)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Null, Into::into)
    }
}

impl From<BTreeMap<String, RawValue>> for RawValue {
    fn from(map: BTreeMap<String, RawValue>) -> Self {
        RawValue::Map(map)
    }
}

impl<K, V> FromIterator<(K, V)> for RawValue
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawValue::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Strict extraction of a typed value from a raw value, without conversion.
///
/// Unlike a field kind's cast, `from_raw` never parses: a `RawValue::String("10")`
/// is not an `i64`. `Choice` relies on this when no cast function is given, so
/// that membership is checked against the raw value itself.
pub trait FromRaw: Sized {
    /// Returns the value if `raw` already has the right shape.
    fn from_raw(raw: &RawValue) -> Option<Self>;
}

impl FromRaw for RawValue {
    fn from_raw(raw: &RawValue) -> Option<Self> {
        Some(raw.clone())
    }
}

impl FromRaw for String {
    fn from_raw(raw: &RawValue) -> Option<Self> {
        raw.as_str().map(str::to_string)
    }
}

impl FromRaw for bool {
    fn from_raw(raw: &RawValue) -> Option<Self> {
        match raw {
            RawValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromRaw for i64 {
    fn from_raw(raw: &RawValue) -> Option<Self> {
        match raw {
            RawValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromRaw for f64 {
    fn from_raw(raw: &RawValue) -> Option<Self> {
        match raw {
            RawValue::Float(x) => Some(*x),
            RawValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}
