// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! This module defines the `ConfigSource` trait, the port through which the
//! resolution engine reads raw values. Any backing store (environment variables,
//! files, in-memory mappings, etc.) is exposed to fields through this trait.

use crate::domain::{KeyPath, RawValue, Result};
use std::sync::Arc;

/// A trait for configuration sources.
///
/// A source answers one question: given a [`KeyPath`], is there a raw value, and
/// if so which one. Sources load their data once when constructed and never
/// change afterwards; casting is never the source's job.
///
/// A lookup distinguishes "absent" (`Ok(None)`) from "present and null"
/// (`Ok(Some(RawValue::Null))`), since null can be a legitimate value for a
/// nullable field.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a source can be shared by every
/// field of a configuration tree.
///
/// # Examples
///
/// ```rust
/// use layercfg::ports::ConfigSource;
/// use layercfg::domain::{KeyPath, RawValue, Result};
///
/// struct MySource;
///
/// impl ConfigSource for MySource {
///     fn name(&self) -> &str {
///         "my-source"
///     }
///
///     fn get(&self, key: &KeyPath) -> Result<Option<RawValue>> {
///         if key.to_string() == "app.name" {
///             return Ok(Some(RawValue::from("MyApp")));
///         }
///         Ok(None)
///     }
///
///     fn all_keys(&self) -> Result<Vec<KeyPath>> {
///         Ok(vec![KeyPath::parse("app.name")?])
///     }
/// }
///
/// let source = MySource;
/// assert!(source.get_str("App.Name").unwrap().is_some());
/// assert!(source.get_str("app.port").unwrap().is_none());
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this configuration source.
    ///
    /// This name is used for logging and error messages. It should be a short,
    /// descriptive identifier like "env", "yaml-file" or "dict".
    fn name(&self) -> &str;

    /// Retrieves the raw value stored at `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RawValue))` - The key exists in this source
    /// * `Ok(None)` - The key does not exist in this source
    /// * `Err(ConfigError)` - The lookup itself failed
    fn get(&self, key: &KeyPath) -> Result<Option<RawValue>>;

    /// Returns every key this source can answer, useful for diagnostics.
    fn all_keys(&self) -> Result<Vec<KeyPath>>;

    /// Retrieves a value by dotted key string.
    ///
    /// This is a convenience method equivalent to
    /// `get(&KeyPath::parse(key)?)`.
    fn get_str(&self, key: &str) -> Result<Option<RawValue>> {
        self.get(&KeyPath::parse(key)?)
    }
}

impl<S: ConfigSource + ?Sized> ConfigSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &KeyPath) -> Result<Option<RawValue>> {
        (**self).get(key)
    }

    fn all_keys(&self) -> Result<Vec<KeyPath>> {
        (**self).all_keys()
    }
}

impl<S: ConfigSource + ?Sized> ConfigSource for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &KeyPath) -> Result<Option<RawValue>> {
        (**self).get(key)
    }

    fn all_keys(&self) -> Result<Vec<KeyPath>> {
        (**self).all_keys()
    }
}
