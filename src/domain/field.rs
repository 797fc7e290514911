// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed, cacheable configuration fields.
//!
//! A field is declared with a [`FieldKind`] that knows how to cast a raw value into
//! a typed one and how to validate the result. When a configuration group is
//! built, each declaration is bound to a concrete [`KeyPath`] and the shared
//! source chain, producing a [`Field`]. The first successful resolution is cached
//! for the lifetime of that field; failures are never cached.

use crate::domain::errors::{ConfigError, FieldError, Result};
use crate::domain::key_path::KeyPath;
use crate::domain::raw_value::RawValue;
use crate::ports::ConfigSource;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Casting and validation policy for one kind of value.
///
/// Implementations receive raw values that are never null: the field handles
/// null itself before calling [`cast`](FieldKind::cast), using
/// [`null_value`](FieldKind::null_value) to decide whether null is acceptable.
///
/// # Examples
///
/// ```
/// use layercfg::domain::{FieldError, FieldKind, RawValue};
///
/// /// A port number that must not be zero.
/// struct Port;
///
/// impl FieldKind for Port {
///     type Value = u16;
///
///     fn type_name(&self) -> &'static str {
///         "port"
///     }
///
///     fn cast(&self, raw: &RawValue) -> Result<u16, FieldError> {
///         raw.to_string().trim().parse().map_err(FieldError::cast)
///     }
///
///     fn validate(&self, value: &u16) -> Result<(), FieldError> {
///         if *value == 0 {
///             return Err(FieldError::invalid("port 0 is reserved"));
///         }
///         Ok(())
///     }
/// }
///
/// assert_eq!(Port.cast(&RawValue::from("8080")).unwrap(), 8080);
/// assert!(Port.validate(&0).is_err());
/// ```
pub trait FieldKind: Send + Sync + 'static {
    /// The typed value this kind produces.
    type Value: Clone + Send + Sync + 'static;

    /// A human readable name of the target type, used in error messages.
    fn type_name(&self) -> &'static str;

    /// Converts a non-null raw value into the target type.
    fn cast(&self, raw: &RawValue) -> std::result::Result<Self::Value, FieldError>;

    /// Checks a successfully cast value.
    fn validate(&self, _value: &Self::Value) -> std::result::Result<(), FieldError> {
        Ok(())
    }

    /// The value to store when a source yields null, or `None` if null is not
    /// acceptable for this kind.
    fn null_value(&self) -> Option<Self::Value> {
        None
    }
}

/// Wraps a kind so that null raw values resolve to `None`.
///
/// Created with [`FieldKindExt::nullable`].
#[derive(Debug, Clone, Default)]
pub struct Nullable<K>(K);

impl<K: FieldKind> Nullable<K> {
    /// Wraps `kind`.
    pub fn new(kind: K) -> Self {
        Nullable(kind)
    }

    /// Returns the wrapped kind.
    pub fn inner(&self) -> &K {
        &self.0
    }
}

impl<K: FieldKind> FieldKind for Nullable<K> {
    type Value = Option<K::Value>;

    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    fn cast(&self, raw: &RawValue) -> std::result::Result<Self::Value, FieldError> {
        self.0.cast(raw).map(Some)
    }

    fn validate(&self, value: &Self::Value) -> std::result::Result<(), FieldError> {
        match value {
            Some(value) => self.0.validate(value),
            None => Ok(()),
        }
    }

    fn null_value(&self) -> Option<Self::Value> {
        Some(None)
    }
}

/// A field declaration: a kind plus the options every field supports.
///
/// Any `FieldKind` converts into a `FieldDecl` with no default and no alias, so
/// the options are only spelled out when they are needed.
///
/// ```
/// use layercfg::domain::kinds::Int;
/// use layercfg::domain::{FieldDecl, FieldKindExt};
///
/// let decl: FieldDecl<Int> = Int::new().with_default(5432).alias("pg_port");
/// assert_eq!(decl.default_value(), Some(&5432));
/// assert_eq!(decl.alias_name(), Some("pg_port"));
/// ```
pub struct FieldDecl<K: FieldKind> {
    kind: K,
    default: Option<K::Value>,
    alias: Option<String>,
}

impl<K: FieldKind> FieldDecl<K> {
    /// Creates a declaration without default or alias.
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            default: None,
            alias: None,
        }
    }

    /// Sets the value used when no source has one. Defaults are trusted and
    /// bypass cast and validation.
    pub fn with_default(mut self, value: impl Into<K::Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the key segment used instead of the attribute name.
    ///
    /// An empty alias is ignored.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.alias = if alias.is_empty() { None } else { Some(alias) };
        self
    }

    /// Makes the field accept null, keeping any default.
    pub fn nullable(self) -> FieldDecl<Nullable<K>> {
        FieldDecl {
            kind: Nullable(self.kind),
            default: self.default.map(Some),
            alias: self.alias,
        }
    }

    /// Returns the kind.
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Returns the default value, if any.
    pub fn default_value(&self) -> Option<&K::Value> {
        self.default.as_ref()
    }

    /// Returns the alias, if any.
    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the key segment this declaration contributes for `name`.
    pub fn segment<'a>(&'a self, name: &'a str) -> &'a str {
        self.alias.as_deref().unwrap_or(name)
    }
}

impl<K: FieldKind> From<K> for FieldDecl<K> {
    fn from(kind: K) -> Self {
        FieldDecl::new(kind)
    }
}

impl<K: FieldKind + fmt::Debug> fmt::Debug for FieldDecl<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("kind", &self.kind)
            .field("has_default", &self.default.is_some())
            .field("alias", &self.alias)
            .finish()
    }
}

/// Declaration shortcuts available on every field kind.
pub trait FieldKindExt: FieldKind + Sized {
    /// See [`FieldDecl::with_default`].
    fn with_default(self, value: impl Into<Self::Value>) -> FieldDecl<Self> {
        FieldDecl::new(self).with_default(value)
    }

    /// See [`FieldDecl::alias`].
    fn alias(self, alias: impl Into<String>) -> FieldDecl<Self> {
        FieldDecl::new(self).alias(alias)
    }

    /// Accepts null raw values, resolving them to `None`.
    fn nullable(self) -> Nullable<Self> {
        Nullable(self)
    }
}

impl<K: FieldKind> FieldKindExt for K {}

/// A field bound to a key path and a source.
///
/// Reading a field resolves it on first access and returns the cached value
/// afterwards. Concurrent first accesses are serialized, so the value is
/// computed at most once. A failed resolution is not cached: the next call to
/// [`get`](Field::get) tries again.
///
/// Cloning a `Field` shares the cache.
pub struct Field<K: FieldKind> {
    slot: Arc<FieldSlot<K>>,
}

impl<K: FieldKind> Field<K> {
    /// Binds a declaration to `path` and `source`. Nothing is resolved yet.
    pub fn bind(
        name: impl Into<String>,
        path: KeyPath,
        decl: FieldDecl<K>,
        source: Arc<dyn ConfigSource>,
    ) -> Self {
        Self {
            slot: Arc::new(FieldSlot {
                name: name.into(),
                path,
                kind: decl.kind,
                default: decl.default,
                source,
                cell: OnceCell::new(),
            }),
        }
    }

    /// Returns the value, resolving it first if needed.
    ///
    /// # Errors
    ///
    /// - `ConfigError::ValueNotFound` if no source has the key and there is no default
    /// - `ConfigError::NullValueError` if a source holds null and the kind is not nullable
    /// - `ConfigError::TypeConversionError` if the raw value cannot be cast
    /// - `ConfigError::ValidationError` if the cast value is rejected
    pub fn get(&self) -> Result<&K::Value> {
        self.slot.resolve()
    }

    /// Returns the cached value without resolving.
    pub fn cached(&self) -> Option<&K::Value> {
        self.slot.cell.get()
    }

    /// Returns true once a value has been cached.
    pub fn is_resolved(&self) -> bool {
        self.slot.cell.get().is_some()
    }

    /// Returns the attribute name this field was declared with.
    pub fn name(&self) -> &str {
        &self.slot.name
    }

    /// Returns the effective key path.
    pub fn key_path(&self) -> &KeyPath {
        &self.slot.path
    }

    /// Returns the kind.
    pub fn kind(&self) -> &K {
        &self.slot.kind
    }

    pub(crate) fn erased(&self) -> Arc<dyn Resolve> {
        self.slot.clone()
    }
}

impl<K: FieldKind> Clone for Field<K> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<K> fmt::Debug for Field<K>
where
    K: FieldKind,
    K::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.slot.name)
            .field("key", &self.slot.path.to_string())
            .field("value", &self.slot.cell.get())
            .finish()
    }
}

struct FieldSlot<K: FieldKind> {
    name: String,
    path: KeyPath,
    kind: K,
    default: Option<K::Value>,
    source: Arc<dyn ConfigSource>,
    cell: OnceCell<K::Value>,
}

impl<K: FieldKind> FieldSlot<K> {
    fn resolve(&self) -> Result<&K::Value> {
        self.cell.get_or_try_init(|| self.load())
    }

    fn load(&self) -> Result<K::Value> {
        let raw = match self.source.get(&self.path)? {
            Some(raw) => raw,
            None => {
                return match &self.default {
                    Some(default) => {
                        tracing::trace!("Using default for configuration key '{}'", self.path);
                        Ok(default.clone())
                    }
                    None => Err(ConfigError::ValueNotFound {
                        key: self.path.to_string(),
                    }),
                };
            }
        };

        if raw.is_null() {
            return self
                .kind
                .null_value()
                .ok_or_else(|| ConfigError::NullValueError {
                    key: self.path.to_string(),
                });
        }

        let value = self
            .kind
            .cast(&raw)
            .map_err(|e| e.at(&self.path, self.kind.type_name()))?;
        self.kind
            .validate(&value)
            .map_err(|e| e.at(&self.path, self.kind.type_name()))?;

        tracing::trace!(
            "Resolved configuration key '{}' as {}",
            self.path,
            self.kind.type_name()
        );
        Ok(value)
    }
}

/// Type-erased view of a bound field, used to walk a whole configuration tree.
pub(crate) trait Resolve: Send + Sync {
    fn resolve_erased(&self) -> Result<()>;
    fn key_path(&self) -> &KeyPath;
    fn is_resolved(&self) -> bool;
}

impl<K: FieldKind> Resolve for FieldSlot<K> {
    fn resolve_erased(&self) -> Result<()> {
        self.resolve().map(|_| ())
    }

    fn key_path(&self) -> &KeyPath {
        &self.path
    }

    fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }
}
