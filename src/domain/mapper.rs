// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping Rust types to field kinds.
//!
//! Fields are normally declared with an explicit kind. When it is more natural to
//! declare a field by its Rust type, the type's [`Inferred`] implementation picks
//! the default kind, and a [`KindMapper`] handed to the configuration builder can
//! replace that choice for a whole configuration tree.

use crate::domain::errors::FieldError;
use crate::domain::field::{FieldKind, Nullable};
use crate::domain::kinds::{Bool, DecimalField, Float, Int, ListField, PathField, Str};
use crate::domain::raw_value::RawValue;
use rust_decimal::Decimal;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// A type-erased field kind producing `T`.
pub struct DynKind<T>(Arc<dyn FieldKind<Value = T>>);

impl<T: Clone + Send + Sync + 'static> DynKind<T> {
    /// Erases `kind`.
    pub fn new<K: FieldKind<Value = T>>(kind: K) -> Self {
        DynKind(Arc::new(kind))
    }
}

impl<T> Clone for DynKind<T> {
    fn clone(&self) -> Self {
        DynKind(Arc::clone(&self.0))
    }
}

impl<T: Clone + Send + Sync + 'static> fmt::Debug for DynKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynKind({})", self.0.type_name())
    }
}

impl<T: Clone + Send + Sync + 'static> FieldKind for DynKind<T> {
    type Value = T;

    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    fn cast(&self, raw: &RawValue) -> Result<T, FieldError> {
        self.0.cast(raw)
    }

    fn validate(&self, value: &T) -> Result<(), FieldError> {
        self.0.validate(value)
    }

    fn null_value(&self) -> Option<T> {
        self.0.null_value()
    }
}

/// Types with a default field kind.
pub trait Inferred: Clone + Send + Sync + 'static {
    /// The kind used when no [`KindMapper`] override exists.
    fn default_kind() -> DynKind<Self>;
}

macro_rules! inferred_int {
    ($($t:ty),*) => {
        $(
            impl Inferred for $t {
                fn default_kind() -> DynKind<Self> {
                    DynKind::new(Int::<$t>::new())
                }
            }
        )*
    };
}

inferred_int!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl Inferred for bool {
    fn default_kind() -> DynKind<Self> {
        DynKind::new(Bool)
    }
}

impl Inferred for f64 {
    fn default_kind() -> DynKind<Self> {
        DynKind::new(Float)
    }
}

impl Inferred for String {
    fn default_kind() -> DynKind<Self> {
        DynKind::new(Str)
    }
}

impl Inferred for PathBuf {
    fn default_kind() -> DynKind<Self> {
        DynKind::new(PathField::new())
    }
}

impl Inferred for Decimal {
    fn default_kind() -> DynKind<Self> {
        DynKind::new(DecimalField)
    }
}

impl Inferred for Vec<String> {
    fn default_kind() -> DynKind<Self> {
        DynKind::new(ListField::new())
    }
}

impl<T: Inferred> Inferred for Option<T> {
    fn default_kind() -> DynKind<Self> {
        DynKind::new(Nullable::new(T::default_kind()))
    }
}

/// Per-tree overrides of the kind used for a Rust type.
///
/// ```
/// use layercfg::domain::kinds::PathField;
/// use layercfg::domain::{FieldKind, KindMapper, RawValue};
/// use std::path::PathBuf;
///
/// let mapper = KindMapper::new().with_kind(PathField::new().missing_ok(true));
/// let kind = mapper.kind_for::<PathBuf>();
/// let path = kind.cast(&RawValue::from("/nowhere")).unwrap();
/// assert!(kind.validate(&path).is_ok());
/// ```
#[derive(Clone, Default)]
pub struct KindMapper {
    overrides: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl KindMapper {
    /// Creates a mapper without overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `kind` for every field inferred as `K::Value`.
    pub fn with_kind<K: FieldKind>(mut self, kind: K) -> Self {
        self.overrides
            .insert(TypeId::of::<K::Value>(), Arc::new(DynKind::new(kind)));
        self
    }

    /// Returns the kind for `T`: the override if one was registered, the
    /// type's default kind otherwise.
    pub fn kind_for<T: Inferred>(&self) -> DynKind<T> {
        self.overrides
            .get(&TypeId::of::<T>())
            .and_then(|kind| kind.downcast_ref::<DynKind<T>>())
            .cloned()
            .unwrap_or_else(T::default_kind)
    }

    /// Returns true if `T` has an override.
    pub fn has_override<T: 'static>(&self) -> bool {
        self.overrides.contains_key(&TypeId::of::<T>())
    }
}

impl fmt::Debug for KindMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindMapper")
            .field("overrides", &self.overrides.len())
            .finish()
    }
}
