// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fields restricted to a fixed set of values: choices, enums and log levels.

use crate::domain::errors::{BoxError, FieldError};
use crate::domain::field::FieldKind;
use crate::domain::kinds::scalar::not_convertible;
use crate::domain::raw_value::{FromRaw, RawValue};
use serde::de::value::{Error as DeError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;

type CastFn<T> = Arc<dyn Fn(&RawValue) -> Result<T, BoxError> + Send + Sync>;

enum Caster<T> {
    Direct(fn(&RawValue) -> Option<T>),
    Custom(CastFn<T>),
}

impl<T> Clone for Caster<T> {
    fn clone(&self) -> Self {
        match self {
            Caster::Direct(f) => Caster::Direct(*f),
            Caster::Custom(f) => Caster::Custom(Arc::clone(f)),
        }
    }
}

/// A field whose value must be one of a fixed set.
///
/// Without a cast function the raw value itself is checked, so a string
/// `"10"` is not a member of `[10, 100]`. With one, the raw value is cast
/// first and the result is checked.
///
/// ```
/// use layercfg::domain::kinds::{Choice, Int};
/// use layercfg::domain::{FieldKind, RawValue};
///
/// let kind = Choice::new([10_i64, 100]).cast_as(Int::new());
/// let value = kind.cast(&RawValue::from("10")).unwrap();
/// assert!(kind.validate(&value).is_ok());
///
/// let value = kind.cast(&RawValue::from("2")).unwrap();
/// assert!(kind.validate(&value).is_err());
/// ```
pub struct Choice<T> {
    choices: Vec<T>,
    caster: Caster<T>,
}

impl<T> Choice<T>
where
    T: FromRaw + PartialEq + fmt::Debug + Clone + Send + Sync + 'static,
{
    /// Creates a choice that checks raw values directly.
    pub fn new(choices: impl IntoIterator<Item = T>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
            caster: Caster::Direct(T::from_raw),
        }
    }
}

impl<T> Choice<T>
where
    T: PartialEq + fmt::Debug + Clone + Send + Sync + 'static,
{
    /// Creates a choice whose raw values are converted by `cast` first.
    pub fn with_cast<F>(choices: impl IntoIterator<Item = T>, cast: F) -> Self
    where
        F: Fn(&RawValue) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            choices: choices.into_iter().collect(),
            caster: Caster::Custom(Arc::new(cast)),
        }
    }

    /// Replaces the cast function.
    pub fn cast_with<F>(mut self, cast: F) -> Self
    where
        F: Fn(&RawValue) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.caster = Caster::Custom(Arc::new(cast));
        self
    }

    /// Uses another field kind's cast and validation as the cast function.
    pub fn cast_as<K>(self, kind: K) -> Self
    where
        K: FieldKind<Value = T>,
    {
        self.cast_with(move |raw| {
            let value = kind.cast(raw)?;
            kind.validate(&value)?;
            Ok(value)
        })
    }

    /// Returns the allowed values.
    pub fn choices(&self) -> &[T] {
        &self.choices
    }
}

impl<T: Clone> Clone for Choice<T> {
    fn clone(&self) -> Self {
        Self {
            choices: self.choices.clone(),
            caster: self.caster.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Choice")
            .field("choices", &self.choices)
            .field("custom_cast", &matches!(self.caster, Caster::Custom(_)))
            .finish()
    }
}

impl<T> FieldKind for Choice<T>
where
    T: PartialEq + fmt::Debug + Clone + Send + Sync + 'static,
{
    type Value = T;

    fn type_name(&self) -> &'static str {
        "choice"
    }

    fn cast(&self, raw: &RawValue) -> Result<T, FieldError> {
        match &self.caster {
            Caster::Direct(from_raw) => from_raw(raw).ok_or_else(|| {
                FieldError::invalid(format!("'{}' is not in {:?}", raw, self.choices))
            }),
            Caster::Custom(cast) => cast(raw).map_err(FieldError::Cast),
        }
    }

    fn validate(&self, value: &T) -> Result<(), FieldError> {
        if self.choices.contains(value) {
            Ok(())
        } else {
            Err(FieldError::invalid(format!(
                "{:?} is not in {:?}",
                value, self.choices
            )))
        }
    }
}

/// A field naming a variant of a `serde`-deserializable enum.
///
/// Variant names follow the enum's serde attributes, so
/// `#[serde(rename_all = "lowercase")]` makes lookups lower-case.
///
/// ```
/// use layercfg::domain::kinds::EnumField;
/// use layercfg::domain::{FieldKind, RawValue};
/// use serde::Deserialize;
///
/// #[derive(Debug, Clone, PartialEq, Deserialize)]
/// enum Mode {
///     Fast,
///     Safe,
/// }
///
/// let kind = EnumField::<Mode>::new();
/// assert_eq!(kind.cast(&RawValue::from("Safe")).unwrap(), Mode::Safe);
/// assert!(kind.cast(&RawValue::from("Slow")).is_err());
/// ```
pub struct EnumField<E>(PhantomData<fn() -> E>);

impl<E> EnumField<E> {
    /// Creates an enum kind.
    pub fn new() -> Self {
        EnumField(PhantomData)
    }
}

impl<E> Default for EnumField<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EnumField<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EnumField<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumField<{}>", std::any::type_name::<E>())
    }
}

impl<E> FieldKind for EnumField<E>
where
    E: DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Value = E;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    fn cast(&self, raw: &RawValue) -> Result<E, FieldError> {
        let name = raw
            .as_str()
            .ok_or_else(|| not_convertible(raw, "an enum variant name"))?;
        let deserializer: StrDeserializer<'_, DeError> = name.into_deserializer();
        E::deserialize(deserializer).map_err(|e| {
            FieldError::invalid(format!(
                "'{}' is not a member of {}: {}",
                name,
                std::any::type_name::<E>(),
                e
            ))
        })
    }
}

/// Standard logging level names and their severities.
const LEVELS: &[(&str, u8)] = &[
    ("NOTSET", 0),
    ("DEBUG", 10),
    ("INFO", 20),
    ("WARNING", 30),
    ("ERROR", 40),
    ("CRITICAL", 50),
];

/// Log level field mapping level names to severity numbers.
///
/// Names are matched case-insensitively: `debug` is 10, `info` 20, `warning`
/// 30, `error` 40, `critical` 50 and `notset` 0. An integer equal to one of
/// those severities is accepted as is. Anything else is a validation failure.
/// Use [`level_filter`] to hand the result to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLevel;

impl LogLevel {
    /// Creates a log level kind.
    pub fn new() -> Self {
        LogLevel
    }
}

impl FieldKind for LogLevel {
    type Value = u8;

    fn type_name(&self) -> &'static str {
        "log level"
    }

    fn cast(&self, raw: &RawValue) -> Result<u8, FieldError> {
        match raw {
            RawValue::String(s) => {
                let upper = s.trim().to_uppercase();
                LEVELS
                    .iter()
                    .find(|(name, _)| *name == upper)
                    .map(|(_, severity)| *severity)
                    .ok_or_else(|| FieldError::invalid(format!("unknown log level '{}'", s)))
            }
            RawValue::Int(i) => LEVELS
                .iter()
                .find(|(_, severity)| i64::from(*severity) == *i)
                .map(|(_, severity)| *severity)
                .ok_or_else(|| FieldError::invalid(format!("unknown log severity {}", i))),
            other => Err(not_convertible(other, "a log level")),
        }
    }
}

/// Maps a severity produced by [`LogLevel`] onto a `tracing` filter.
///
/// ```
/// use layercfg::domain::kinds::level_filter;
/// use tracing::level_filters::LevelFilter;
///
/// assert_eq!(level_filter(20), LevelFilter::INFO);
/// assert_eq!(level_filter(50), LevelFilter::ERROR);
/// ```
pub fn level_filter(severity: u8) -> LevelFilter {
    match severity {
        0 => LevelFilter::TRACE,
        1..=10 => LevelFilter::DEBUG,
        11..=20 => LevelFilter::INFO,
        21..=30 => LevelFilter::WARN,
        _ => LevelFilter::ERROR,
    }
}
