// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delimited list fields.

use crate::domain::errors::FieldError;
use crate::domain::field::FieldKind;
use crate::domain::kinds::scalar::Str;
use crate::domain::raw_value::RawValue;

/// Default list delimiter.
pub const DEFAULT_DELIMITER: &str = ",";

/// A list field.
///
/// A string raw value is split on the delimiter (a comma by default) and each
/// part is trimmed. A native sequence, as YAML, JSON and TOML produce, is used
/// element by element without splitting. Each element goes through the
/// element kind's cast and validation. A blank string is an empty list and any
/// other scalar is a list of one.
///
/// ```
/// use layercfg::domain::kinds::{Int, ListField};
/// use layercfg::domain::{FieldKind, RawValue};
///
/// let kind = ListField::of(Int::<i64>::new());
/// assert_eq!(kind.cast(&RawValue::from("1,2,3")).unwrap(), vec![1, 2, 3]);
///
/// let kind = ListField::new();
/// assert_eq!(kind.cast(&RawValue::from(" a , b ")).unwrap(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct ListField<K = Str> {
    element: K,
    delimiter: String,
}

impl ListField<Str> {
    /// A list of strings split on commas.
    pub fn new() -> Self {
        Self::of(Str)
    }
}

impl Default for ListField<Str> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: FieldKind> ListField<K> {
    /// A list whose elements are cast by `element`.
    pub fn of(element: K) -> Self {
        Self {
            element,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }

    /// Sets the delimiter used to split string values.
    ///
    /// An empty delimiter keeps the whole string as a single element.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    fn element(&self, index: usize, raw: &RawValue) -> Result<K::Value, FieldError> {
        let value = self
            .element
            .cast(raw)
            .map_err(|e| e.context(format!("element {}", index)))?;
        self.element
            .validate(&value)
            .map_err(|e| e.context(format!("element {}", index)))?;
        Ok(value)
    }
}

impl<K: FieldKind> FieldKind for ListField<K> {
    type Value = Vec<K::Value>;

    fn type_name(&self) -> &'static str {
        "list"
    }

    fn cast(&self, raw: &RawValue) -> Result<Self::Value, FieldError> {
        match raw {
            RawValue::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.element(i, item))
                .collect(),
            RawValue::String(s) if s.trim().is_empty() => Ok(Vec::new()),
            RawValue::String(s) if self.delimiter.is_empty() => {
                Ok(vec![self.element(0, &RawValue::from(s.trim()))?])
            }
            RawValue::String(s) => s
                .split(self.delimiter.as_str())
                .enumerate()
                .map(|(i, part)| self.element(i, &RawValue::from(part.trim())))
                .collect(),
            other => Ok(vec![self.element(0, other)?]),
        }
    }
}
