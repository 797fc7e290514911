// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scalar field kinds: booleans, numbers, strings and byte strings.

use crate::domain::errors::{BoxError, FieldError};
use crate::domain::field::FieldKind;
use crate::domain::raw_value::RawValue;
use rust_decimal::Decimal;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

type CastResult<T> = std::result::Result<T, FieldError>;

/// Strings that cast to `true`, compared case-insensitively.
const TRUTHY: &[&str] = &["1", "true", "t", "yes", "y", "+"];

/// Boolean field.
///
/// Recognizes `1`, `true`, `t`, `yes`, `y` and `+` in any case, the integer
/// `1` and a native `true`. Every other value casts to `false`; this kind
/// never fails.
///
/// ```
/// use layercfg::domain::kinds::Bool;
/// use layercfg::domain::{FieldKind, RawValue};
///
/// assert!(Bool::new().cast(&RawValue::from("YES")).unwrap());
/// assert!(!Bool::new().cast(&RawValue::from("nope")).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Bool;

impl Bool {
    /// Creates a boolean kind.
    pub fn new() -> Self {
        Bool
    }
}

impl FieldKind for Bool {
    type Value = bool;

    fn type_name(&self) -> &'static str {
        "bool"
    }

    fn cast(&self, raw: &RawValue) -> CastResult<bool> {
        Ok(match raw {
            RawValue::Bool(b) => *b,
            RawValue::Int(i) => *i == 1,
            RawValue::String(s) => {
                let lowered = s.to_lowercase();
                TRUTHY.contains(&lowered.as_str())
            }
            _ => false,
        })
    }
}

/// Integer field, generic over the target integer type (`i64` by default).
///
/// Strings are trimmed and parsed; native integers are range-checked; floats
/// are accepted only when they have no fractional part.
pub struct Int<T = i64>(PhantomData<fn() -> T>);

impl<T> Int<T> {
    /// Creates an integer kind.
    pub fn new() -> Self {
        Int(PhantomData)
    }
}

impl<T> Default for Int<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Int<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Int<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Int<{}>", std::any::type_name::<T>())
    }
}

impl<T> FieldKind for Int<T>
where
    T: FromStr + TryFrom<i64> + Clone + Send + Sync + 'static,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    <T as TryFrom<i64>>::Error: std::error::Error + Send + Sync + 'static,
{
    type Value = T;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn cast(&self, raw: &RawValue) -> CastResult<T> {
        match raw {
            RawValue::Int(i) => T::try_from(*i).map_err(FieldError::cast),
            RawValue::Bool(b) => T::try_from(i64::from(*b)).map_err(FieldError::cast),
            RawValue::Float(x) if x.is_finite() && x.fract() == 0.0 => {
                T::try_from(*x as i64).map_err(FieldError::cast)
            }
            RawValue::String(s) => s.trim().parse::<T>().map_err(FieldError::cast),
            other => Err(not_convertible(other, "an integer")),
        }
    }
}

/// Floating point field.
#[derive(Debug, Clone, Copy, Default)]
pub struct Float;

impl Float {
    /// Creates a float kind.
    pub fn new() -> Self {
        Float
    }
}

impl FieldKind for Float {
    type Value = f64;

    fn type_name(&self) -> &'static str {
        "f64"
    }

    fn cast(&self, raw: &RawValue) -> CastResult<f64> {
        match raw {
            RawValue::Float(x) => Ok(*x),
            RawValue::Int(i) => Ok(*i as f64),
            RawValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            RawValue::String(s) => s.trim().parse::<f64>().map_err(FieldError::cast),
            other => Err(not_convertible(other, "a float")),
        }
    }
}

/// Exact decimal field backed by `rust_decimal`.
///
/// Strings are parsed exactly, falling back to scientific notation
/// (`"1.5e3"`). Native floats go through `Decimal::try_from`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalField;

impl DecimalField {
    /// Creates a decimal kind.
    pub fn new() -> Self {
        DecimalField
    }
}

impl FieldKind for DecimalField {
    type Value = Decimal;

    fn type_name(&self) -> &'static str {
        "decimal"
    }

    fn cast(&self, raw: &RawValue) -> CastResult<Decimal> {
        match raw {
            RawValue::Int(i) => Ok(Decimal::from(*i)),
            RawValue::Float(x) => Decimal::try_from(*x).map_err(FieldError::cast),
            RawValue::String(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .map_err(FieldError::cast)
            }
            other => Err(not_convertible(other, "a decimal")),
        }
    }
}

/// String field. Scalars are stringified; this kind never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Str;

impl Str {
    /// Creates a string kind.
    pub fn new() -> Self {
        Str
    }
}

impl FieldKind for Str {
    type Value = String;

    fn type_name(&self) -> &'static str {
        "string"
    }

    fn cast(&self, raw: &RawValue) -> CastResult<String> {
        Ok(match raw {
            RawValue::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Immutable byte string field. Text is encoded as UTF-8; a list of integers
/// in `0..=255` is taken byte by byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct Byte;

impl Byte {
    /// Creates a byte string kind.
    pub fn new() -> Self {
        Byte
    }
}

impl FieldKind for Byte {
    type Value = Box<[u8]>;

    fn type_name(&self) -> &'static str {
        "bytes"
    }

    fn cast(&self, raw: &RawValue) -> CastResult<Box<[u8]>> {
        to_bytes(raw).map(Vec::into_boxed_slice)
    }
}

/// Growable byte buffer field, same casting rules as [`Byte`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteArray;

impl ByteArray {
    /// Creates a byte buffer kind.
    pub fn new() -> Self {
        ByteArray
    }
}

impl FieldKind for ByteArray {
    type Value = Vec<u8>;

    fn type_name(&self) -> &'static str {
        "bytearray"
    }

    fn cast(&self, raw: &RawValue) -> CastResult<Vec<u8>> {
        to_bytes(raw)
    }
}

fn to_bytes(raw: &RawValue) -> CastResult<Vec<u8>> {
    match raw {
        RawValue::String(s) => Ok(s.as_bytes().to_vec()),
        RawValue::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                RawValue::Int(b) => u8::try_from(*b)
                    .map_err(|e| FieldError::cast(e).context(format!("byte {}", i))),
                other => Err(not_convertible(other, "a byte").context(format!("byte {}", i))),
            })
            .collect(),
        other => Err(not_convertible(other, "bytes")),
    }
}

pub(crate) fn not_convertible(raw: &RawValue, target: &str) -> FieldError {
    let message: BoxError = format!("cannot convert {} '{}' to {}", raw.type_name(), raw, target).into();
    FieldError::Cast(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_bool_truthy_values() {
        let kind = Bool::new();
        for raw in ["1", "true", "TRUE", "t", "yes", "Y", "+"] {
            assert!(kind.cast(&RawValue::from(raw)).unwrap(), "{raw} should be true");
        }
        assert!(kind.cast(&RawValue::Int(1)).unwrap());
        assert!(kind.cast(&RawValue::Bool(true)).unwrap());
    }

    #[test]
    fn test_bool_falsy_values() {
        let kind = Bool::new();
        for raw in ["0", "false", "no", "", "random"] {
            assert!(!kind.cast(&RawValue::from(raw)).unwrap(), "{raw} should be false");
        }
        assert!(!kind.cast(&RawValue::Int(0)).unwrap());
        assert!(!kind.cast(&RawValue::Int(2)).unwrap());
        assert!(!kind.cast(&RawValue::Float(1.0)).unwrap());
    }

    #[test]
    fn test_int_from_string() {
        let kind = Int::<i64>::new();
        assert_eq!(kind.cast(&RawValue::from(" 42 ")).unwrap(), 42);
        assert_eq!(kind.cast(&RawValue::from("-7")).unwrap(), -7);
        assert!(kind.cast(&RawValue::from("4.2")).is_err());
        assert!(kind.cast(&RawValue::from("forty")).is_err());
    }

    #[test]
    fn test_int_from_native() {
        let kind = Int::<u16>::new();
        assert_eq!(kind.cast(&RawValue::Int(8080)).unwrap(), 8080);
        assert_eq!(kind.cast(&RawValue::Float(80.0)).unwrap(), 80);
        assert_eq!(kind.cast(&RawValue::Bool(true)).unwrap(), 1);
        assert!(kind.cast(&RawValue::Int(70_000)).is_err());
        assert!(kind.cast(&RawValue::Int(-1)).is_err());
        assert!(kind.cast(&RawValue::Float(1.5)).is_err());
        assert!(matches!(
            kind.cast(&RawValue::List(vec![])),
            Err(FieldError::Cast(_))
        ));
    }

    #[test]
    fn test_int_type_name() {
        assert_eq!(Int::<u16>::new().type_name(), "u16");
        assert_eq!(Int::<i64>::new().type_name(), "i64");
    }

    #[test]
    fn test_float_cast() {
        let kind = Float::new();
        assert_eq!(kind.cast(&RawValue::from("3.5")).unwrap(), 3.5);
        assert_eq!(kind.cast(&RawValue::Int(2)).unwrap(), 2.0);
        assert!(kind.cast(&RawValue::from("x")).is_err());
    }

    #[test]
    fn test_decimal_cast_is_exact() {
        let kind = DecimalField::new();
        assert_eq!(
            kind.cast(&RawValue::from("0.1")).unwrap(),
            Decimal::from_str("0.1").unwrap()
        );
        assert_eq!(kind.cast(&RawValue::Int(3)).unwrap(), Decimal::from(3));
        assert_eq!(
            kind.cast(&RawValue::from("1.5e3")).unwrap(),
            Decimal::from(1500)
        );
        assert!(kind.cast(&RawValue::from("abc")).is_err());
    }

    #[test]
    fn test_str_cast() {
        let kind = Str::new();
        assert_eq!(kind.cast(&RawValue::from("hello")).unwrap(), "hello");
        assert_eq!(kind.cast(&RawValue::Int(5)).unwrap(), "5");
        assert_eq!(kind.cast(&RawValue::Bool(false)).unwrap(), "false");
    }

    #[test]
    fn test_bytes_cast() {
        let raw = RawValue::from("héllo");
        assert_eq!(&*Byte::new().cast(&raw).unwrap(), "héllo".as_bytes());
        assert_eq!(ByteArray::new().cast(&raw).unwrap(), "héllo".as_bytes().to_vec());

        let raw = RawValue::from(vec![1_i64, 2, 255]);
        assert_eq!(ByteArray::new().cast(&raw).unwrap(), vec![1, 2, 255]);

        let raw = RawValue::from(vec![256_i64]);
        let err = ByteArray::new().cast(&raw).unwrap_err();
        assert!(err.to_string().starts_with("byte 0"));

        assert!(Byte::new().cast(&RawValue::Int(5)).is_err());
    }
}
