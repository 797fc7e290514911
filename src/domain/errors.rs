// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! This module defines the error types that can occur while building sources and
//! resolving configuration fields. All errors use `thiserror` for proper error
//! handling and conversion.

use crate::domain::key_path::KeyPath;
use thiserror::Error;

/// A boxed error used to chain underlying failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for configuration operations.
///
/// Application code can match the specific variant for fine-grained handling,
/// or treat any `ConfigError` as "this configuration is unusable". It is marked
/// as `#[non_exhaustive]` to allow for future additions without breaking
/// backwards compatibility.
///
/// # Examples
///
/// ```
/// use layercfg::domain::errors::ConfigError;
///
/// fn get_config_value() -> Result<String, ConfigError> {
///     Err(ConfigError::ValueNotFound {
///         key: "database.host".to_string(),
///     })
/// }
///
/// let err = get_config_value().unwrap_err();
/// assert!(err.is_not_found());
/// assert_eq!(err.key(), Some("database.host"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No source yields a value for a required field.
    #[error("Configuration value not found: {key}")]
    ValueNotFound {
        /// The dotted key path of the field
        key: String,
    },

    /// Failed to convert a raw value to the field's declared type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The dotted key path of the field
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: BoxError,
    },

    /// The value was converted but is not acceptable.
    #[error("Invalid configuration value for key '{key}': {message}")]
    ValidationError {
        /// The dotted key path of the field
        key: String,
        /// Why the value was rejected
        message: String,
    },

    /// A source yielded null for a field that is not nullable.
    #[error("Configuration value for key '{key}' is null but the field is not nullable")]
    NullValueError {
        /// The dotted key path of the field
        key: String,
    },

    /// A source could not be constructed because its backing resource is
    /// missing or unreadable.
    #[error("Configuration source '{source_name}' unavailable: {message}")]
    SourceUnavailable {
        /// The name of the source
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// A source failed while answering a lookup.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// Failed to parse a configuration document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<BoxError>,
    },

    /// A key path could not be built.
    #[error("Invalid configuration key '{key}': {message}")]
    InvalidKey {
        /// The offending key
        key: String,
        /// The error message
        message: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Returns the dotted key of the field this error is about, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::ValueNotFound { key }
            | ConfigError::TypeConversionError { key, .. }
            | ConfigError::ValidationError { key, .. }
            | ConfigError::NullValueError { key }
            | ConfigError::InvalidKey { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Returns true if no source had a value for a required field.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::ValueNotFound { .. })
    }

    /// Returns true for failures of a single field: missing, uncastable,
    /// invalid or unexpectedly null.
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ValueNotFound { .. }
                | ConfigError::TypeConversionError { .. }
                | ConfigError::ValidationError { .. }
                | ConfigError::NullValueError { .. }
        )
    }
}

/// A failure reported by a field kind while casting or validating a value.
///
/// Field kinds do not know which key they are resolving; the field wraps a
/// `FieldError` into a `ConfigError` carrying the key path.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The raw value could not be converted to the target type.
    #[error("{0}")]
    Cast(#[source] BoxError),

    /// The converted value failed a semantic check.
    #[error("{0}")]
    Invalid(String),
}

impl FieldError {
    /// Creates a cast failure from any error or message.
    pub fn cast(err: impl Into<BoxError>) -> Self {
        FieldError::Cast(err.into())
    }

    /// Creates a validation failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        FieldError::Invalid(message.into())
    }

    /// Prefixes the message with `context`, keeping the category.
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        match self {
            FieldError::Cast(err) => FieldError::Cast(format!("{}: {}", context, err).into()),
            FieldError::Invalid(message) => FieldError::Invalid(format!("{}: {}", context, message)),
        }
    }

    /// Converts into a `ConfigError` for the field at `key`.
    pub fn at(self, key: &KeyPath, target_type: &str) -> ConfigError {
        match self {
            FieldError::Cast(source) => ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: target_type.to_string(),
                source,
            },
            FieldError::Invalid(message) => ConfigError::ValidationError {
                key: key.to_string(),
                message,
            },
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
