// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem path fields.

use crate::domain::errors::FieldError;
use crate::domain::field::FieldKind;
use crate::domain::kinds::scalar::not_convertible;
use crate::domain::raw_value::RawValue;
use std::path::PathBuf;

/// What a path field expects to find on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathExpectation {
    /// Anything that exists.
    Any,
    /// A regular file.
    File,
    /// A directory.
    Folder,
}

/// Filesystem path field.
///
/// The path must exist unless [`missing_ok`](PathField::missing_ok) is set.
/// The [`file`](PathField::file) and [`folder`](PathField::folder) variants
/// additionally check what an existing path points to.
///
/// ```
/// use layercfg::domain::kinds::PathField;
/// use layercfg::domain::{FieldKind, RawValue};
///
/// let kind = PathField::file().missing_ok(true);
/// let path = kind.cast(&RawValue::from("/does/not/exist.toml")).unwrap();
/// assert!(kind.validate(&path).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PathField {
    expect: PathExpectation,
    missing_ok: bool,
}

impl PathField {
    /// A path that must exist.
    pub fn new() -> Self {
        Self {
            expect: PathExpectation::Any,
            missing_ok: false,
        }
    }

    /// A path that must be a regular file.
    pub fn file() -> Self {
        Self {
            expect: PathExpectation::File,
            missing_ok: false,
        }
    }

    /// A path that must be a directory.
    pub fn folder() -> Self {
        Self {
            expect: PathExpectation::Folder,
            missing_ok: false,
        }
    }

    /// Tolerates paths that do not exist.
    pub fn missing_ok(mut self, missing_ok: bool) -> Self {
        self.missing_ok = missing_ok;
        self
    }

    /// Returns what this field expects on disk.
    pub fn expectation(&self) -> PathExpectation {
        self.expect
    }
}

impl Default for PathField {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldKind for PathField {
    type Value = PathBuf;

    fn type_name(&self) -> &'static str {
        match self.expect {
            PathExpectation::Any => "path",
            PathExpectation::File => "file",
            PathExpectation::Folder => "folder",
        }
    }

    fn cast(&self, raw: &RawValue) -> Result<PathBuf, FieldError> {
        match raw {
            RawValue::String(s) => Ok(PathBuf::from(s)),
            other => Err(not_convertible(other, "a path")),
        }
    }

    fn validate(&self, value: &PathBuf) -> Result<(), FieldError> {
        if !value.exists() {
            if self.missing_ok {
                return Ok(());
            }
            return Err(FieldError::invalid(format!(
                "{} does not exist",
                value.display()
            )));
        }

        match self.expect {
            PathExpectation::Any => Ok(()),
            PathExpectation::File if value.is_file() => Ok(()),
            PathExpectation::Folder if value.is_dir() => Ok(()),
            PathExpectation::File => Err(FieldError::invalid(format!(
                "{} is not a file",
                value.display()
            ))),
            PathExpectation::Folder => Err(FieldError::invalid(format!(
                "{} is not a directory",
                value.display()
            ))),
        }
    }
}
