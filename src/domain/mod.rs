// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the core types of the resolution engine.
//!
//! Everything here is free of I/O: key paths, raw values, the error taxonomy,
//! field kinds and the bound fields that cast, validate and cache values.

pub mod errors;
pub mod field;
pub mod key_path;
pub mod kinds;
pub mod mapper;
pub mod raw_value;

// Re-export commonly used types
pub use errors::{BoxError, ConfigError, FieldError, Result};
pub use field::{Field, FieldDecl, FieldKind, FieldKindExt, Nullable};
pub(crate) use field::Resolve;
pub use key_path::KeyPath;
pub use mapper::{DynKind, Inferred, KindMapper};
pub use raw_value::{FromRaw, RawValue};
