// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in field kinds.
//!
//! Each kind implements [`FieldKind`](crate::domain::FieldKind): a deterministic
//! cast from a raw value plus an optional semantic check. Custom kinds implement
//! the same trait.

pub mod choice;
pub mod list;
pub mod path;
pub mod scalar;

pub use choice::{level_filter, Choice, EnumField, LogLevel};
pub use list::ListField;
pub use path::{PathExpectation, PathField};
pub use scalar::{Bool, Byte, ByteArray, DecimalField, Float, Int, Str};
