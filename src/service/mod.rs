// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer building configuration trees over a source chain.
//!
//! [`ChainedSource`] composes sources in precedence order. [`ConfigBuilder`]
//! collects the sources and builds a [`Config`] whose groups implement
//! [`ConfigGroup`].

pub mod chained;
pub mod config;

pub use chained::ChainedSource;
pub use config::{Config, ConfigBuilder, ConfigGroup, Scope};
