// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing configuration source implementations.
//!
//! This module contains concrete implementations of the `ConfigSource` and
//! `ConfigParser` traits defined in the ports layer. Every source loads its data
//! once, at construction, and answers lookups from memory afterwards.

pub mod dict;
pub mod file;
pub mod flat;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "dotenv")]
pub mod dotenv;
#[cfg(feature = "env")]
pub mod env_var;
#[cfg(feature = "ini")]
pub mod ini_file;
#[cfg(feature = "json")]
pub mod json_file;
#[cfg(feature = "toml")]
pub mod toml_file;
#[cfg(feature = "yaml")]
pub mod yaml_file;

pub use dict::DictAdapter;
pub use file::FileAdapter;
pub use flat::FlatStore;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::CommandLineAdapter;
#[cfg(feature = "dotenv")]
pub use dotenv::DotEnvAdapter;
#[cfg(feature = "env")]
pub use env_var::EnvVarAdapter;
#[cfg(feature = "ini")]
pub use ini_file::{IniFileAdapter, IniParser};
#[cfg(feature = "json")]
pub use json_file::{JsonFileAdapter, JsonParser};
#[cfg(feature = "toml")]
pub use toml_file::{TomlFileAdapter, TomlParser};
#[cfg(feature = "yaml")]
pub use yaml_file::{YamlFileAdapter, YamlParser};
