// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture library for layered, typed configuration.
//!
//! Configuration is declared as a tree of plain structs whose members are typed
//! [`Field`](domain::Field)s and nested groups. Values are looked up in an ordered
//! chain of sources (command line, environment, `.env`, YAML, JSON, TOML, INI or
//! in-memory maps), cast to the declared type, validated, and cached.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and logic (`KeyPath`, `RawValue`, field kinds, errors)
//! - **Ports**: Trait definitions that define interfaces (`ConfigSource`, `ConfigParser`)
//! - **Adapters**: Implementations for specific configuration sources (env vars, files, etc.)
//! - **Service**: Source chaining and construction of configuration trees
//!
//! # Features
//!
//! - **Layered Sources**: The first source holding a key wins; order is the only precedence
//! - **Type Safety**: Every field declares a kind that casts and validates its raw value
//! - **Nesting and Aliases**: Groups nest to form key paths; any segment can be renamed
//! - **Fail-fast or Lazy**: Validate the whole tree at build time, or resolve on first access
//! - **Extensible**: Custom field kinds and sources are plain trait implementations
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `json`: Enable JSON file support (default)
//! - `toml`: Enable TOML file support (default)
//! - `ini`: Enable INI file support (default)
//! - `env`: Enable environment variable support (default)
//! - `dotenv`: Enable `.env` file support (default)
//! - `cli`: Enable command-line argument support (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use layercfg::domain::kinds::{Int, ListField, Str};
//! use layercfg::prelude::*;
//!
//! struct Server {
//!     host: Field<Str>,
//!     port: Field<Int<u16>>,
//!     tags: Field<ListField>,
//! }
//!
//! impl ConfigGroup for Server {
//!     fn build(scope: &mut Scope<'_>) -> Result<Self> {
//!         Ok(Self {
//!             host: scope.field("host", Str::new().with_default("127.0.0.1"))?,
//!             port: scope.field("port", Int::new())?,
//!             tags: scope.field("tags", ListField::new().with_default(Vec::<String>::new()))?,
//!         })
//!     }
//! }
//!
//! struct AppConfig {
//!     server: Server,
//! }
//!
//! impl ConfigGroup for AppConfig {
//!     fn build(scope: &mut Scope<'_>) -> Result<Self> {
//!         Ok(Self {
//!             server: scope.group("server")?,
//!         })
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let config = ConfigBuilder::new()
//!     .with_cli_args(["--server.port=9000"])
//!     .with_defaults([("server.port", "8080"), ("server.tags", "a, b")])?
//!     .build::<AppConfig>()?;
//!
//! assert_eq!(*config.server.port.get()?, 9000);
//! assert_eq!(config.server.host.get()?, "127.0.0.1");
//! assert_eq!(config.server.tags.get()?, &vec!["a".to_string(), "b".to_string()]);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, Field, FieldDecl, FieldKind, FieldKindExt, KeyPath, KindMapper, RawValue,
        Result,
    };
    pub use crate::ports::{ConfigParser, ConfigSource};
    pub use crate::service::{ChainedSource, Config, ConfigBuilder, ConfigGroup, Scope};

    pub use crate::adapters::DictAdapter;

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineAdapter;
    #[cfg(feature = "dotenv")]
    pub use crate::adapters::DotEnvAdapter;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;
    #[cfg(feature = "ini")]
    pub use crate::adapters::IniFileAdapter;
    #[cfg(feature = "json")]
    pub use crate::adapters::JsonFileAdapter;
    #[cfg(feature = "toml")]
    pub use crate::adapters::TomlFileAdapter;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlFileAdapter;
}
