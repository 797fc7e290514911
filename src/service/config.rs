// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative configuration trees.
//!
//! A configuration tree is a set of plain Rust structs whose members are
//! [`Field`]s or nested groups. Each struct implements [`ConfigGroup`] and
//! declares its members through a [`Scope`], which binds every field to its
//! effective key path and to the shared source chain. The root of a tree is
//! built by a [`ConfigBuilder`] and handed out as a [`Config`].

use crate::adapters::DictAdapter;
use crate::domain::{
    DynKind, Field, FieldDecl, FieldKind, Inferred, KeyPath, KindMapper, RawValue, Resolve, Result,
};
use crate::ports::ConfigSource;
use crate::service::chained::ChainedSource;
use std::fmt;
use std::ops::Deref;
#[cfg(any(
    feature = "dotenv",
    feature = "yaml",
    feature = "json",
    feature = "toml",
    feature = "ini"
))]
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A group of fields and nested groups.
///
/// `build` declares every member through the scope in declaration order. In
/// fail-fast mode each field is resolved as it is declared, so the first
/// failing field in a depth-first walk of the tree aborts the build.
///
/// # Examples
///
/// ```rust
/// use layercfg::domain::kinds::{Int, Str};
/// use layercfg::prelude::*;
///
/// struct Database {
///     host: Field<Str>,
///     port: Field<Int<u16>>,
/// }
///
/// impl ConfigGroup for Database {
///     fn build(scope: &mut Scope<'_>) -> Result<Self> {
///         Ok(Self {
///             host: scope.field("host", Str::new().with_default("localhost"))?,
///             port: scope.field("port", Int::new())?,
///         })
///     }
/// }
///
/// struct App {
///     db: Database,
/// }
///
/// impl ConfigGroup for App {
///     fn build(scope: &mut Scope<'_>) -> Result<Self> {
///         Ok(Self {
///             db: scope.group_with_alias("db", "database")?,
///         })
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let config = ConfigBuilder::new()
///     .with_defaults([("database.port", "5432")])?
///     .build::<App>()?;
///
/// assert_eq!(config.db.host.get()?, "localhost");
/// assert_eq!(*config.db.port.get()?, 5432);
/// # Ok(())
/// # }
/// ```
pub trait ConfigGroup: Sized {
    /// Declares the group's members and assembles the group.
    fn build(scope: &mut Scope<'_>) -> Result<Self>;
}

/// Declaration context handed to [`ConfigGroup::build`].
///
/// A scope knows the key path prefix of the group being built, the shared
/// source chain and the active [`KindMapper`].
pub struct Scope<'a> {
    source: Arc<dyn ConfigSource>,
    prefix: Option<KeyPath>,
    fail_fast: bool,
    mapper: &'a KindMapper,
    registry: &'a mut Vec<Arc<dyn Resolve>>,
}

impl<'a> Scope<'a> {
    /// Declares a field named `name`.
    ///
    /// The field lives at the scope prefix plus the declaration's alias, or
    /// plus `name` when there is no alias.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKey` if the key segment is empty. In
    /// fail-fast mode, also returns the field's resolution error.
    pub fn field<K: FieldKind>(
        &mut self,
        name: &str,
        decl: impl Into<FieldDecl<K>>,
    ) -> Result<Field<K>> {
        let decl = decl.into();
        let path = KeyPath::compose(self.prefix.as_ref(), decl.segment(name))?;
        let field = Field::bind(name, path, decl, Arc::clone(&self.source));

        if self.fail_fast {
            field.get()?;
        }
        self.registry.push(field.erased());
        Ok(field)
    }

    /// Declares a field by its Rust type, using the active kind mapper.
    pub fn value<T: Inferred>(&mut self, name: &str) -> Result<Field<DynKind<T>>> {
        let kind = self.kind_of::<T>();
        self.field(name, kind)
    }

    /// Returns the kind the active mapper uses for `T`.
    ///
    /// The result is an ordinary kind, so defaults and aliases can be added:
    /// `scope.field("port", scope.kind_of::<u16>().with_default(80u16))`.
    pub fn kind_of<T: Inferred>(&self) -> DynKind<T> {
        self.mapper.kind_for::<T>()
    }

    /// Builds a nested group addressed by `name`.
    pub fn group<G: ConfigGroup>(&mut self, name: &str) -> Result<G> {
        self.nested(name, name)
    }

    /// Builds a nested group addressed by `alias` instead of `name`.
    ///
    /// An empty alias is ignored.
    pub fn group_with_alias<G: ConfigGroup>(&mut self, name: &str, alias: &str) -> Result<G> {
        let segment = if alias.is_empty() { name } else { alias };
        self.nested(name, segment)
    }

    /// Builds `G` at this scope's own prefix.
    ///
    /// This is how a group reuses the fields of another group as if they were
    /// its own: call it first to get the reused fields ahead of the group's own
    /// ones.
    pub fn inherit<G: ConfigGroup>(&mut self) -> Result<G> {
        G::build(self)
    }

    /// Returns the key path prefix of the group being built, or `None` at an
    /// unaliased root.
    pub fn prefix(&self) -> Option<&KeyPath> {
        self.prefix.as_ref()
    }

    /// Returns true if fields are resolved as they are declared.
    pub fn is_fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Returns the shared source chain.
    pub fn source(&self) -> &Arc<dyn ConfigSource> {
        &self.source
    }

    fn nested<G: ConfigGroup>(&mut self, name: &str, segment: &str) -> Result<G> {
        let prefix = KeyPath::compose(self.prefix.as_ref(), segment)?;
        tracing::trace!("Building configuration group '{}' at '{}'", name, prefix);

        let mut child = Scope {
            source: Arc::clone(&self.source),
            prefix: Some(prefix),
            fail_fast: self.fail_fast,
            mapper: self.mapper,
            registry: &mut *self.registry,
        };
        G::build(&mut child)
    }
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("prefix", &self.prefix.as_ref().map(|p| p.to_string()))
            .field("fail_fast", &self.fail_fast)
            .field("fields", &self.registry.len())
            .finish()
    }
}

/// The root of a built configuration tree.
///
/// Dereferences to the root group, so fields are reached as
/// `config.group.field.get()`.
pub struct Config<G> {
    root: G,
    source: Arc<dyn ConfigSource>,
    fields: Vec<Arc<dyn Resolve>>,
    checked: AtomicBool,
}

impl<G: ConfigGroup> Config<G> {
    /// Creates a configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

impl<G> Config<G> {
    /// Resolves every field of the tree, in declaration order.
    ///
    /// Returns the first failure. Fields that resolve are cached, so a later
    /// `check` only retries the ones that failed. Once a check has passed, or
    /// the tree was built in fail-fast mode, this is a no-op.
    pub fn check(&self) -> Result<()> {
        if self.checked.load(Ordering::Acquire) {
            return Ok(());
        }

        for field in &self.fields {
            field.resolve_erased()?;
        }

        self.checked.store(true, Ordering::Release);
        tracing::debug!("Checked {} configuration fields", self.fields.len());
        Ok(())
    }

    /// Returns true once every field is known to be resolved.
    pub fn is_checked(&self) -> bool {
        self.checked.load(Ordering::Acquire)
    }

    /// Returns the source chain the tree reads from.
    pub fn source(&self) -> &Arc<dyn ConfigSource> {
        &self.source
    }

    /// Returns the key path of every field, in declaration order.
    pub fn key_paths(&self) -> Vec<KeyPath> {
        self.fields.iter().map(|f| f.key_path().clone()).collect()
    }

    /// Returns how many fields have a cached value.
    pub fn resolved_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_resolved()).count()
    }

    /// Returns the root group.
    pub fn into_inner(self) -> G {
        self.root
    }
}

impl<G> Deref for Config<G> {
    type Target = G;

    fn deref(&self) -> &G {
        &self.root
    }
}

impl<G> fmt::Debug for Config<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("root", &std::any::type_name::<G>())
            .field("source", &self.source.name())
            .field("fields", &self.fields.len())
            .field("checked", &self.is_checked())
            .finish()
    }
}

/// Builder for a [`Config`].
///
/// Sources are queried in the order they are added: the first source added
/// has the highest precedence.
///
/// # Examples
///
/// ```rust,no_run
/// use layercfg::service::ConfigBuilder;
///
/// # fn main() -> layercfg::domain::Result<()> {
/// let builder = ConfigBuilder::new()
///     .with_cli_args(std::env::args().skip(1))
///     .with_env_prefix("MYAPP")
///     .with_yaml_file("/etc/myapp/config.yaml", true)?
///     .with_defaults([("server.port", "8080")])?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
    fail_fast: bool,
    alias: Option<String>,
    mapper: KindMapper,
}

impl ConfigBuilder {
    /// Creates a builder with no sources, in fail-fast mode.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            fail_fast: true,
            alias: None,
            mapper: KindMapper::new(),
        }
    }

    /// Creates a builder reading environment variables prefixed with the
    /// upper-cased `app_name`, then `config.yaml` from the OS configuration
    /// directory of the application when that file exists.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use layercfg::service::ConfigBuilder;
    ///
    /// # fn main() -> layercfg::domain::Result<()> {
    /// let builder = ConfigBuilder::for_app("myapp", "com.example")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn for_app(app_name: &str, qualifier: &str) -> Result<Self> {
        #[allow(unused_mut)]
        let mut builder = Self::new();

        #[cfg(feature = "env")]
        {
            builder = builder.with_env_prefix(app_name.to_uppercase());
        }

        #[cfg(feature = "yaml")]
        {
            use crate::adapters::YamlFileAdapter;
            let adapter = YamlFileAdapter::from_default_location(app_name, qualifier, true)?;
            builder = builder.with_source(adapter);
        }

        #[cfg(not(feature = "yaml"))]
        let _ = qualifier;
        #[cfg(not(any(feature = "env", feature = "yaml")))]
        let _ = app_name;

        Ok(builder)
    }

    /// Adds a source with lower precedence than the sources already added.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        tracing::debug!("Adding configuration source '{}'", source.name());
        self.sources.push(Box::new(source));
        self
    }

    /// Adds an in-memory tree as a source.
    pub fn with_dict(self, tree: RawValue) -> Self {
        self.with_source(DictAdapter::new(tree))
    }

    /// Adds dotted keys and values as a source named `defaults`.
    ///
    /// Added last, this gives storage-level defaults for every other source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKey` if a key has an empty segment.
    pub fn with_defaults<I, K, V>(self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<RawValue>,
    {
        let adapter = DictAdapter::from_pairs(pairs)?.with_name("defaults");
        Ok(self.with_source(adapter))
    }

    /// Adds every environment variable, matched without a prefix.
    #[cfg(feature = "env")]
    pub fn with_env_vars(self) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(EnvVarAdapter::new())
    }

    /// Adds the environment variables starting with `prefix` and the
    /// delimiter.
    ///
    /// ```rust
    /// use layercfg::service::ConfigBuilder;
    ///
    /// let builder = ConfigBuilder::new().with_env_prefix("MYAPP");
    /// assert_eq!(builder.source_count(), 1);
    /// ```
    #[cfg(feature = "env")]
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(EnvVarAdapter::with_prefix(prefix))
    }

    /// Adds a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SourceUnavailable` if the file is missing and
    /// `missing_ok` is false, and `ConfigError::ParseError` for malformed lines.
    #[cfg(feature = "dotenv")]
    pub fn with_dotenv_file(self, path: impl AsRef<Path>, missing_ok: bool) -> Result<Self> {
        use crate::adapters::DotEnvAdapter;
        let adapter = DotEnvAdapter::from_file(path, missing_ok)?;
        Ok(self.with_source(adapter))
    }

    /// Adds a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SourceUnavailable` if the file is missing and
    /// `missing_ok` is false, and `ConfigError::ParseError` if it is not
    /// valid YAML.
    #[cfg(feature = "yaml")]
    pub fn with_yaml_file(self, path: impl AsRef<Path>, missing_ok: bool) -> Result<Self> {
        use crate::adapters::YamlFileAdapter;
        let adapter = YamlFileAdapter::open(path, missing_ok)?;
        Ok(self.with_source(adapter))
    }

    /// Adds a JSON file. Errors as for [`with_yaml_file`](Self::with_yaml_file).
    #[cfg(feature = "json")]
    pub fn with_json_file(self, path: impl AsRef<Path>, missing_ok: bool) -> Result<Self> {
        use crate::adapters::JsonFileAdapter;
        let adapter = JsonFileAdapter::open(path, missing_ok)?;
        Ok(self.with_source(adapter))
    }

    /// Adds a TOML file. Errors as for [`with_yaml_file`](Self::with_yaml_file).
    #[cfg(feature = "toml")]
    pub fn with_toml_file(self, path: impl AsRef<Path>, missing_ok: bool) -> Result<Self> {
        use crate::adapters::TomlFileAdapter;
        let adapter = TomlFileAdapter::open(path, missing_ok)?;
        Ok(self.with_source(adapter))
    }

    /// Adds an INI file. Errors as for [`with_yaml_file`](Self::with_yaml_file).
    #[cfg(feature = "ini")]
    pub fn with_ini_file(self, path: impl AsRef<Path>, missing_ok: bool) -> Result<Self> {
        use crate::adapters::IniFileAdapter;
        let adapter = IniFileAdapter::open(path, missing_ok)?;
        Ok(self.with_source(adapter))
    }

    /// Adds command-line arguments.
    ///
    /// ```rust
    /// use layercfg::service::ConfigBuilder;
    ///
    /// let builder = ConfigBuilder::new().with_cli_args(["--server.port=9000"]);
    /// assert_eq!(builder.source_count(), 1);
    /// ```
    #[cfg(feature = "cli")]
    pub fn with_cli_args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        use crate::adapters::CommandLineAdapter;
        self.with_source(CommandLineAdapter::from_args(args))
    }

    /// Chooses between eager validation at build time (the default) and
    /// resolution on first access.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Places the whole tree under `alias`, which may be dotted.
    ///
    /// An empty alias is ignored.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.alias = if alias.is_empty() { None } else { Some(alias) };
        self
    }

    /// Sets the kind mapper used by [`Scope::value`] and [`Scope::kind_of`].
    pub fn kind_mapper(mut self, mapper: KindMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Returns the number of sources added so far.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Builds the tree rooted at `G`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidKey` for an invalid alias. In fail-fast
    /// mode, also returns the first field resolution error.
    pub fn build<G: ConfigGroup>(self) -> Result<Config<G>> {
        let prefix = self.alias.as_deref().map(KeyPath::parse).transpose()?;
        let source: Arc<dyn ConfigSource> = Arc::new(ChainedSource::from_sources(self.sources));
        let mut fields = Vec::new();

        let root = {
            let mut scope = Scope {
                source: Arc::clone(&source),
                prefix,
                fail_fast: self.fail_fast,
                mapper: &self.mapper,
                registry: &mut fields,
            };
            G::build(&mut scope)?
        };

        tracing::debug!(
            "Built configuration tree with {} fields (fail_fast: {})",
            fields.len(),
            self.fail_fast
        );

        Ok(Config {
            root,
            source,
            fields,
            checked: AtomicBool::new(self.fail_fast),
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("fail_fast", &self.fail_fast)
            .field("alias", &self.alias)
            .field("mapper", &self.mapper)
            .finish()
    }
}
