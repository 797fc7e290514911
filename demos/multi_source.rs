// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-source configuration example.
//!
//! This example demonstrates:
//! - Using multiple configuration sources (CLI args, environment variables, YAML)
//! - How the order sources are added in decides precedence
//! - Storage-level defaults placed below every other source
//! - Using the builder pattern to compose configuration sources
//!
//! To run this example:
//! ```bash
//! # Set some environment variables (these override YAML)
//! export MULTI_APP_NAME="EnvApp"
//! export MULTI_DATABASE_HOST="db.example.com"
//!
//! # Run with CLI args (these override both YAML and env vars)
//! cargo run --example multi_source --features yaml,env,cli -- \
//!   --app.name=CliApp --app.port=9000
//! ```

use layercfg::domain::kinds::{Bool, Int, Str};
use layercfg::prelude::*;

struct App {
    name: Field<Str>,
    version: Field<Str>,
    port: Field<Int<u16>>,
}

impl ConfigGroup for App {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            name: scope.field("name", Str::new())?,
            version: scope.field("version", Str::new())?,
            port: scope.field("port", Int::new())?,
        })
    }
}

struct Database {
    host: Field<Str>,
    port: Field<Int<u16>>,
    username: Field<Str>,
}

impl ConfigGroup for Database {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            host: scope.field("host", Str::new())?,
            port: scope.field("port", Int::new())?,
            username: scope.field("username", Str::new())?,
        })
    }
}

struct Features {
    analytics: Field<Bool>,
    debug_mode: Field<Bool>,
}

impl ConfigGroup for Features {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            analytics: scope.field("analytics", Bool::new())?,
            debug_mode: scope.field("debug_mode", Bool::new())?,
        })
    }
}

struct MultiConfig {
    app: App,
    database: Database,
    features: Features,
}

impl ConfigGroup for MultiConfig {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            app: scope.group("app")?,
            database: scope.group("database")?,
            features: scope.group("features")?,
        })
    }
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    println!("=== layercfg: Multi-Source Example ===\n");

    // Create a temporary YAML config file for demonstration
    let yaml_content = r#"
app:
  name: "YamlApp"
  version: "1.0.0"
  port: 8080

database:
  host: "localhost"
  port: 5432

features:
  analytics: true
"#;

    let temp_file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    std::fs::write(temp_file.path(), yaml_content)?;

    println!("Created temporary YAML config file at: {:?}\n", temp_file.path());

    // Precedence follows the order sources are added (first wins):
    //   1. CLI arguments
    //   2. Environment variables under MULTI_
    //   3. YAML file
    //   4. Built-in defaults
    println!("Building configuration with four sources, highest first:");
    println!("  1. CLI arguments");
    println!("  2. Environment variables (MULTI_ prefix)");
    println!("  3. YAML file");
    println!("  4. Built-in defaults\n");

    let config = ConfigBuilder::new()
        .with_cli_args(std::env::args().skip(1))
        .with_env_prefix("MULTI")
        .with_yaml_file(temp_file.path(), false)?
        .with_defaults([
            ("database.username", "admin"),
            ("features.debug_mode", "false"),
        ])?
        .build::<MultiConfig>()?;

    println!("=== Configuration Values ===\n");
    println!("app.name:            {}", config.app.name.get()?);
    println!("app.version:         {}", config.app.version.get()?);
    println!("app.port:            {}", config.app.port.get()?);
    println!("database.host:       {}", config.database.host.get()?);
    println!("database.port:       {}", config.database.port.get()?);
    println!("database.username:   {}", config.database.username.get()?);
    println!("features.analytics:  {}", config.features.analytics.get()?);
    println!("features.debug_mode: {}", config.features.debug_mode.get()?);

    println!("\n=== Precedence Summary ===");
    println!("When the same key exists in multiple sources:");
    println!("  • The source added first answers for the whole key");
    println!("  • Values are never merged across sources");
    println!("  • Field defaults apply only when no source has the key");

    println!("\n=== Try It Yourself ===");
    println!("  1. Set env var:      export MULTI_APP_NAME='MyEnvApp'");
    println!("  2. Override via CLI: cargo run --example multi_source -- --app.name=MyCliApp");
    println!("  3. CLI value will be used (highest precedence)");

    Ok(())
}
