// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the layercfg crate.
//!
//! This example demonstrates:
//! - Declaring a configuration tree with nested groups
//! - Reading values from prefixed environment variables
//! - Defaults, aliases and nullable fields
//! - Driving the log level from configuration
//!
//! To run this example:
//! ```bash
//! # Set some environment variables
//! export DEMO_NAME="MyApplication"
//! export DEMO_DATABASE_PORT="5432"
//! export DEMO_DEBUG="yes"
//! export DEMO_API_TIMEOUT="30.5"
//! export DEMO_LOG_LEVEL="debug"
//!
//! # Run the example
//! cargo run --example basic_usage --features env
//! ```

use layercfg::domain::kinds::{level_filter, Bool, Float, Int, LogLevel, Str};
use layercfg::domain::Nullable;
use layercfg::prelude::*;

struct Database {
    host: Field<Str>,
    port: Field<Int<u16>>,
    password: Field<Nullable<Str>>,
}

impl ConfigGroup for Database {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            host: scope.field("host", Str::new().with_default("localhost"))?,
            port: scope.field("port", Int::new().with_default(3000u16))?,
            password: scope.field("password", Str::new().nullable().with_default(None::<String>))?,
        })
    }
}

struct Api {
    timeout: Field<Float>,
}

impl ConfigGroup for Api {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            timeout: scope.field("timeout", Float::new().with_default(10.0))?,
        })
    }
}

struct DemoConfig {
    name: Field<Str>,
    debug: Field<Bool>,
    log_level: Field<LogLevel>,
    db: Database,
    api: Api,
}

impl ConfigGroup for DemoConfig {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            name: scope.field("name", Str::new().with_default("DefaultApp"))?,
            debug: scope.field("debug", Bool::new().with_default(false))?,
            log_level: scope.field("log_level", LogLevel::new().with_default(20u8))?,
            db: scope.group_with_alias("db", "database")?,
            api: scope.group("api")?,
        })
    }
}

fn main() -> Result<()> {
    println!("=== layercfg: Basic Usage ===\n");

    // Every field is resolved and validated here; a bad value stops the program
    // before any of it is used.
    let config = ConfigBuilder::new()
        .with_env_prefix("DEMO")
        .build::<DemoConfig>()?;

    // Initialize tracing subscriber at the configured level
    tracing_subscriber::fmt()
        .with_max_level(level_filter(*config.log_level.get()?))
        .init();

    println!("--- Strings ---");
    println!("name (DEMO_NAME): {}", config.name.get()?);

    println!("\n--- Nested group with an alias ---");
    println!("database.host (DEMO_DATABASE_HOST): {}", config.db.host.get()?);
    println!("database.port (DEMO_DATABASE_PORT): {}", config.db.port.get()?);
    match config.db.password.get()? {
        Some(_) => println!("database.password: <set>"),
        None => println!("database.password: <none>"),
    }

    println!("\n--- Booleans and floats ---");
    println!("debug (DEMO_DEBUG): {}", config.debug.get()?);
    println!("api.timeout (DEMO_API_TIMEOUT): {} seconds", config.api.timeout.get()?);

    println!("\n--- Key paths ---");
    for key in config.key_paths() {
        println!("  {}", key);
    }

    tracing::debug!("Debug logging is enabled");
    println!("\n=== Example Complete ===");
    println!("\nTip: Try setting different environment variables and running again!");
    println!("Examples:");
    println!("  export DEMO_NAME='My Cool App'");
    println!("  export DEMO_DATABASE_PORT=not-a-port");

    Ok(())
}
