// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazy resolution example.
//!
//! This example demonstrates:
//! - Building a tree without validating it (`fail_fast(false)`)
//! - Fields resolving independently on first access
//! - Validating the whole tree later with `check()`
//!
//! To run this example:
//! ```bash
//! cargo run --example lazy_check
//! ```

use layercfg::domain::kinds::{Choice, Int, PathField, Str};
use layercfg::prelude::*;

struct Worker {
    threads: Field<Int<u8>>,
    mode: Field<Choice<String>>,
    spool: Field<PathField>,
}

impl ConfigGroup for Worker {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        let modes = ["batch", "stream"].map(String::from);
        Ok(Self {
            threads: scope.field("threads", Int::new())?,
            mode: scope.field("mode", Choice::new(modes))?,
            spool: scope.field("spool", PathField::folder())?,
        })
    }
}

struct LazyConfig {
    name: Field<Str>,
    worker: Worker,
}

impl ConfigGroup for LazyConfig {
    fn build(scope: &mut Scope<'_>) -> Result<Self> {
        Ok(Self {
            name: scope.field("name", Str::new())?,
            worker: scope.group("worker")?,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== layercfg: Lazy Resolution ===\n");

    let spool = std::env::temp_dir().to_string_lossy().into_owned();
    let config = ConfigBuilder::new()
        .with_defaults([
            ("name", "lazy-demo"),
            ("worker.threads", "eight"),
            ("worker.mode", "batch"),
            ("worker.spool", spool.as_str()),
        ])?
        .fail_fast(false)
        .build::<LazyConfig>()?;

    println!("Built without validation; {} fields resolved so far.", config.resolved_count());

    // Each field resolves on its own; a broken sibling does not matter here.
    println!("name:          {}", config.name.get()?);
    println!("worker.mode:   {}", config.worker.mode.get()?);
    println!("worker.spool:  {}", config.worker.spool.get()?.display());

    match config.worker.threads.get() {
        Ok(threads) => println!("worker.threads: {}", threads),
        Err(e) => println!("worker.threads: {}", e),
    }

    println!("\n--- check() ---");
    match config.check() {
        Ok(()) => println!("Every field is valid"),
        Err(e) => println!("First invalid field: {}", e),
    }
    println!("{} fields resolved, checked: {}", config.resolved_count(), config.is_checked());

    Ok(())
}
