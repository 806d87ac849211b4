//! Dexterity dictionary dump tool.
//!
//! A thin wrapper around the dexterity-dictionary library that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Decodes the dictionary
//! 4. Prints header fields, leading blocks and module statistics

mod config;
mod output;

use anyhow::{Context, Result};
use config::DumpConfig;
use dexterity_dictionary::Dictionary;
use std::time::Instant;
use tracing::info;

fn main() -> Result<()> {
    let config = DumpConfig::from_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.log_level.directive())
            }),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let started = Instant::now();
    let dictionary = Dictionary::open(&config.path)
        .with_context(|| format!("Failed to decode {}", config.path.display()))?;
    let elapsed = started.elapsed();
    let summary = dictionary.summary();
    info!(
        blocks = summary.block_table_length,
        modules = summary.total_modules,
        elapsed_ms = elapsed.as_millis(),
        "Dictionary decoded"
    );

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Using file {}", dictionary.path().display());
    println!("Decoded in {} ms", elapsed.as_millis());
    println!();
    println!("{}", output::format_header(&summary));
    println!("{}", output::format_blocks(&dictionary, config.blocks));
    println!("{}", output::format_modules(&summary));

    if config.names {
        for module in dictionary.modules() {
            let name = dictionary
                .module_name(module)
                .with_context(|| format!("Failed to read name of module {}", module.id()))?;
            println!("{:>6}  {name}", module.id());
        }
    }

    Ok(())
}
