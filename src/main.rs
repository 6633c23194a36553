//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `layered_config` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Printing the resolved value
//!
//! Exit codes: `0` on success (or a missing optional key, which prints
//! nothing), `1` when a `--required` key cannot be resolved or the stores
//! cannot be opened.

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::process;

use layered_config::config::debug_mode;
use layered_config::initialization::init_logger_with;
use layered_config::{Opt, Resolver, ValueType};

async fn resolve(resolver: &Resolver, opt: &Opt) -> Option<String> {
    let key = opt.key.as_str();
    match (opt.value_type, opt.required) {
        (ValueType::String, true) => Some(resolver.must_get_string(key).await),
        (ValueType::Int, true) => Some(resolver.must_get_int64(key).await.to_string()),
        (ValueType::String, false) => resolver.get_string(key).await,
        (ValueType::Int, false) => resolver.get_int64(key).await.map(|v| v.to_string()),
        (ValueType::Bool, _) => resolver.get_bool(key).await.map(|v| v.to_string()),
        (ValueType::Timestamp, _) => resolver.get_timestamp(key).await.map(|v| v.to_rfc3339()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();

    let level = if debug_mode() {
        LevelFilter::Debug
    } else {
        opt.log_level.clone().into()
    };
    init_logger_with(level, opt.log_format.clone()).context("Failed to initialize logger")?;

    let identity = opt.identity();
    let resolver = match Resolver::connect(&opt.config_url, &identity)
        .await
        .with_context(|| format!("Failed to open stores for {:?}", opt.config_url))
    {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("layered_config error: {:#}", e);
            process::exit(1);
        }
    };

    match resolve(&resolver, &opt).await {
        Some(value) => println!("{value}"),
        None if opt.required => {
            eprintln!(
                "layered_config error: required key [{}] could not be resolved",
                opt.key
            );
            process::exit(1);
        }
        None => {}
    }
    Ok(())
}
