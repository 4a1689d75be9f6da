//! Autotask Mapper - record tools with company and resource names attached.
//!
//! Runs search/get/create/update tools against the Autotask REST API and
//! annotates the returned records with human-readable company and resource
//! names, resolved through a TTL cache that refreshes each domain on demand.

pub mod cli;
pub mod config;
pub mod enhance;
pub mod error;
pub mod mapping;
pub mod records;
#[cfg(test)]
pub mod test_utils;
pub mod tools;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging; results go to stdout, so logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("autotask_mapper=info".parse()?))
        .init();

    cli::run_command(&args)
}
