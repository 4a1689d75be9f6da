//! Command-line interface for autotask-mapper.
//!
//! Runs record tools, resolves ids to names and inspects the mapping cache
//! from a terminal.

mod commands;

pub use commands::{Cli, Commands, run_command};
