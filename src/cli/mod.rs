//! Command-line helpers

pub mod commands;

pub use commands::{cmd_validate, load_chain, CliResult};
