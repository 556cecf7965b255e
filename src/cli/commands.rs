//! CLI commands for the ledger
//!
//! Implements the command handlers that do not need a running node.

use crate::network::{valid_chain, ChainSnapshot, ProofAnchor};
use std::fs;
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Load a chain exported from `GET /chain`
pub fn load_chain(input: &Path) -> CliResult<ChainSnapshot> {
    let data = fs::read_to_string(input)?;
    Ok(serde_json::from_str(&data)?)
}

/// Validate an exported chain file. Returns whether it is valid.
pub fn cmd_validate(input: &Path, anchor: ProofAnchor) -> CliResult<bool> {
    println!("🔍 Validating chain from {:?} (proof anchor: {})...", input, anchor);

    let snapshot = load_chain(input)?;

    if snapshot.length != snapshot.chain.len() {
        println!(
            "❌ Reported length {} does not match {} blocks",
            snapshot.length,
            snapshot.chain.len()
        );
        return Ok(false);
    }

    let valid = valid_chain(&snapshot.chain, anchor);
    if valid {
        println!("✅ Chain is valid!");
        println!("   {} blocks verified", snapshot.chain.len());
    } else {
        println!("❌ Chain validation FAILED!");
        println!("   The chain may have been tampered with.");
    }

    Ok(valid)
}
