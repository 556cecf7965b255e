//! Proof-of-work puzzle
//!
//! A proof `p` is valid for a predecessor with proof `p'` and anchor hash
//! `h` when `sha256("{p'}{p}{h}")` starts with [`DIFFICULTY`] hex zeros.

use crate::core::{Block, BlockchainError};
use crate::crypto::{has_leading_zeros, sha256_hex};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Number of leading `'0'` hex characters a proof hash must have
pub const DIFFICULTY: usize = 4;

/// Mining errors
#[derive(Error, Debug)]
pub enum MiningError {
    #[error("Proof search cancelled")]
    SearchCancelled,
    #[error("Proof space exhausted without a solution")]
    Exhausted,
    #[error("Mining worker failed: {0}")]
    Worker(String),
    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

/// Check a candidate proof against the previous proof and an anchor hash
pub fn valid_proof(last_proof: u64, proof: u64, last_hash: &str) -> bool {
    let guess = format!("{}{}{}", last_proof, proof, last_hash);
    has_leading_zeros(&sha256_hex(guess.as_bytes()), DIFFICULTY)
}

/// Count up from 0 until a proof satisfies [`valid_proof`].
///
/// The token is polled on every attempt; once cancelled the search stops
/// with [`MiningError::SearchCancelled`].
pub fn search_proof(
    last_proof: u64,
    last_hash: &str,
    cancel: &CancellationToken,
) -> Result<u64, MiningError> {
    search_from(0, last_proof, last_hash, cancel)
}

fn search_from(
    start: u64,
    last_proof: u64,
    last_hash: &str,
    cancel: &CancellationToken,
) -> Result<u64, MiningError> {
    let mut proof = start;

    loop {
        if cancel.is_cancelled() {
            return Err(MiningError::SearchCancelled);
        }
        if valid_proof(last_proof, proof, last_hash) {
            return Ok(proof);
        }
        proof = proof.checked_add(1).ok_or(MiningError::Exhausted)?;
    }
}

/// Find the proof for the block following `last_block`, anchored on its digest
pub fn proof_of_work(last_block: &Block, cancel: &CancellationToken) -> Result<u64, MiningError> {
    search_proof(last_block.proof, &last_block.digest(), cancel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_proof_matches_hash_prefix() {
        let last_hash = "1";
        let proof = search_proof(100, last_hash, &CancellationToken::new()).unwrap();

        let guess = format!("100{}{}", proof, last_hash);
        assert!(sha256_hex(guess.as_bytes()).starts_with("0000"));
        assert!(valid_proof(100, proof, last_hash));
    }

    #[test]
    fn test_search_returns_first_solution() {
        let proof = search_proof(7, "abc", &CancellationToken::new()).unwrap();
        assert!((0..proof).all(|p| !valid_proof(7, p, "abc")));
    }

    #[test]
    fn test_proof_of_work_reverifies() {
        let genesis = Block::genesis();
        let proof = proof_of_work(&genesis, &CancellationToken::new()).unwrap();
        assert!(valid_proof(genesis.proof, proof, &genesis.digest()));
    }

    #[test]
    fn test_cancelled_search() {
        let token = CancellationToken::new();
        token.cancel();

        let result = proof_of_work(&Block::genesis(), &token);
        assert!(matches!(result, Err(MiningError::SearchCancelled)));
    }

    #[test]
    fn test_counter_overflow_is_exhaustion() {
        let hash = ["abc", "def", "ghi"]
            .into_iter()
            .find(|h| !valid_proof(7, u64::MAX, h))
            .unwrap();

        let result = search_from(u64::MAX, 7, hash, &CancellationToken::new());
        assert!(matches!(result, Err(MiningError::Exhausted)));
    }
}
