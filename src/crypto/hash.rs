//! Cryptographic hashing utilities for the ledger
//!
//! Provides the SHA-256 helpers used for block digests and the
//! proof-of-work puzzle.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Computes SHA-256 hash and returns it as a lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Checks if a hex digest starts with `zeros` `'0'` characters
pub fn has_leading_zeros(hex_digest: &str, zeros: usize) -> bool {
    hex_digest.len() >= zeros && hex_digest.bytes().take(zeros).all(|b| b == b'0')
}
