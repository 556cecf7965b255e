//! Cryptographic utilities for the ledger
//!
//! SHA-256 hashing shared by block digests and the proof-of-work puzzle.

pub mod hash;

pub use hash::{has_leading_zeros, sha256, sha256_hex};
