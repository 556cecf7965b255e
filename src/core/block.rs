//! Block implementation for the ledger
//!
//! A block seals a batch of transactions together with the proof that
//! links it to its predecessor.

use crate::core::transaction::Transaction;
use crate::crypto::sha256_hex;
use chrono::Utc;
use serde::{Deserialize, Serialize};

// =============================================================================
// Genesis Constants
// =============================================================================

/// Index of the first block in every chain
pub const GENESIS_INDEX: u64 = 1;

/// Sentinel `previous_hash` carried by the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Sentinel proof carried by the genesis block
pub const GENESIS_PROOF: u64 = 100;

/// A sealed block in the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, starting at 1
    pub index: u64,
    /// Creation time in microseconds since the Unix epoch (UTC)
    pub timestamp: i64,
    /// Transactions sealed into this block, in pool order
    pub transactions: Vec<Transaction>,
    /// Proof-of-work solution linking this block to its predecessor
    pub proof: u64,
    /// Digest of the previous block ("1" for genesis)
    pub previous_hash: String,
}

/// Hashing form of a transaction. Field order is lexicographic and must
/// never change: it defines the digest of every block.
#[derive(Serialize)]
struct CanonicalTransaction<'a> {
    amount: u64,
    recipient: &'a str,
    sender: &'a str,
}

/// Hashing form of a block (keys in lexicographic order)
#[derive(Serialize)]
struct CanonicalBlock<'a> {
    index: u64,
    previous_hash: &'a str,
    proof: u64,
    timestamp: i64,
    transactions: Vec<CanonicalTransaction<'a>>,
}

impl Block {
    /// Create a block stamped with the current time
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp_micros(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// Create the genesis block
    pub fn genesis() -> Self {
        Self::new(
            GENESIS_INDEX,
            Vec::new(),
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    /// Whether this block carries the genesis sentinels
    pub fn is_genesis(&self) -> bool {
        self.index == GENESIS_INDEX
            && self.previous_hash == GENESIS_PREVIOUS_HASH
            && self.proof == GENESIS_PROOF
    }

    /// Canonical byte form used for hashing.
    ///
    /// Compact JSON with keys in lexicographic order:
    /// `{"index":N,"previous_hash":"..","proof":N,"timestamp":N,"transactions":[{"amount":N,"recipient":"..","sender":".."}]}`.
    /// Integers are plain decimal, strings are JSON-escaped. This is
    /// independent of the serde transport form of [`Block`].
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let canonical = CanonicalBlock {
            index: self.index,
            previous_hash: &self.previous_hash,
            proof: self.proof,
            timestamp: self.timestamp,
            transactions: self
                .transactions
                .iter()
                .map(|tx| CanonicalTransaction {
                    amount: tx.amount,
                    recipient: &tx.recipient,
                    sender: &tx.sender,
                })
                .collect(),
        };

        serde_json::to_vec(&canonical)
            .expect("canonical block form only holds strings and integers")
    }

    /// SHA-256 digest (lowercase hex) of the canonical form
    pub fn digest(&self) -> String {
        sha256_hex(&self.canonical_bytes())
    }

    /// Get number of transactions in this block
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}
