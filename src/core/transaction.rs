//! Transaction types for the ledger
//!
//! Transactions are plain value transfers. No ownership proof is attached:
//! anything a client submits enters the pending pool as-is.

use crate::core::blockchain::BlockchainError;
use serde::{Deserialize, Serialize};

/// Sender used for mining rewards ("0" marks newly minted coins)
pub const REWARD_SENDER: &str = "0";

/// A value transfer between two identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Address of the sender
    pub sender: String,
    /// Address of the recipient
    pub recipient: String,
    /// Amount transferred
    pub amount: u64,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// Create the reward transaction paid to a miner
    pub fn reward(recipient: impl Into<String>, amount: u64) -> Self {
        Self::new(REWARD_SENDER, recipient, amount)
    }

    /// Whether this transaction mints coins for a miner
    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER
    }
}

/// A transaction as submitted by a client, before field checks
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTransaction {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<u64>,
}

impl NewTransaction {
    /// Turn the submission into a transaction, rejecting it if any of
    /// `sender`, `recipient` or `amount` is absent
    pub fn into_transaction(self) -> Result<Transaction, BlockchainError> {
        let mut missing = Vec::new();
        if self.sender.is_none() {
            missing.push("sender");
        }
        if self.recipient.is_none() {
            missing.push("recipient");
        }
        if self.amount.is_none() {
            missing.push("amount");
        }

        match (self.sender, self.recipient, self.amount) {
            (Some(sender), Some(recipient), Some(amount)) => {
                Ok(Transaction::new(sender, recipient, amount))
            }
            _ => Err(BlockchainError::MissingFields(missing.join(", "))),
        }
    }
}
