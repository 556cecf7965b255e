//! Core ledger components
//!
//! This module contains the fundamental building blocks:
//! - Transactions (plain value transfers, reward transactions)
//! - Blocks (canonical serialization and digest)
//! - Blockchain (block store and pending pool)

pub mod block;
pub mod blockchain;
pub mod transaction;

pub use block::{Block, GENESIS_INDEX, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use blockchain::{Blockchain, BlockchainError};
pub use transaction::{NewTransaction, Transaction, REWARD_SENDER};
