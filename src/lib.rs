//! Mini-Ledger: a minimal replicated proof-of-work ledger in Rust
//!
//! Each node keeps an append-only chain of blocks and a pool of pending
//! transactions, mines blocks with a hash-prefix proof of work, and
//! converges with its peers by adopting the longest valid chain.
//!
//! # Example
//!
//! ```rust,no_run
//! use mini_ledger::core::NewTransaction;
//! use mini_ledger::network::{Node, NodeConfig};
//!
//! # async fn run() -> Result<(), mini_ledger::network::NodeError> {
//! let node = Node::new(NodeConfig::default())?;
//!
//! // Queue a transfer; it lands in the next mined block
//! let index = node
//!     .submit_transaction(NewTransaction {
//!         sender: Some("alice".into()),
//!         recipient: Some("bob".into()),
//!         amount: Some(5),
//!     })
//!     .await?;
//! println!("Transaction will be added to block {}", index);
//!
//! // Mine a block
//! let (block, stats) = node.mine().await?;
//! println!("Mined block {} in {}ms", block.index, stats.time_ms);
//!
//! // Converge with peers
//! node.register_peer("192.168.0.5:5000").await?;
//! let replaced = node.resolve().await;
//! println!("Chain replaced: {}", replaced);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod crypto;
pub mod mining;
pub mod network;

// Re-export commonly used types
pub use api::{create_router, ApiState};
pub use core::{Block, Blockchain, NewTransaction, Transaction};
pub use mining::{Miner, DIFFICULTY, MINING_REWARD};
pub use network::{Node, NodeConfig, ProofAnchor};
