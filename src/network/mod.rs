//! Networking module
//!
//! The ledger node, its peer registry and longest-chain consensus.
//!
//! # Features
//! - Peer registration with URL-style address normalisation
//! - Concurrent peer chain fetches with per-peer timeouts
//! - Longest-valid-chain resolution with a single atomic swap

pub mod client;
pub mod consensus;
pub mod node;
pub mod peer;

pub use client::{ChainFetcher, ChainSnapshot, HttpChainFetcher};
pub use consensus::{select_longest, valid_chain, Candidate, ProofAnchor};
pub use node::{generate_node_id, Node, NodeConfig, NodeError};
pub use peer::{parse_address, PeerError, PeerRegistry};
