//! Mining module: the proof-of-work puzzle and the block miner

pub mod miner;
pub mod pow;

pub use miner::{Miner, MiningStats, MINING_REWARD};
pub use pow::{proof_of_work, search_proof, valid_proof, MiningError, DIFFICULTY};
