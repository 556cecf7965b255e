//! Mining engine for the ledger
//!
//! Runs the proof search on tokio's blocking pool so request handlers stay
//! responsive, then seals the block under the chain's write lock.

use crate::core::{Block, Blockchain, Transaction};
use crate::mining::pow::{proof_of_work, MiningError};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Coins minted for the miner of each block
pub const MINING_REWARD: u64 = 1;

/// Mining statistics
#[derive(Debug, Clone)]
pub struct MiningStats {
    /// Number of proofs tried, across restarts
    pub hash_attempts: u64,
    /// Time taken in milliseconds
    pub time_ms: u128,
}

/// Miner for creating new blocks
pub struct Miner {
    /// Miner's address for receiving rewards
    pub address: String,
    /// Upper bound on a single `mine` call
    pub timeout: Duration,
}

impl Miner {
    /// Create a new miner
    pub fn new(address: &str, timeout: Duration) -> Self {
        Self {
            address: address.to_string(),
            timeout,
        }
    }

    /// Find a proof for the current tip and seal the pending pool into a block.
    ///
    /// The search is abandoned when `shutdown` fires, when the timeout
    /// elapses or when the returned future is dropped. Nothing is appended
    /// until a proof is found. If the tip moved while searching (another
    /// block sealed or the chain was replaced) the search restarts against
    /// the new tip.
    pub async fn mine(
        &self,
        blockchain: &RwLock<Blockchain>,
        shutdown: &CancellationToken,
    ) -> Result<(Block, MiningStats), MiningError> {
        let start = Instant::now();
        let deadline = start + self.timeout;
        let mut attempts = 0u64;

        loop {
            let last_block = blockchain.read().await.last_block()?.clone();
            let last_hash = last_block.digest();

            info!("Mining block {}...", last_block.index + 1);

            let token = shutdown.child_token();
            let _cancel_on_drop = token.clone().drop_guard();
            let search = tokio::task::spawn_blocking(move || proof_of_work(&last_block, &token));

            let proof = match tokio::time::timeout_at(deadline, search).await {
                Ok(Ok(result)) => result?,
                Ok(Err(e)) => return Err(MiningError::Worker(e.to_string())),
                Err(_) => {
                    warn!("Proof search timed out after {:?}", self.timeout);
                    return Err(MiningError::SearchCancelled);
                }
            };
            attempts += proof + 1;

            let mut chain = blockchain.write().await;
            if chain.last_block()?.digest() != last_hash {
                debug!("Chain tip moved during proof search, restarting");
                continue;
            }

            chain.new_transaction(Transaction::reward(&self.address, MINING_REWARD))?;
            let block = chain.new_block(proof, Some(last_hash)).clone();
            drop(chain);

            let stats = MiningStats {
                hash_attempts: attempts,
                time_ms: start.elapsed().as_millis(),
            };

            info!(
                "Block {} forged in {}ms (proof {}, {} attempts)",
                block.index, stats.time_ms, block.proof, stats.hash_attempts
            );

            return Ok((block, stats));
        }
    }
}
