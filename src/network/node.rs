//! Ledger node
//!
//! The node owns the chain, the pending pool and the peer registry, and
//! exposes the operations served by the HTTP API. There is no global
//! state: callers share a node through an `Arc`.

use crate::core::{Block, Blockchain, BlockchainError, NewTransaction};
use crate::mining::{Miner, MiningError, MiningStats};
use crate::network::client::{ChainFetcher, ChainSnapshot, HttpChainFetcher};
use crate::network::consensus::{select_longest, ProofAnchor};
use crate::network::peer::{PeerError, PeerRegistry};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Node configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Interface the API listens on
    pub host: String,
    /// Port the API listens on
    pub port: u16,
    /// Peers registered at startup
    pub bootstrap_peers: Vec<String>,
    /// Bound on each peer chain fetch during resolution
    pub peer_timeout: Duration,
    /// Bound on a single mining call
    pub mining_timeout: Duration,
    /// Proof anchor used when validating peer chains
    pub proof_anchor: ProofAnchor,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            bootstrap_peers: Vec::new(),
            peer_timeout: Duration::from_secs(10),
            mining_timeout: Duration::from_secs(300),
            proof_anchor: ProofAnchor::default(),
        }
    }
}

/// Node errors
#[derive(Error, Debug)]
pub enum NodeError {
    #[error(transparent)]
    Chain(#[from] BlockchainError),
    #[error(transparent)]
    Peer(#[from] PeerError),
    #[error(transparent)]
    Mining(#[from] MiningError),
}

/// Generate a random node identifier (32 hex characters)
pub fn generate_node_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

/// A ledger node
pub struct Node {
    pub config: NodeConfig,
    node_id: String,
    blockchain: RwLock<Blockchain>,
    peers: RwLock<PeerRegistry>,
    fetcher: Arc<dyn ChainFetcher>,
    miner: Miner,
    shutdown: CancellationToken,
}

impl Node {
    /// Create a node that fetches peer chains over HTTP
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let fetcher = HttpChainFetcher::new(config.peer_timeout)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Create a node with a custom peer chain source
    pub fn with_fetcher(
        config: NodeConfig,
        fetcher: Arc<dyn ChainFetcher>,
    ) -> Result<Self, NodeError> {
        let node_id = generate_node_id();

        let mut peers = PeerRegistry::new();
        peers.register_all(config.bootstrap_peers.as_slice())?;

        let miner = Miner::new(&node_id, config.mining_timeout);

        log::info!(
            "Node {} created (proof anchor: {}, {} bootstrap peer(s))",
            node_id,
            config.proof_anchor,
            peers.len()
        );

        Ok(Self {
            config,
            node_id,
            blockchain: RwLock::new(Blockchain::new()),
            peers: RwLock::new(peers),
            fetcher,
            miner,
            shutdown: CancellationToken::new(),
        })
    }

    /// This node's identifier, the recipient of its mining rewards
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Token cancelled when the node shuts down
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Abandon in-flight proof searches and signal shutdown
    pub fn shutdown(&self) {
        log::info!("Node {} shutting down", self.node_id);
        self.shutdown.cancel();
    }

    /// Mine a block: find a proof for the tip, then seal the pending pool
    /// plus a reward transaction for this node
    pub async fn mine(&self) -> Result<(Block, MiningStats), NodeError> {
        Ok(self.miner.mine(&self.blockchain, &self.shutdown).await?)
    }

    /// Queue a transaction; returns the index of the block expected to hold it
    pub async fn submit_transaction(&self, submission: NewTransaction) -> Result<u64, NodeError> {
        let transaction = submission.into_transaction()?;
        let index = self.blockchain.write().await.new_transaction(transaction)?;
        log::debug!("Transaction queued for block {}", index);
        Ok(index)
    }

    /// The full chain and its length
    pub async fn get_chain(&self) -> ChainSnapshot {
        ChainSnapshot::new(self.blockchain.read().await.blocks().to_vec())
    }

    /// Register a peer address
    pub async fn register_peer(&self, address: &str) -> Result<(), NodeError> {
        self.peers.write().await.register(address)?;
        Ok(())
    }

    /// Register several peers at once (all or nothing); returns every known peer
    pub async fn register_peers(&self, addresses: &[String]) -> Result<Vec<String>, NodeError> {
        let mut peers = self.peers.write().await;
        peers.register_all(addresses)?;
        Ok(peers.peers().to_vec())
    }

    /// Known peers in registration order
    pub async fn peers(&self) -> Vec<String> {
        self.peers.read().await.peers().to_vec()
    }

    /// Replace the local chain with the longest valid peer chain, if any
    /// is strictly longer. Returns whether the chain was replaced.
    ///
    /// Peers are fetched concurrently; selection and the swap happen once,
    /// after every fetch finished or timed out.
    pub async fn resolve(&self) -> bool {
        let peers = self.peers().await;
        let local_length = self.blockchain.read().await.len();

        let fetches = peers.iter().map(|peer| async move {
            let fetch = self.fetcher.fetch_chain(peer);
            let result = tokio::time::timeout(self.config.peer_timeout, fetch)
                .await
                .unwrap_or_else(|_| Err(PeerError::Timeout { peer: peer.clone() }));
            (peer.clone(), result)
        });
        let results = join_all(fetches).await;

        let Some(candidate) = select_longest(local_length, results, self.config.proof_anchor)
        else {
            log::info!("Our chain is authoritative ({} blocks)", local_length);
            return false;
        };

        let mut blockchain = self.blockchain.write().await;
        if candidate.chain.len() <= blockchain.len() {
            log::info!(
                "Local chain grew to {} blocks during resolution, keeping it",
                blockchain.len()
            );
            return false;
        }

        log::info!(
            "Replacing chain ({} blocks) with {} blocks from {}",
            blockchain.len(),
            candidate.chain.len(),
            candidate.peer
        );
        match blockchain.replace_chain(candidate.chain) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Rejected chain from {}: {}", candidate.peer, e);
                false
            }
        }
    }
}
