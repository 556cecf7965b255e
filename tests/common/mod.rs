//! Shared fixtures for integration tests
#![allow(dead_code)]

use futures::future::{BoxFuture, FutureExt};
use mini_ledger::core::{Block, Blockchain, Transaction};
use mini_ledger::mining::{proof_of_work, search_proof};
use mini_ledger::network::{
    ChainFetcher, ChainSnapshot, Node, NodeConfig, PeerError, ProofAnchor,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};
use tokio_util::sync::CancellationToken;

/// Build a chain of `length` blocks whose proofs satisfy `anchor`
pub fn forge_chain(length: usize, anchor: ProofAnchor) -> Vec<Block> {
    let token = CancellationToken::new();
    let mut blockchain = Blockchain::new();

    for n in 1..length {
        let last = blockchain.last_block().unwrap().clone();
        let proof = match anchor {
            ProofAnchor::PreviousHash => {
                search_proof(last.proof, &last.previous_hash, &token).unwrap()
            }
            ProofAnchor::Digest => proof_of_work(&last, &token).unwrap(),
        };
        blockchain
            .new_transaction(Transaction::new("forger", format!("r{}", n), 1))
            .unwrap();
        blockchain.new_block(proof, None);
    }

    blockchain.blocks().to_vec()
}

/// Serves fixed chains per peer; unknown peers are unreachable
#[derive(Default)]
pub struct StaticFetcher {
    chains: HashMap<String, ChainSnapshot>,
}

impl StaticFetcher {
    pub fn with_chain(mut self, peer: &str, chain: Vec<Block>) -> Self {
        self.chains.insert(peer.to_string(), ChainSnapshot::new(chain));
        self
    }

    pub fn with_snapshot(mut self, peer: &str, snapshot: ChainSnapshot) -> Self {
        self.chains.insert(peer.to_string(), snapshot);
        self
    }
}

impl ChainFetcher for StaticFetcher {
    fn fetch_chain<'a>(
        &'a self,
        peer: &'a str,
    ) -> BoxFuture<'a, Result<ChainSnapshot, PeerError>> {
        let result = self
            .chains
            .get(peer)
            .cloned()
            .ok_or_else(|| PeerError::Unreachable {
                peer: peer.to_string(),
                reason: "connection refused".to_string(),
            });
        async move { result }.boxed()
    }
}

/// In-process network: peers are other nodes reached by name
#[derive(Default)]
pub struct Cluster {
    nodes: RwLock<HashMap<String, Weak<Node>>>,
}

impl Cluster {
    /// Start a node reachable at `name`
    pub fn spawn(self: &Arc<Self>, name: &str, anchor: ProofAnchor) -> Arc<Node> {
        let config = NodeConfig {
            proof_anchor: anchor,
            ..Default::default()
        };
        let node = Arc::new(Node::with_fetcher(config, self.clone()).unwrap());
        self.nodes
            .write()
            .unwrap()
            .insert(name.to_string(), Arc::downgrade(&node));
        node
    }
}

impl ChainFetcher for Cluster {
    fn fetch_chain<'a>(
        &'a self,
        peer: &'a str,
    ) -> BoxFuture<'a, Result<ChainSnapshot, PeerError>> {
        let node = self
            .nodes
            .read()
            .unwrap()
            .get(peer)
            .and_then(Weak::upgrade);

        async move {
            match node {
                Some(node) => Ok(node.get_chain().await),
                None => Err(PeerError::Unreachable {
                    peer: peer.to_string(),
                    reason: "no such node".to_string(),
                }),
            }
        }
        .boxed()
    }
}

/// A node that talks only to `fetcher`
pub fn node_with(fetcher: StaticFetcher) -> Arc<Node> {
    Arc::new(Node::with_fetcher(NodeConfig::default(), Arc::new(fetcher)).unwrap())
}
