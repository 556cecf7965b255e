//! Multi-node consensus scenarios

mod common;

use common::{forge_chain, node_with, Cluster, StaticFetcher};
use mini_ledger::core::NewTransaction;
use mini_ledger::network::{ChainSnapshot, NodeError, PeerError, ProofAnchor};
use std::sync::Arc;

#[tokio::test]
async fn longest_valid_peer_chain_wins() {
    let three = forge_chain(3, ProofAnchor::PreviousHash);
    let five = forge_chain(5, ProofAnchor::PreviousHash);
    let node = node_with(
        StaticFetcher::default()
            .with_chain("a:5000", three)
            .with_chain("b:5000", five.clone()),
    );

    node.mine().await.unwrap();
    assert_eq!(node.get_chain().await.length, 2);

    node.register_peer("a:5000").await.unwrap();
    node.register_peer("b:5000").await.unwrap();

    assert!(node.resolve().await);
    assert_eq!(node.get_chain().await.chain, five);

    // Nothing longer remains
    assert!(!node.resolve().await);
    assert_eq!(node.get_chain().await.chain, five);
}

#[tokio::test]
async fn invalid_and_lying_peers_are_ignored() {
    let mut tampered = forge_chain(6, ProofAnchor::PreviousHash);
    tampered[3].transactions.clear();

    let mut lying = ChainSnapshot::new(forge_chain(3, ProofAnchor::PreviousHash));
    lying.length = 10;

    let honest = forge_chain(4, ProofAnchor::PreviousHash);

    let node = node_with(
        StaticFetcher::default()
            .with_chain("tampered:1", tampered)
            .with_snapshot("liar:2", lying)
            .with_chain("honest:3", honest.clone()),
    );
    node.register_peers(&[
        "tampered:1".to_string(),
        "liar:2".to_string(),
        "offline:4".to_string(),
        "honest:3".to_string(),
    ])
    .await
    .unwrap();

    assert!(node.resolve().await);
    assert_eq!(node.get_chain().await.chain, honest);
}

#[tokio::test]
async fn malformed_peer_address_leaves_registry_unchanged() {
    let node = node_with(StaticFetcher::default());
    node.register_peer("192.168.0.5:5000").await.unwrap();

    let result = node.register_peer("").await;

    assert!(matches!(
        result,
        Err(NodeError::Peer(PeerError::InvalidAddress(_)))
    ));
    assert_eq!(node.peers().await, ["192.168.0.5:5000"]);
}

#[tokio::test]
async fn pending_pool_survives_replacement() {
    let node = node_with(
        StaticFetcher::default().with_chain("peer:1", forge_chain(3, ProofAnchor::PreviousHash)),
    );

    let predicted = node
        .submit_transaction(NewTransaction {
            sender: Some("alice".into()),
            recipient: Some("bob".into()),
            amount: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(predicted, 2);

    node.register_peer("peer:1").await.unwrap();
    assert!(node.resolve().await);

    let (block, _) = node.mine().await.unwrap();
    assert_eq!(block.index, 4);
    assert_eq!(block.transactions.len(), 2);
    assert_eq!(block.transactions[0].sender, "alice");
}

#[tokio::test]
async fn mined_chains_converge_under_digest_anchor() {
    let cluster = Arc::new(Cluster::default());
    let alice = cluster.spawn("alice:5000", ProofAnchor::Digest);
    let bob = cluster.spawn("bob:5000", ProofAnchor::Digest);

    alice.register_peer("bob:5000").await.unwrap();
    bob.register_peer("http://alice:5000").await.unwrap();

    alice.mine().await.unwrap();
    alice.mine().await.unwrap();

    assert!(bob.resolve().await);
    assert_eq!(bob.get_chain().await, alice.get_chain().await);

    let (block, _) = bob.mine().await.unwrap();
    assert_eq!(block.index, 4);

    assert!(alice.resolve().await);
    assert!(!bob.resolve().await);
    assert_eq!(alice.get_chain().await, bob.get_chain().await);
    assert_eq!(alice.get_chain().await.length, 4);
}
