//! Longest-valid-chain consensus
//!
//! Chain validation and the selection of the chain to adopt among the
//! chains reported by peers.

use crate::core::Block;
use crate::mining::valid_proof;
use crate::network::client::ChainSnapshot;
use crate::network::peer::PeerError;
use log::{debug, info, warn};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Which hash of the predecessor a block's proof is checked against
/// during chain validation.
///
/// Mining always anchors the proof on the predecessor's digest. The
/// reference validation rule checks it against the predecessor's own
/// `previous_hash` instead, so mined chains only pass validation under
/// [`ProofAnchor::Digest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProofAnchor {
    /// `valid_proof(prev.proof, block.proof, prev.previous_hash)`
    #[default]
    PreviousHash,
    /// `valid_proof(prev.proof, block.proof, digest(prev))`
    Digest,
}

impl ProofAnchor {
    /// The anchor hash for validating the successor of `previous`
    pub fn anchor_for<'a>(&self, previous: &'a Block) -> Cow<'a, str> {
        match self {
            ProofAnchor::PreviousHash => Cow::Borrowed(previous.previous_hash.as_str()),
            ProofAnchor::Digest => Cow::Owned(previous.digest()),
        }
    }
}

impl fmt::Display for ProofAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofAnchor::PreviousHash => write!(f, "previous-hash"),
            ProofAnchor::Digest => write!(f, "digest"),
        }
    }
}

impl FromStr for ProofAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "previous-hash" => Ok(ProofAnchor::PreviousHash),
            "digest" => Ok(ProofAnchor::Digest),
            other => Err(format!(
                "unknown proof anchor '{}' (expected 'previous-hash' or 'digest')",
                other
            )),
        }
    }
}

/// Validate hash links and proofs from the second block onward.
///
/// Empty and single-block chains are trivially valid. The genesis block
/// itself is not inspected.
pub fn valid_chain(chain: &[Block], anchor: ProofAnchor) -> bool {
    for pair in chain.windows(2) {
        let (previous, block) = (&pair[0], &pair[1]);
        debug!("Checking block {} against block {}", block.index, previous.index);

        if block.previous_hash != previous.digest() {
            debug!("Block {} does not link to its predecessor", block.index);
            return false;
        }

        if !valid_proof(previous.proof, block.proof, &anchor.anchor_for(previous)) {
            debug!("Block {} carries an invalid proof", block.index);
            return false;
        }
    }

    true
}

/// A peer chain chosen for adoption
#[derive(Debug, Clone)]
pub struct Candidate {
    pub peer: String,
    pub chain: Vec<Block>,
}

/// Pick the chain to adopt from peer fetch results.
///
/// Results are scanned in the given (registry) order. A chain is taken
/// when its length is strictly greater than both the local length and the
/// best candidate so far, and it validates. Among equally long valid
/// chains the first scanned wins. Failed fetches and responses whose
/// reported length disagrees with the blocks they carry are skipped.
pub fn select_longest(
    local_length: usize,
    results: Vec<(String, Result<ChainSnapshot, PeerError>)>,
    anchor: ProofAnchor,
) -> Option<Candidate> {
    let mut max_length = local_length;
    let mut best = None;

    for (peer, result) in results {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Skipping peer {}: {}", peer, e);
                continue;
            }
        };

        if snapshot.length != snapshot.chain.len() {
            warn!(
                "Skipping peer {}: reported length {} but sent {} blocks",
                peer,
                snapshot.length,
                snapshot.chain.len()
            );
            continue;
        }

        if snapshot.length <= max_length {
            debug!("Peer {} chain ({} blocks) is not longer", peer, snapshot.length);
            continue;
        }

        if !valid_chain(&snapshot.chain, anchor) {
            warn!("Peer {} sent an invalid chain ({} blocks)", peer, snapshot.length);
            continue;
        }

        info!("Peer {} offers a longer valid chain ({} blocks)", peer, snapshot.length);
        max_length = snapshot.length;
        best = Some(Candidate {
            peer,
            chain: snapshot.chain,
        });
    }

    best
}
