//! Peer chain fetching
//!
//! Consensus only needs "give me the length and blocks of peer X, or fail".
//! [`ChainFetcher`] is that seam; [`HttpChainFetcher`] implements it against
//! the `GET /chain` endpoint of other nodes.

use crate::core::Block;
use crate::network::peer::PeerError;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A full chain together with its reported length (wire form of `GET /chain`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl ChainSnapshot {
    pub fn new(chain: Vec<Block>) -> Self {
        let length = chain.len();
        Self { chain, length }
    }
}

/// Source of peer chains
pub trait ChainFetcher: Send + Sync {
    /// Fetch the chain held by `peer` (a location from the peer registry)
    fn fetch_chain<'a>(
        &'a self,
        peer: &'a str,
    ) -> BoxFuture<'a, Result<ChainSnapshot, PeerError>>;
}

/// Fetches chains over HTTP from `http://{peer}/chain`
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, PeerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PeerError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl ChainFetcher for HttpChainFetcher {
    fn fetch_chain<'a>(
        &'a self,
        peer: &'a str,
    ) -> BoxFuture<'a, Result<ChainSnapshot, PeerError>> {
        async move {
            let url = format!("http://{}/chain", peer);
            log::debug!("Fetching chain from {}", url);

            let response = self.client.get(&url).send().await.map_err(|e| {
                if e.is_timeout() {
                    PeerError::Timeout {
                        peer: peer.to_string(),
                    }
                } else {
                    PeerError::Unreachable {
                        peer: peer.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(PeerError::BadStatus {
                    peer: peer.to_string(),
                    status: status.as_u16(),
                });
            }

            response
                .json::<ChainSnapshot>()
                .await
                .map_err(|e| PeerError::MalformedResponse {
                    peer: peer.to_string(),
                    reason: e.to_string(),
                })
        }
        .boxed()
    }
}
