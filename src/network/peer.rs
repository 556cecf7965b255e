//! Peer registry
//!
//! Tracks the network locations of other ledger nodes. Addresses are
//! normalised to their network location (`host:port`) and kept in
//! registration order, which is also the order consensus scans them in.

use thiserror::Error;
use url::{ParseError, Url};

/// Peer errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeerError {
    #[error("Invalid peer address: {0:?}")]
    InvalidAddress(String),
    #[error("Peer {peer} unreachable: {reason}")]
    Unreachable { peer: String, reason: String },
    #[error("Peer {peer} answered with status {status}")]
    BadStatus { peer: String, status: u16 },
    #[error("Peer {peer} timed out")]
    Timeout { peer: String },
    #[error("Peer {peer} sent a malformed chain: {reason}")]
    MalformedResponse { peer: String, reason: String },
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// Extract the peer location from a URL-like address.
///
/// URLs with an authority yield `host:port`, the port falling back to the
/// scheme default (`http://10.0.0.1:5000/` gives `10.0.0.1:5000`). A
/// schemeless `host:port` or any other token without an authority is kept
/// as-is, minus query and fragment. Fails when nothing remains or the URL
/// is malformed.
pub fn parse_address(address: &str) -> Result<String, PeerError> {
    let trimmed = address.trim();
    let invalid = || PeerError::InvalidAddress(address.to_string());

    let parsed = match Url::parse(trimmed) {
        Err(ParseError::RelativeUrlWithoutBase) if trimmed.starts_with("//") => {
            Url::parse(&format!("http:{}", trimmed)).map_err(|_| invalid())?
        }
        Err(ParseError::RelativeUrlWithoutBase) => return path_token(trimmed).ok_or_else(invalid),
        Err(_) => return Err(invalid()),
        Ok(url) => url,
    };

    match parsed.host_str().filter(|host| !host.is_empty()) {
        Some(host) => Ok(match parsed.port_or_known_default() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }),
        None => path_token(trimmed).ok_or_else(invalid),
    }
}

fn path_token(address: &str) -> Option<String> {
    address
        .split(|c: char| matches!(c, '?' | '#'))
        .next()
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Set of known peers, deduplicated by location, in registration order
#[derive(Debug, Clone, Default)]
pub struct PeerRegistry {
    peers: Vec<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one address. Returns `false` if the peer was already known.
    pub fn register(&mut self, address: &str) -> Result<bool, PeerError> {
        let location = parse_address(address)?;
        Ok(self.insert(location))
    }

    /// Register several addresses. Every address is parsed first, so a
    /// single invalid entry leaves the registry untouched.
    pub fn register_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<usize, PeerError> {
        let locations = addresses
            .iter()
            .map(|a| parse_address(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(locations
            .into_iter()
            .filter(|location| self.insert(location.clone()))
            .count())
    }

    fn insert(&mut self, location: String) -> bool {
        if self.peers.contains(&location) {
            return false;
        }
        log::info!("Registered peer: {}", location);
        self.peers.push(location);
        true
    }

    /// Known peers in registration order
    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    pub fn contains(&self, location: &str) -> bool {
        self.peers.iter().any(|p| p == location)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
