//! REST API handlers for ledger operations

use crate::core::{Block, BlockchainError, NewTransaction, Transaction};
use crate::mining::MiningError;
use crate::network::{ChainSnapshot, Node, NodeError, PeerError};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub node: Arc<Node>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub node_id: String,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
    pub time_ms: u128,
    pub attempts: u64,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_chain: Option<Vec<Block>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<Vec<Block>>,
}

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

fn api_error(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            error: error.into(),
        }),
    )
}

impl From<NodeError> for ApiError {
    fn from(e: NodeError) -> Self {
        ApiError {
            error: e.to_string(),
        }
    }
}

/// Map a node error to its HTTP status
fn node_error(e: NodeError) -> (StatusCode, Json<ApiError>) {
    let status = match &e {
        NodeError::Chain(BlockchainError::MissingFields(_)) => StatusCode::BAD_REQUEST,
        NodeError::Chain(BlockchainError::EmptyChain) => StatusCode::INTERNAL_SERVER_ERROR,
        NodeError::Peer(PeerError::InvalidAddress(_)) => StatusCode::BAD_REQUEST,
        NodeError::Peer(_) => StatusCode::BAD_GATEWAY,
        NodeError::Mining(MiningError::SearchCancelled) => StatusCode::SERVICE_UNAVAILABLE,
        NodeError::Mining(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        log::error!("Request failed: {}", e);
    }

    (status, Json(ApiError::from(e)))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Option<Vec<String>>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check
pub async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        node_id: state.node.node_id().to_string(),
    })
}

/// GET /mine - Mine a new block
pub async fn mine(State(state): State<ApiState>) -> ApiResult<Json<MineResponse>> {
    let (block, stats) = state.node.mine().await.map_err(node_error)?;

    Ok(Json(MineResponse {
        message: "New Block Forged",
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
        time_ms: stats.time_ms,
        attempts: stats.hash_attempts,
    }))
}

/// POST /transactions/new - Queue a transaction for the next block
///
/// A missing field is a 400. `amount` is a non-negative integer: negative
/// or fractional amounts fail JSON extraction and get axum's 422.
pub async fn new_transaction(
    State(state): State<ApiState>,
    Json(submission): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let index = state
        .node
        .submit_transaction(submission)
        .await
        .map_err(node_error)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Transaction will be added to Block {}", index),
        }),
    ))
}

/// GET /chain - Full chain and its length
pub async fn full_chain(State(state): State<ApiState>) -> Json<ChainSnapshot> {
    Json(state.node.get_chain().await)
}

/// POST /nodes/register - Register peer nodes
pub async fn register_nodes(
    State(state): State<ApiState>,
    Json(req): Json<RegisterNodesRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let nodes = req.nodes.ok_or_else(|| {
        api_error(
            StatusCode::BAD_REQUEST,
            "Please supply a valid list of nodes",
        )
    })?;

    let total_nodes = state
        .node
        .register_peers(&nodes)
        .await
        .map_err(node_error)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "New nodes have been added",
            total_nodes,
        }),
    ))
}

/// GET /nodes/resolve - Run consensus against all registered peers
pub async fn consensus(State(state): State<ApiState>) -> Json<ResolveResponse> {
    let replaced = state.node.resolve().await;
    let chain = state.node.get_chain().await.chain;

    if replaced {
        Json(ResolveResponse {
            message: "Our chain was replaced",
            new_chain: Some(chain),
            chain: None,
        })
    } else {
        Json(ResolveResponse {
            message: "Our chain is authoritative",
            new_chain: None,
            chain: Some(chain),
        })
    }
}
