//! REST API module
//!
//! Thin HTTP façade over the ledger node.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /mine` - Mine a new block
//! - `POST /transactions/new` - Queue a transaction
//! - `GET /chain` - Full chain and its length
//! - `POST /nodes/register` - Register peer nodes
//! - `GET /nodes/resolve` - Run consensus against registered peers

pub mod handlers;
pub mod routes;

pub use handlers::ApiState;
pub use routes::create_router;
