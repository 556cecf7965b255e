//! Mini-Ledger CLI Application
//!
//! Runs a ledger node with its REST API, or validates an exported chain.

use clap::{Parser, Subcommand};
use mini_ledger::api::{create_router, ApiState};
use mini_ledger::cli;
use mini_ledger::network::{Node, NodeConfig, ProofAnchor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ledger")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A minimal replicated proof-of-work ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a ledger node and its REST API
    Start {
        /// Interface to listen on
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Peers to register at startup (comma-separated)
        #[arg(long)]
        peers: Option<String>,

        /// Timeout for each peer chain fetch, in seconds
        #[arg(long, default_value = "10")]
        peer_timeout_secs: u64,

        /// Upper bound on a single mining request, in seconds
        #[arg(long, default_value = "300")]
        mining_timeout_secs: u64,

        /// Hash a block's proof is checked against when validating peer chains
        #[arg(long, default_value = "previous-hash")]
        proof_anchor: ProofAnchor,
    },

    /// Validate a chain exported from GET /chain
    Validate {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Hash a block's proof is checked against
        #[arg(long, default_value = "previous-hash")]
        proof_anchor: ProofAnchor,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            host,
            port,
            peers,
            peer_timeout_secs,
            mining_timeout_secs,
            proof_anchor,
        } => {
            let bootstrap_peers: Vec<String> = peers
                .map(|p| {
                    p.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            let config = NodeConfig {
                host,
                port,
                bootstrap_peers,
                peer_timeout: Duration::from_secs(peer_timeout_secs),
                mining_timeout: Duration::from_secs(mining_timeout_secs),
                proof_anchor,
            };

            run_node(config)?;
        }

        Commands::Validate {
            input,
            proof_anchor,
        } => {
            if !cli::cmd_validate(&input, proof_anchor)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn run_node(config: NodeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let addr = format!("{}:{}", config.host, config.port);
        let node = Arc::new(Node::new(config)?);
        let shutdown = node.shutdown_token();

        let app = create_router(ApiState { node: node.clone() });

        println!("🚀 Ledger node {} starting on http://{}", node.node_id(), addr);

        let peers = node.peers().await;
        if !peers.is_empty() {
            println!("🌐 Registered peers: {:?}", peers);
        }

        println!();
        println!("📖 Available endpoints:");
        println!("   GET  /health            - Health check");
        println!("   GET  /mine              - Mine a block");
        println!("   POST /transactions/new  - Queue a transaction");
        println!("   GET  /chain             - Full chain");
        println!("   POST /nodes/register    - Register peers");
        println!("   GET  /nodes/resolve     - Run consensus");
        println!();

        // Handle Ctrl+C with graceful shutdown
        let signal_node = node.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                println!("\n📴 Shutting down ledger node...");
                signal_node.shutdown();
            }
        });

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await?;

        log::info!("Node {} stopped", node.node_id());

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
