//! HTTP API server for spend-proof generation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod handlers;
mod routes;

use privacy_pay_circuits::{CommitmentTree, DEFAULT_DEPTH};
use privacy_pay_ledger::TransactionLedger;
use privacy_pay_prover::{Groth16Backend, ProofCoordinator};

/// Application state shared across handlers. One logical tree and ledger
/// per server instance, mutated only behind the lock.
pub struct AppState {
    pub tree: CommitmentTree,
    pub ledger: TransactionLedger,
    pub coordinator: ProofCoordinator,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load or generate the spend-circuit keys.
    let keys_dir = std::path::Path::new("keys");
    let backend = if keys_dir.exists() {
        tracing::info!(dir = %keys_dir.display(), "loading spend-circuit keys");
        Groth16Backend::load(keys_dir).expect("failed to load circuit keys")
    } else {
        tracing::info!("running trusted setup (this may take a while)");
        let backend = Groth16Backend::setup().expect("failed to run setup");
        backend.save(keys_dir).expect("failed to save circuit keys");
        tracing::info!(dir = %keys_dir.display(), "circuit keys saved");
        backend
    };

    let state = Arc::new(RwLock::new(AppState {
        tree: CommitmentTree::new(DEFAULT_DEPTH).expect("default depth is valid"),
        ledger: TransactionLedger::with_start("local", handlers::now_ts()),
        coordinator: ProofCoordinator::new(Arc::new(backend)),
    }));

    let app = Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3001));
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
