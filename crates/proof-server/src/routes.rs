//! API route definitions.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::RwLock;

use crate::handlers;
use crate::AppState;

/// Create API routes
pub fn api_routes() -> Router<Arc<RwLock<AppState>>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Secret and commitment derivation
        .route("/api/secret/generate", post(handlers::generate_secret))
        .route("/api/commitment/derive", post(handlers::derive_commitment))
        // Commitment tree
        .route("/api/tree/leaves", post(handlers::add_leaf))
        .route("/api/tree/root", get(handlers::tree_root))
        .route("/api/tree/proof", post(handlers::tree_proof))
        .route("/api/tree/export", get(handlers::tree_export))
        .route("/api/tree/import", post(handlers::tree_import))
        // Spend proofs
        .route("/api/prove/spend", post(handlers::prove_spend))
        // Transaction ledger
        .route("/api/ledger/record", post(handlers::ledger_record))
        .route("/api/ledger/limits", get(handlers::ledger_limits))
        .route("/api/ledger/can-spend", post(handlers::ledger_can_spend))
}
