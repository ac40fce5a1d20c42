//! HTTP request handlers.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use privacy_pay_circuits::field::{fr_from_str, fr_to_dec_string};
use privacy_pay_circuits::{commitment, CommitmentTree, TreeError, TreeSnapshot};
use privacy_pay_ledger::{SpendDecision, TransactionClass, TransactionStatus};
use privacy_pay_prover::{
    encode_public_signals, serialize_proof, ProofMode, ProverError, SpendInputs,
};

use crate::AppState;

/// Current unix time in seconds.
pub fn now_ts() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Error response; `retryable` distinguishes transient backend failures
/// from conditions under which the payment cannot proceed.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub retryable: bool,
}

fn error_response(
    status: StatusCode,
    retryable: bool,
    error: impl ToString,
) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            retryable,
        }),
    )
        .into_response()
}

fn bad_request(error: impl ToString) -> axum::response::Response {
    error_response(StatusCode::BAD_REQUEST, false, error)
}

fn tree_error_response(err: TreeError) -> axum::response::Response {
    match &err {
        TreeError::LeafNotFound(_) => error_response(StatusCode::NOT_FOUND, false, err),
        TreeError::CapacityExhausted { .. } => error_response(StatusCode::CONFLICT, false, err),
        _ => bad_request(err),
    }
}

fn prover_error_response(err: ProverError) -> axum::response::Response {
    match &err {
        // Backend failures are transient from the caller's perspective;
        // derivation is deterministic, so retrying the same request is safe.
        ProverError::ProofGeneration(_) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, true, err)
        }
        ProverError::RootMismatch => error_response(StatusCode::CONFLICT, false, err),
        _ => bad_request(err),
    }
}

// ============ Secrets and commitments ============

#[derive(Serialize)]
pub struct GenerateSecretResponse {
    pub secret: String,
}

pub async fn generate_secret() -> Json<GenerateSecretResponse> {
    Json(GenerateSecretResponse {
        secret: fr_to_dec_string(&commitment::generate_secret()),
    })
}

#[derive(Deserialize)]
pub struct DeriveCommitmentRequest {
    pub secret: String,
    pub amount: u64,
}

#[derive(Serialize)]
pub struct DeriveCommitmentResponse {
    pub commitment: String,
    pub nullifier: String,
}

pub async fn derive_commitment(
    Json(req): Json<DeriveCommitmentRequest>,
) -> impl IntoResponse {
    let secret = match fr_from_str(&req.secret) {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };

    let note = commitment::Note::new(secret, req.amount);
    (
        StatusCode::OK,
        Json(DeriveCommitmentResponse {
            commitment: fr_to_dec_string(&note.commitment),
            nullifier: fr_to_dec_string(&note.nullifier),
        }),
    )
        .into_response()
}

// ============ Commitment tree ============

#[derive(Deserialize)]
pub struct AddLeafRequest {
    pub commitment: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLeafResponse {
    pub index: u64,
    pub root: String,
    pub leaf_count: u64,
}

pub async fn add_leaf(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(req): Json<AddLeafRequest>,
) -> impl IntoResponse {
    let leaf = match fr_from_str(&req.commitment) {
        Ok(l) => l,
        Err(e) => return bad_request(e),
    };

    let mut state = state.write().await;
    match state.tree.add_leaf(leaf) {
        Ok(index) => (
            StatusCode::OK,
            Json(AddLeafResponse {
                index,
                root: fr_to_dec_string(&state.tree.root()),
                leaf_count: state.tree.leaf_count(),
            }),
        )
            .into_response(),
        Err(e) => tree_error_response(e),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRootResponse {
    pub root: String,
    pub depth: usize,
    pub leaf_count: u64,
    pub capacity: u64,
}

pub async fn tree_root(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;
    Json(TreeRootResponse {
        root: fr_to_dec_string(&state.tree.root()),
        depth: state.tree.depth(),
        leaf_count: state.tree.leaf_count(),
        capacity: state.tree.capacity(),
    })
}

#[derive(Deserialize)]
pub struct TreeProofRequest {
    pub index: u64,
}

#[derive(Serialize)]
pub struct TreeProofResponse {
    pub leaf: String,
    pub path: Vec<String>,
    /// 0 = left child, 1 = right child at each level.
    pub indices: Vec<u8>,
    pub root: String,
}

pub async fn tree_proof(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(req): Json<TreeProofRequest>,
) -> impl IntoResponse {
    let state = state.read().await;
    match state.tree.proof(req.index) {
        Ok(proof) => (
            StatusCode::OK,
            Json(TreeProofResponse {
                leaf: fr_to_dec_string(&proof.leaf),
                path: proof.path.iter().map(fr_to_dec_string).collect(),
                indices: proof.indices.iter().map(|&b| b as u8).collect(),
                root: fr_to_dec_string(&proof.root),
            }),
        )
            .into_response(),
        Err(e) => tree_error_response(e),
    }
}

pub async fn tree_export(State(state): State<Arc<RwLock<AppState>>>) -> Json<TreeSnapshot> {
    let state = state.read().await;
    Json(state.tree.export_state())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeImportResponse {
    pub root: String,
    pub leaf_count: u64,
}

pub async fn tree_import(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(snapshot): Json<TreeSnapshot>,
) -> impl IntoResponse {
    match CommitmentTree::import_state(&snapshot) {
        Ok(tree) => {
            let mut state = state.write().await;
            let response = TreeImportResponse {
                root: fr_to_dec_string(&tree.root()),
                leaf_count: tree.leaf_count(),
            };
            state.tree = tree;
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => tree_error_response(e),
    }
}

// ============ Spend proofs ============

fn default_mode() -> ProofMode {
    ProofMode::Mock
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProveSpendRequest {
    pub secret: String,
    pub amount: u64,
    pub balance: u64,
    pub leaf_index: u64,
    pub recipient: String,
    #[serde(default = "default_mode")]
    pub mode: ProofMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProveSpendResponse {
    pub proof: serde_json::Value,
    pub public_signals: Vec<String>,
    pub nullifier: String,
    pub commitment: String,
    pub mode: ProofMode,
    /// 256 serialized proof bytes, hex-encoded.
    pub proof_bytes: String,
    /// 32-byte public-signal words, hex-encoded.
    pub signal_words: Vec<String>,
}

pub async fn prove_spend(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(req): Json<ProveSpendRequest>,
) -> impl IntoResponse {
    let secret = match fr_from_str(&req.secret) {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };

    let state = state.read().await;

    // Capture an immutable proof snapshot; the tree may advance while the
    // proof is generated and submission re-checks the root.
    let merkle_proof = match state.tree.proof(req.leaf_index) {
        Ok(p) => p,
        Err(e) => return tree_error_response(e),
    };

    let inputs = SpendInputs {
        secret,
        amount: req.amount,
        balance: req.balance,
        merkle_root: merkle_proof.root,
        merkle_proof,
        recipient: req.recipient,
    };

    let proof = match state.coordinator.generate_spend_proof(&inputs, req.mode) {
        Ok(p) => p,
        Err(e) => return prover_error_response(e),
    };

    let proof_bytes = match serialize_proof(&proof.points) {
        Ok(b) => b,
        Err(e) => return prover_error_response(e),
    };
    let signal_words = match encode_public_signals(&proof.public_signals) {
        Ok(w) => w,
        Err(e) => return prover_error_response(e),
    };

    (
        StatusCode::OK,
        Json(ProveSpendResponse {
            proof: proof.points.to_json(),
            public_signals: proof.public_signals,
            nullifier: proof.nullifier,
            commitment: proof.commitment,
            mode: proof.mode,
            proof_bytes: hex::encode(proof_bytes),
            signal_words: signal_words.iter().map(hex::encode).collect(),
        }),
    )
        .into_response()
}

// ============ Transaction ledger ============

#[derive(Deserialize)]
pub struct LedgerRecordRequest {
    pub signature: String,
    pub amount: u64,
    pub recipient: String,
    pub class: TransactionClass,
    pub status: TransactionStatus,
}

#[derive(Serialize)]
pub struct LedgerRecordResponse {
    pub id: String,
}

pub async fn ledger_record(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(req): Json<LedgerRecordRequest>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    let id = state.ledger.record_transaction(
        req.signature,
        req.amount,
        req.recipient,
        req.class,
        req.status,
        None,
        now_ts(),
    );
    (StatusCode::OK, Json(LedgerRecordResponse { id }))
}

pub async fn ledger_limits(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let mut state = state.write().await;
    let limits = state.ledger.daily_limits(now_ts()).clone();
    (StatusCode::OK, Json(limits))
}

#[derive(Deserialize)]
pub struct CanSpendRequest {
    pub amount: u64,
}

pub async fn ledger_can_spend(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(req): Json<CanSpendRequest>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    let decision: SpendDecision = state.ledger.can_spend(req.amount, now_ts());
    (StatusCode::OK, Json(decision))
}
