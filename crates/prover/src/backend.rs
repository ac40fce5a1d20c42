//! Boundary to the proving black box.
//!
//! The witness and output shapes follow the proving library's convention:
//! field elements travel as decimal strings, and the proof object arrives
//! as untyped JSON to be validated downstream at the trust boundary.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Witness input for the spend circuit. The circuit takes only the secret
/// and the amount; this shape is fixed and must not be altered.
#[derive(Debug, Clone, Serialize)]
pub struct SpendWitness {
    pub secret: String,
    pub amount: String,
}

/// Raw prover output: a groth16-shaped proof object and the public signals
/// in circuit order `[nullifier, amount]`.
#[derive(Debug, Clone)]
pub struct BackendOutput {
    pub proof: Value,
    pub public_signals: Vec<String>,
}

/// Failures inside the proving black box, surfaced with their cause.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("witness rejected: {0}")]
    Witness(String),
    #[error("proving artifacts unavailable: {0}")]
    Artifacts(String),
    #[error("trusted setup failed: {0}")]
    Setup(String),
    #[error("proof synthesis failed: {0}")]
    Synthesis(String),
}

/// A proving backend turns a witness into a proof and public signals.
///
/// Proof generation is CPU-bound and potentially multi-second; callers that
/// abandon a call commit no state. Given identical inputs and circuit,
/// derivation is deterministic, so re-invoking after a transient failure is
/// safe.
pub trait ProvingBackend: Send + Sync {
    fn prove(&self, witness: &SpendWitness) -> Result<BackendOutput, BackendError>;
}
