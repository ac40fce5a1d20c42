//! Error types for proof generation and serialization.

use thiserror::Error;

use crate::backend::BackendError;

/// Errors surfaced by the coordinator and codec.
#[derive(Error, Debug)]
pub enum ProverError {
    /// Malformed or out-of-range caller input, rejected before any work.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The proving black box failed; the cause is attached. The core does
    /// not retry: derivation is deterministic, so the caller may re-invoke
    /// with identical inputs.
    #[error("proof generation failed: {0}")]
    ProofGeneration(#[from] BackendError),

    /// Backend output missing expected structure, rejected before
    /// serialization.
    #[error("malformed proof from backend: {0}")]
    MalformedProof(String),

    /// Proof points that cannot be laid out in the fixed wire format.
    #[error("invalid proof structure: {0}")]
    InvalidProofStructure(String),

    /// The membership proof does not fold to the supplied root: a stale
    /// snapshot or tampering. Not retried automatically.
    #[error("membership proof does not fold to the supplied merkle root")]
    RootMismatch,
}
