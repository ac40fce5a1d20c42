//! Spend-proof orchestration.
//!
//! This crate provides:
//! - `backend`: the boundary to the proving black box
//! - `groth16`: an in-process ark-groth16 backend for the spend circuit
//! - `proof_data`: typed validation of duck-typed backend proof objects
//! - `coordinator`: mock/real proof generation with the fixed
//!   `[nullifier, merkleRoot, amount]` public-signal contract
//! - `codec`: the 256-byte proof layout and 32-byte signal words

pub mod backend;
pub mod codec;
pub mod coordinator;
pub mod error;
pub mod groth16;
pub mod proof_data;

pub use backend::{BackendError, BackendOutput, ProvingBackend, SpendWitness};
pub use codec::{encode_public_signals, serialize_proof, MERKLE_ROOT_SIGNAL, PROOF_SIZE};
pub use coordinator::{
    splice_merkle_root, ProofCoordinator, ProofMode, SpendInputs, SpendProof,
};
pub use error::ProverError;
pub use groth16::Groth16Backend;
pub use proof_data::ProofPoints;
