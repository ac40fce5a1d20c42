//! Cryptographic core for private payments.
//!
//! This crate provides:
//! - `poseidon`: the two-input hash shared by the client and the circuit
//! - `commitment`: commitment and nullifier derivation
//! - `smt`: the append-only commitment Merkle tree with membership proofs
//! - `spend`: the Groth16 spend circuit over `(secret, amount)`

pub mod commitment;
pub mod error;
pub mod field;
pub mod poseidon;
pub mod smt;
pub mod spend;

pub use commitment::{derive_commitment, derive_nullifier, generate_secret, Note};
pub use error::{FieldError, TreeError};
pub use poseidon::{poseidon_config, poseidon_hash_many, poseidon_hash_two};
pub use smt::{
    genesis_root, verify_against_root, CommitmentTree, MembershipProof, TreeSnapshot,
    DEFAULT_DEPTH,
};
pub use spend::SpendCircuit;

use ark_bn254::Fr;

/// Common field type for all operations.
pub type ConstraintF = Fr;
