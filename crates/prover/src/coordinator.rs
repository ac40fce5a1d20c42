//! Spend-proof coordination: input assembly, mock/real proving, and
//! normalization into the on-chain public-signal contract.

use std::sync::Arc;

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};
use tracing::debug;

use privacy_pay_circuits::field::fr_to_dec_string;
use privacy_pay_circuits::{derive_commitment, derive_nullifier, MembershipProof};

use crate::backend::{BackendOutput, ProvingBackend, SpendWitness};
use crate::error::ProverError;
use crate::proof_data::ProofPoints;

/// Which proving path produced a `SpendProof`. Resolved once at call time;
/// both paths return the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofMode {
    /// Structurally valid, cryptographically meaningless proof for
    /// development. Must never be submitted expecting verification.
    Mock,
    /// Proof from the proving backend.
    Real,
}

/// Inputs assembled for one spend-proof attempt.
///
/// The membership proof and root are an immutable snapshot; the tree may
/// advance while proving runs, and a stale snapshot surfaces as a root
/// mismatch at submission time.
#[derive(Debug, Clone)]
pub struct SpendInputs {
    pub secret: Fr,
    pub amount: u64,
    pub balance: u64,
    pub merkle_proof: MembershipProof,
    pub merkle_root: Fr,
    pub recipient: String,
}

/// A normalized spend proof ready for serialization.
#[derive(Debug, Clone)]
pub struct SpendProof {
    pub points: ProofPoints,
    /// Fixed contract ordering: `[nullifier, merkleRoot, amount]`.
    pub public_signals: Vec<String>,
    pub nullifier: String,
    pub commitment: String,
    pub mode: ProofMode,
}

impl SpendProof {
    /// Mock proofs carry no cryptographic weight; downstream consumers
    /// check this before submission.
    pub fn is_mock(&self) -> bool {
        self.mode == ProofMode::Mock
    }
}

/// Insert the Merkle root at index 1 of the circuit's `[nullifier, amount]`
/// output, producing the `[nullifier, merkleRoot, amount]` ordering the
/// consuming program expects.
pub fn splice_merkle_root(
    circuit_signals: &[String],
    merkle_root: &str,
) -> Result<Vec<String>, ProverError> {
    if circuit_signals.len() != 2 {
        return Err(ProverError::MalformedProof(format!(
            "expected 2 circuit signals, got {}",
            circuit_signals.len()
        )));
    }
    Ok(vec![
        circuit_signals[0].clone(),
        merkle_root.to_string(),
        circuit_signals[1].clone(),
    ])
}

/// Orchestrates spend-proof generation against a proving backend.
///
/// Explicitly constructed and owned by the caller; one coordinator per
/// client session, no process-wide state.
pub struct ProofCoordinator {
    backend: Arc<dyn ProvingBackend>,
}

impl ProofCoordinator {
    pub fn new(backend: Arc<dyn ProvingBackend>) -> Self {
        Self { backend }
    }

    /// Generate a spend proof for the given inputs.
    ///
    /// Pre-flight checks reject over-balance amounts and membership proofs
    /// that do not fold to the supplied root before any proving work runs.
    pub fn generate_spend_proof(
        &self,
        inputs: &SpendInputs,
        mode: ProofMode,
    ) -> Result<SpendProof, ProverError> {
        if inputs.amount > inputs.balance {
            return Err(ProverError::InvalidInput(format!(
                "amount {} exceeds balance {}",
                inputs.amount, inputs.balance
            )));
        }
        if !inputs.merkle_proof.verify(inputs.merkle_root) {
            return Err(ProverError::RootMismatch);
        }

        let commitment = derive_commitment(inputs.secret, inputs.amount);
        let nullifier = derive_nullifier(commitment, inputs.secret);

        match mode {
            ProofMode::Mock => {
                debug!(amount = inputs.amount, "fabricating mock spend proof");
                let nullifier = fr_to_dec_string(&nullifier);
                Ok(SpendProof {
                    points: ProofPoints::zeroed(),
                    public_signals: vec![
                        nullifier.clone(),
                        fr_to_dec_string(&inputs.merkle_root),
                        inputs.amount.to_string(),
                    ],
                    nullifier,
                    commitment: fr_to_dec_string(&commitment),
                    mode: ProofMode::Mock,
                })
            }
            ProofMode::Real => {
                let witness = SpendWitness {
                    secret: fr_to_dec_string(&inputs.secret),
                    amount: inputs.amount.to_string(),
                };
                debug!(amount = inputs.amount, "invoking proving backend");
                let output = self.backend.prove(&witness)?;
                self.normalize(output, inputs, commitment)
            }
        }
    }

    /// Validate backend output and align it into the on-chain signal
    /// ordering.
    fn normalize(
        &self,
        output: BackendOutput,
        inputs: &SpendInputs,
        commitment: Fr,
    ) -> Result<SpendProof, ProverError> {
        let points = ProofPoints::from_json(&output.proof)?;
        let public_signals = splice_merkle_root(
            &output.public_signals,
            &fr_to_dec_string(&inputs.merkle_root),
        )?;

        Ok(SpendProof {
            points,
            nullifier: public_signals[0].clone(),
            commitment: fr_to_dec_string(&commitment),
            public_signals,
            mode: ProofMode::Real,
        })
    }
}
