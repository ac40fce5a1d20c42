//! Spend circuit: knowledge of a secret behind a published nullifier.
//!
//! Public inputs, in order: `[nullifier, amount]`. The constraints enforce
//! `nullifier == H(H(secret, amount), secret)` for a witnessed secret.
//!
//! The circuit does not constrain tree membership or balance; the Merkle
//! root is bound into the public-signal vector after proving, and
//! membership is checked off-chain before submission. See DESIGN.md.

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::commitment::{derive_commitment, derive_nullifier};
use crate::poseidon::poseidon_hash_two_var;

/// Groth16 spend circuit over `(secret, amount)`.
#[derive(Clone)]
pub struct SpendCircuit {
    /// Expected nullifier (public input).
    pub nullifier: Fr,
    /// Payment amount (public input).
    pub amount: Fr,
    /// Spending secret (witness).
    pub secret: Fr,
}

impl SpendCircuit {
    /// Build a satisfiable instance from a secret and amount.
    pub fn new(secret: Fr, amount: u64) -> Self {
        let commitment = derive_commitment(secret, amount);
        let nullifier = derive_nullifier(commitment, secret);
        Self {
            nullifier,
            amount: Fr::from(amount),
            secret,
        }
    }

    /// Dummy instance for key generation; produces the constraint structure
    /// without a satisfying assignment.
    pub fn empty() -> Self {
        Self {
            nullifier: Fr::zero(),
            amount: Fr::zero(),
            secret: Fr::zero(),
        }
    }
}

impl ConstraintSynthesizer<Fr> for SpendCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        // Public input order is a contract with the verifier.
        let nullifier_input = FpVar::new_input(cs.clone(), || Ok(self.nullifier))?;
        let amount_input = FpVar::new_input(cs.clone(), || Ok(self.amount))?;

        let secret = FpVar::new_witness(cs.clone(), || Ok(self.secret))?;

        let commitment = poseidon_hash_two_var(cs.clone(), &secret, &amount_input)?;
        let nullifier = poseidon_hash_two_var(cs, &commitment, &secret)?;

        nullifier.enforce_equal(&nullifier_input)?;
        Ok(())
    }
}
