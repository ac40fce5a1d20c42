//! Commitment and nullifier derivation.
//!
//! A commitment binds a spending secret to a payment amount; the nullifier
//! is published at spend time and makes the commitment one-time-use. Both
//! are pure functions of their inputs.

use ark_bn254::Fr;
use ark_ff::UniformRand;

use crate::poseidon::poseidon_hash_two;

/// `commitment = H(secret, amount)`.
///
/// The amount is lifted from `u64` into the field here; this is the only
/// place an amount enters the hash domain.
pub fn derive_commitment(secret: Fr, amount: u64) -> Fr {
    poseidon_hash_two(secret, Fr::from(amount))
}

/// `nullifier = H(commitment, secret)`.
pub fn derive_nullifier(commitment: Fr, secret: Fr) -> Fr {
    poseidon_hash_two(commitment, secret)
}

/// Draw a fresh spending secret, uniform over the scalar field.
///
/// Secrets are created per payment, held in memory for the duration of
/// proof generation, and never persisted.
pub fn generate_secret() -> Fr {
    let mut rng = ark_std::rand::thread_rng();
    Fr::rand(&mut rng)
}

/// A note ties a secret and amount to their derived commitment pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub secret: Fr,
    pub amount: u64,
    pub commitment: Fr,
    pub nullifier: Fr,
}

impl Note {
    pub fn new(secret: Fr, amount: u64) -> Self {
        let commitment = derive_commitment(secret, amount);
        let nullifier = derive_nullifier(commitment, secret);
        Self {
            secret,
            amount,
            commitment,
            nullifier,
        }
    }

    /// A note with a freshly drawn secret.
    pub fn random(amount: u64) -> Self {
        Self::new(generate_secret(), amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_derivation_deterministic() {
        let secret = Fr::from(77777u64);
        let amount = 1_000_000_000u64;

        let c1 = derive_commitment(secret, amount);
        let c2 = derive_commitment(secret, amount);
        assert_eq!(c1, c2);

        let n1 = derive_nullifier(c1, secret);
        let n2 = derive_nullifier(c2, secret);
        assert_eq!(n1, n2);
    }

    #[test]
    fn test_different_secrets_different_nullifiers() {
        let amount = 500u64;
        let n1 = Note::new(Fr::from(1u64), amount);
        let n2 = Note::new(Fr::from(2u64), amount);
        assert_ne!(n1.nullifier, n2.nullifier);
        assert_ne!(n1.commitment, n2.commitment);
    }

    #[test]
    fn test_different_amounts_different_nullifiers() {
        let secret = Fr::from(42u64);
        let n1 = Note::new(secret, 100);
        let n2 = Note::new(secret, 101);
        assert_ne!(n1.nullifier, n2.nullifier);
    }

    #[test]
    fn test_nullifier_uniqueness_statistical() {
        // 10,000 random secrets must produce 10,000 distinct nullifiers.
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashSet::new();

        for _ in 0..10_000 {
            let secret = Fr::rand(&mut rng);
            let note = Note::new(secret, 1_000u64);
            assert!(seen.insert(note.nullifier), "nullifier collision");
        }
    }

    #[test]
    fn test_generated_secrets_distinct() {
        let a = generate_secret();
        let b = generate_secret();
        assert_ne!(a, b);
    }
}
