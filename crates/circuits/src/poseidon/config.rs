//! Poseidon parameters for the BN254 scalar field.
//!
//! Rate 2 / capacity 1 / 8 full + 57 partial rounds / x^5 S-box, the usual
//! 128-bit-security configuration for two-input hashing.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ff::Field;

/// Full rounds, split evenly between start and end.
const FULL_ROUNDS: usize = 8;

/// Partial rounds.
const PARTIAL_ROUNDS: usize = 57;

/// S-box exponent.
const ALPHA: u64 = 5;

/// Absorbed elements per permutation.
const RATE: usize = 2;

const CAPACITY: usize = 1;
const WIDTH: usize = RATE + CAPACITY;

/// Seed for round-constant grinding. Changing this changes every hash in the
/// system, including all historical roots.
const ROUND_CONSTANT_SEED: u64 = 0x7061795f70726976; // "pay_priv"

static CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();

/// The Poseidon configuration shared by native hashing and the spend
/// circuit. Built once, cached for the process lifetime.
pub fn poseidon_config() -> &'static PoseidonConfig<Fr> {
    CONFIG.get_or_init(build_config)
}

fn build_config() -> PoseidonConfig<Fr> {
    PoseidonConfig::new(
        FULL_ROUNDS,
        PARTIAL_ROUNDS,
        ALPHA,
        mds_matrix(),
        round_constants(),
        RATE,
        CAPACITY,
    )
}

/// Cauchy matrix 1/(x_i + y_j) with disjoint x/y sequences; every entry is
/// invertible so the matrix is MDS.
fn mds_matrix() -> Vec<Vec<Fr>> {
    let mut mds = Vec::with_capacity(WIDTH);
    for i in 0..WIDTH {
        let mut row = Vec::with_capacity(WIDTH);
        for j in 0..WIDTH {
            let sum = Fr::from((i + WIDTH + j + 1) as u64);
            row.push(sum.inverse().expect("cauchy entries are nonzero"));
        }
        mds.push(row);
    }
    mds
}

/// Deterministic round constants ground from the seed with x^2 + 3.
fn round_constants() -> Vec<Vec<Fr>> {
    let total_rounds = FULL_ROUNDS + PARTIAL_ROUNDS;
    let mut state = Fr::from(ROUND_CONSTANT_SEED);

    let mut ark = Vec::with_capacity(total_rounds);
    for _ in 0..total_rounds {
        let mut row = Vec::with_capacity(WIDTH);
        for _ in 0..WIDTH {
            state = state.square() + Fr::from(3u64);
            row.push(state);
        }
        ark.push(row);
    }
    ark
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_shape() {
        let config = poseidon_config();
        assert_eq!(config.full_rounds, FULL_ROUNDS);
        assert_eq!(config.partial_rounds, PARTIAL_ROUNDS);
        assert_eq!(config.rate, RATE);
        assert_eq!(config.capacity, CAPACITY);
        assert_eq!(config.mds.len(), WIDTH);
        assert_eq!(config.ark.len(), FULL_ROUNDS + PARTIAL_ROUNDS);
    }

    #[test]
    fn test_config_deterministic() {
        // The cached config and a freshly built one must agree.
        let cached = poseidon_config();
        let fresh = build_config();
        assert_eq!(cached.ark, fresh.ark);
        assert_eq!(cached.mds, fresh.mds);
    }
}
