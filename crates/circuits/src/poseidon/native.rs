//! Native Poseidon hash functions (outside circuits).

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonSponge;
use ark_crypto_primitives::sponge::CryptographicSponge;

use super::config::poseidon_config;

/// Hash two field elements. This is the node-combining and commitment hash
/// used everywhere in the tree and the deriver.
pub fn poseidon_hash_two(a: Fr, b: Fr) -> Fr {
    let mut sponge = PoseidonSponge::new(poseidon_config());
    sponge.absorb(&a);
    sponge.absorb(&b);
    sponge.squeeze_field_elements(1)[0]
}

/// Hash an arbitrary number of field elements.
pub fn poseidon_hash_many(inputs: &[Fr]) -> Fr {
    let mut sponge = PoseidonSponge::new(poseidon_config());
    for input in inputs {
        sponge.absorb(input);
    }
    sponge.squeeze_field_elements(1)[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Zero;

    #[test]
    fn test_hash_deterministic() {
        let a = Fr::from(42u64);
        let b = Fr::from(123u64);

        let h1 = poseidon_hash_two(a, b);
        let h2 = poseidon_hash_two(a, b);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_hash_different_inputs() {
        let h1 = poseidon_hash_two(Fr::from(1u64), Fr::from(2u64));
        let h2 = poseidon_hash_two(Fr::from(1u64), Fr::from(3u64));
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_hash_argument_order_matters() {
        let h1 = poseidon_hash_two(Fr::from(1u64), Fr::from(2u64));
        let h2 = poseidon_hash_two(Fr::from(2u64), Fr::from(1u64));
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_hash_zero_inputs_nonzero() {
        let h = poseidon_hash_two(Fr::zero(), Fr::zero());
        assert_ne!(h, Fr::zero());
    }

    #[test]
    fn test_hash_many() {
        let inputs = vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];
        let h = poseidon_hash_many(&inputs);
        assert_ne!(h, Fr::zero());
    }
}
