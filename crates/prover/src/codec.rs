//! Canonical byte encoding for on-chain consumption.
//!
//! The verifier program expects exactly 256 proof bytes and a sequence of
//! 32-byte public-signal words; any deviation makes it reject the
//! transaction, so this layout is byte-exact by construction.

use num_bigint::BigUint;

use crate::error::ProverError;
use crate::proof_data::ProofPoints;

/// Serialized Groth16 proof size: pi_a (64) + pi_b (128) + pi_c (64).
pub const PROOF_SIZE: usize = 256;

/// Size of one public-signal word.
pub const SIGNAL_WORD_SIZE: usize = 32;

/// Index of the Merkle-root signal in `[nullifier, merkleRoot, amount]`.
/// The root keeps full 256-bit precision; every other signal is truncated
/// to its low 64 bits to match the program's `u64` fields.
pub const MERKLE_ROOT_SIGNAL: usize = 1;

/// Serialize proof points into the fixed 256-byte layout.
///
/// Layout, each element 32 bytes big-endian:
/// `pi_a[0] ‖ pi_a[1] ‖ pi_b[0][0] ‖ pi_b[0][1] ‖ pi_b[1][0] ‖ pi_b[1][1] ‖ pi_c[0] ‖ pi_c[1]`
pub fn serialize_proof(points: &ProofPoints) -> Result<[u8; PROOF_SIZE], ProverError> {
    let elements: [(&BigUint, &str); 8] = [
        (&points.pi_a[0], "pi_a[0]"),
        (&points.pi_a[1], "pi_a[1]"),
        (&points.pi_b[0][0], "pi_b[0][0]"),
        (&points.pi_b[0][1], "pi_b[0][1]"),
        (&points.pi_b[1][0], "pi_b[1][0]"),
        (&points.pi_b[1][1], "pi_b[1][1]"),
        (&points.pi_c[0], "pi_c[0]"),
        (&points.pi_c[1], "pi_c[1]"),
    ];

    let mut out = [0u8; PROOF_SIZE];
    let mut offset = 0;
    for (value, label) in elements {
        out[offset..offset + SIGNAL_WORD_SIZE].copy_from_slice(&be_word(value, label)?);
        offset += SIGNAL_WORD_SIZE;
    }

    // Unreachable with the layout above; a mismatch is a programming error,
    // not a recoverable condition.
    assert_eq!(offset, PROOF_SIZE, "proof serialization size mismatch");
    Ok(out)
}

/// Encode one element big-endian into exactly 32 bytes, rejecting values
/// that do not fit instead of wrapping them.
fn be_word(value: &BigUint, label: &str) -> Result<[u8; SIGNAL_WORD_SIZE], ProverError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > SIGNAL_WORD_SIZE {
        return Err(ProverError::InvalidProofStructure(format!(
            "{label} is wider than 256 bits"
        )));
    }
    let mut word = [0u8; SIGNAL_WORD_SIZE];
    word[SIGNAL_WORD_SIZE - bytes.len()..].copy_from_slice(&bytes);
    Ok(word)
}

/// Encode public signals as 32-byte big-endian words.
///
/// Signal index 1 (the Merkle root) keeps its full width. All other signals
/// are truncated to their low 64 bits, written into the last 8 bytes of the
/// word with the high bytes zero — an intentional lossy encoding matching
/// the program's `u64` fields.
pub fn encode_public_signals(signals: &[String]) -> Result<Vec<[u8; SIGNAL_WORD_SIZE]>, ProverError> {
    signals
        .iter()
        .enumerate()
        .map(|(index, signal)| encode_signal_word(index, signal))
        .collect()
}

fn encode_signal_word(
    index: usize,
    signal: &str,
) -> Result<[u8; SIGNAL_WORD_SIZE], ProverError> {
    let value = parse_signal(signal)?;

    if index == MERKLE_ROOT_SIGNAL {
        if value.bits() > 256 {
            return Err(ProverError::InvalidInput(format!(
                "signal[{index}] exceeds 256 bits"
            )));
        }
        return be_word(&value, "merkle root signal");
    }

    let low = value.iter_u64_digits().next().unwrap_or(0);
    let mut word = [0u8; SIGNAL_WORD_SIZE];
    word[SIGNAL_WORD_SIZE - 8..].copy_from_slice(&low.to_be_bytes());
    Ok(word)
}

fn parse_signal(signal: &str) -> Result<BigUint, ProverError> {
    let trimmed = signal.trim();
    if let Some(hex) = trimmed.strip_prefix("0x") {
        BigUint::parse_bytes(hex.as_bytes(), 16)
    } else {
        BigUint::parse_bytes(trimmed.as_bytes(), 10)
    }
    .ok_or_else(|| ProverError::InvalidInput(format!("signal {trimmed:?} is not numeric")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> ProofPoints {
        ProofPoints {
            pi_a: [BigUint::from(0xaabbccddu32), BigUint::from(2u8)],
            pi_b: [
                [BigUint::from(3u8), BigUint::from(4u8)],
                [BigUint::from(5u8), BigUint::from(6u8)],
            ],
            pi_c: [BigUint::from(7u8), BigUint::from(8u8)],
        }
    }

    #[test]
    fn test_proof_is_exactly_256_bytes() {
        let bytes = serialize_proof(&sample_points()).unwrap();
        assert_eq!(bytes.len(), PROOF_SIZE);
    }

    #[test]
    fn test_layout_round_trip() {
        // bytes[0..32] decode back to pi_a[0] unchanged: no byte-order
        // corruption.
        let points = sample_points();
        let bytes = serialize_proof(&points).unwrap();

        assert_eq!(BigUint::from_bytes_be(&bytes[0..32]), points.pi_a[0]);
        assert_eq!(BigUint::from_bytes_be(&bytes[32..64]), points.pi_a[1]);
        // pi_b rows are laid out row-major.
        assert_eq!(BigUint::from_bytes_be(&bytes[64..96]), points.pi_b[0][0]);
        assert_eq!(BigUint::from_bytes_be(&bytes[96..128]), points.pi_b[0][1]);
        assert_eq!(BigUint::from_bytes_be(&bytes[128..160]), points.pi_b[1][0]);
        assert_eq!(BigUint::from_bytes_be(&bytes[160..192]), points.pi_b[1][1]);
        assert_eq!(BigUint::from_bytes_be(&bytes[192..224]), points.pi_c[0]);
        assert_eq!(BigUint::from_bytes_be(&bytes[224..256]), points.pi_c[1]);
    }

    #[test]
    fn test_big_endian_placement() {
        let bytes = serialize_proof(&sample_points()).unwrap();
        assert_eq!(hex::encode(&bytes[28..32]), "aabbccdd");
    }

    #[test]
    fn test_zeroed_points_serialize() {
        let bytes = serialize_proof(&ProofPoints::zeroed()).unwrap();
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_overwide_element_rejected() {
        let mut points = sample_points();
        points.pi_a[0] = BigUint::from(1u8) << 256;
        assert!(matches!(
            serialize_proof(&points),
            Err(ProverError::InvalidProofStructure(_))
        ));
    }

    #[test]
    fn test_signal_words_truncation_rules() {
        // nullifier and amount truncate to low 64 bits; the root keeps full
        // precision.
        let wide: BigUint = (BigUint::from(1u8) << 200) + BigUint::from(0x1122334455667788u64);
        let signals = vec![
            wide.to_string(),
            "999".to_string(),
            "1000000000".to_string(),
        ];

        let words = encode_public_signals(&signals).unwrap();
        assert_eq!(words.len(), 3);

        // Signal 0: only the low 64 bits survive, in the last 8 bytes.
        assert!(words[0][..24].iter().all(|&b| b == 0));
        assert_eq!(
            words[0][24..],
            0x1122334455667788u64.to_be_bytes()
        );

        // Signal 1: full-width big-endian.
        assert_eq!(BigUint::from_bytes_be(&words[1]), BigUint::from(999u32));

        // Signal 2: plain u64 amount.
        assert_eq!(words[2][24..], 1_000_000_000u64.to_be_bytes());
    }

    #[test]
    fn test_full_width_root_preserved() {
        let root: BigUint = (BigUint::from(1u8) << 255) + BigUint::from(7u8);
        let signals = vec!["1".to_string(), root.to_string(), "2".to_string()];
        let words = encode_public_signals(&signals).unwrap();
        assert_eq!(BigUint::from_bytes_be(&words[1]), root);
    }

    #[test]
    fn test_non_numeric_signal_rejected() {
        let signals = vec!["not-a-number".to_string()];
        assert!(matches!(
            encode_public_signals(&signals),
            Err(ProverError::InvalidInput(_))
        ));
    }
}
