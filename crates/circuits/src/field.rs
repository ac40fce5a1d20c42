//! Field-element encoding helpers.
//!
//! The proving library's convention carries field elements as decimal
//! strings; the on-chain side consumes 32-byte big-endian words. Both
//! directions reject out-of-range values instead of reducing them.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

use crate::error::FieldError;

/// Serialized size of one field element.
pub const FIELD_BYTES: usize = 32;

fn modulus() -> BigUint {
    BigUint::from(Fr::MODULUS)
}

/// Parse a field element from its canonical decimal string or a 0x-prefixed
/// hex string. Values at or above the field modulus are rejected, not
/// reduced.
pub fn fr_from_str(s: &str) -> Result<Fr, FieldError> {
    let trimmed = s.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x") {
        BigUint::parse_bytes(hex.as_bytes(), 16)
    } else {
        BigUint::parse_bytes(trimmed.as_bytes(), 10)
    }
    .ok_or_else(|| FieldError::InvalidEncoding(trimmed.to_string()))?;

    if value >= modulus() {
        return Err(FieldError::OutOfRange(trimmed.to_string()));
    }
    Ok(Fr::from(value))
}

/// Canonical decimal encoding.
pub fn fr_to_dec_string(f: &Fr) -> String {
    BigUint::from(f.into_bigint()).to_string()
}

/// Big-endian 32-byte encoding.
pub fn fr_to_be_bytes(f: &Fr) -> [u8; FIELD_BYTES] {
    let bytes = f.into_bigint().to_bytes_be();
    let mut out = [0u8; FIELD_BYTES];
    out[FIELD_BYTES - bytes.len()..].copy_from_slice(&bytes);
    out
}

/// Parse a field element from 32 big-endian bytes, rejecting values at or
/// above the modulus.
pub fn fr_from_be_bytes(bytes: &[u8; FIELD_BYTES]) -> Result<Fr, FieldError> {
    let value = BigUint::from_bytes_be(bytes);
    if value >= modulus() {
        return Err(FieldError::OutOfRange(value.to_string()));
    }
    Ok(Fr::from(value))
}
