//! Typed proof points, validated at the trust boundary.
//!
//! The backend hands back an arbitrary JSON object; anything that does not
//! conform to the expected pi_a/pi_b/pi_c substructure is rejected here,
//! before it can reach the serializer.

use num_bigint::BigUint;
use serde_json::{json, Value};

use crate::error::ProverError;

/// Groth16 proof points in the canonical wire shape.
///
/// Elements are unsigned 256-bit integers (curve base-field coordinates);
/// `pi_b` is row-major by point coordinate: `[[x.c0, x.c1], [y.c0, y.c1]]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofPoints {
    pub pi_a: [BigUint; 2],
    pub pi_b: [[BigUint; 2]; 2],
    pub pi_c: [BigUint; 2],
}

impl ProofPoints {
    /// Zero-filled points for mock proofs: structurally valid, with no
    /// cryptographic meaning.
    pub fn zeroed() -> Self {
        let zero = || BigUint::from(0u8);
        Self {
            pi_a: [zero(), zero()],
            pi_b: [[zero(), zero()], [zero(), zero()]],
            pi_c: [zero(), zero()],
        }
    }

    /// Validate a duck-typed proof object into typed points.
    ///
    /// Accepts the proving library's projective encoding (a third "1"
    /// coordinate is ignored). Missing or mistyped fields are
    /// `MalformedProof`; over-wide values are `InvalidProofStructure`.
    pub fn from_json(value: &Value) -> Result<Self, ProverError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ProverError::MalformedProof("proof is not an object".to_string()))?;

        let pi_a = parse_g1(obj.get("pi_a"), "pi_a")?;
        let pi_b = parse_g2(obj.get("pi_b"), "pi_b")?;
        let pi_c = parse_g1(obj.get("pi_c"), "pi_c")?;

        Ok(Self { pi_a, pi_b, pi_c })
    }

    /// Re-encode as the proving library's JSON shape (decimal strings).
    pub fn to_json(&self) -> Value {
        json!({
            "pi_a": [self.pi_a[0].to_string(), self.pi_a[1].to_string(), "1"],
            "pi_b": [
                [self.pi_b[0][0].to_string(), self.pi_b[0][1].to_string()],
                [self.pi_b[1][0].to_string(), self.pi_b[1][1].to_string()],
                ["1", "0"],
            ],
            "pi_c": [self.pi_c[0].to_string(), self.pi_c[1].to_string(), "1"],
            "protocol": "groth16",
            "curve": "bn254",
        })
    }
}

fn parse_element(value: &Value, context: &str) -> Result<BigUint, ProverError> {
    let s = value.as_str().ok_or_else(|| {
        ProverError::MalformedProof(format!("{context} element is not a string"))
    })?;

    let parsed = if let Some(hex) = s.strip_prefix("0x") {
        BigUint::parse_bytes(hex.as_bytes(), 16)
    } else {
        BigUint::parse_bytes(s.as_bytes(), 10)
    }
    .ok_or_else(|| ProverError::MalformedProof(format!("{context} element {s:?} is not numeric")))?;

    if parsed.bits() > 256 {
        return Err(ProverError::InvalidProofStructure(format!(
            "{context} element exceeds 256 bits"
        )));
    }
    Ok(parsed)
}

fn parse_g1(field: Option<&Value>, name: &str) -> Result<[BigUint; 2], ProverError> {
    let arr = field
        .and_then(Value::as_array)
        .ok_or_else(|| ProverError::MalformedProof(format!("missing {name}")))?;
    if arr.len() < 2 {
        return Err(ProverError::MalformedProof(format!(
            "{name} has {} coordinates, expected at least 2",
            arr.len()
        )));
    }
    Ok([
        parse_element(&arr[0], name)?,
        parse_element(&arr[1], name)?,
    ])
}

fn parse_g2(field: Option<&Value>, name: &str) -> Result<[[BigUint; 2]; 2], ProverError> {
    let arr = field
        .and_then(Value::as_array)
        .ok_or_else(|| ProverError::MalformedProof(format!("missing {name}")))?;
    if arr.len() < 2 {
        return Err(ProverError::MalformedProof(format!(
            "{name} has {} rows, expected at least 2",
            arr.len()
        )));
    }

    let zero = || BigUint::from(0u8);
    let mut rows = [[zero(), zero()], [zero(), zero()]];
    for (i, row) in arr.iter().take(2).enumerate() {
        let pair = row.as_array().ok_or_else(|| {
            ProverError::MalformedProof(format!("{name}[{i}] is not an array"))
        })?;
        if pair.len() < 2 {
            return Err(ProverError::MalformedProof(format!(
                "{name}[{i}] has {} elements, expected 2",
                pair.len()
            )));
        }
        rows[i] = [
            parse_element(&pair[0], name)?,
            parse_element(&pair[1], name)?,
        ];
    }
    Ok(rows)
}
