//! In-process Groth16 backend for the spend circuit.
//!
//! Plays the role of the external proving service behind the
//! `ProvingBackend` trait: same witness shape in, same JSON proof shape
//! out, so swapping in an out-of-process prover changes nothing upstream.

use std::path::Path;

use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ff::PrimeField;
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::rngs::StdRng;
use ark_std::rand::{CryptoRng, RngCore, SeedableRng};
use num_bigint::BigUint;
use serde_json::{json, Value};
use tracing::{debug, info};

use privacy_pay_circuits::field::{fr_from_str, fr_to_dec_string};
use privacy_pay_circuits::SpendCircuit;

use crate::backend::{BackendError, BackendOutput, ProvingBackend, SpendWitness};
use crate::proof_data::ProofPoints;

const PK_FILE: &str = "spend.pk";
const VK_FILE: &str = "spend.vk";

/// ark-groth16 proving backend holding the spend-circuit keys.
pub struct Groth16Backend {
    proving_key: ProvingKey<Bn254>,
    verifying_key: VerifyingKey<Bn254>,
}

impl Groth16Backend {
    /// Run circuit-specific setup with entropy from the OS.
    pub fn setup() -> Result<Self, BackendError> {
        Self::setup_with_rng(&mut StdRng::from_entropy())
    }

    /// Run circuit-specific setup with a caller-supplied rng (seeded in
    /// tests).
    pub fn setup_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, BackendError> {
        let (proving_key, verifying_key) =
            Groth16::<Bn254>::circuit_specific_setup(SpendCircuit::empty(), rng)
                .map_err(|e| BackendError::Setup(e.to_string()))?;

        info!("spend-circuit trusted setup complete");
        Ok(Self {
            proving_key,
            verifying_key,
        })
    }

    /// Persist both keys into a directory.
    pub fn save(&self, dir: &Path) -> Result<(), BackendError> {
        std::fs::create_dir_all(dir)
            .map_err(|e| BackendError::Artifacts(e.to_string()))?;

        let mut pk_bytes = Vec::new();
        self.proving_key
            .serialize_compressed(&mut pk_bytes)
            .map_err(|e| BackendError::Artifacts(e.to_string()))?;
        std::fs::write(dir.join(PK_FILE), pk_bytes)
            .map_err(|e| BackendError::Artifacts(e.to_string()))?;

        let mut vk_bytes = Vec::new();
        self.verifying_key
            .serialize_compressed(&mut vk_bytes)
            .map_err(|e| BackendError::Artifacts(e.to_string()))?;
        std::fs::write(dir.join(VK_FILE), vk_bytes)
            .map_err(|e| BackendError::Artifacts(e.to_string()))?;

        Ok(())
    }

    /// Load keys previously written by `save`.
    pub fn load(dir: &Path) -> Result<Self, BackendError> {
        let pk_bytes = std::fs::read(dir.join(PK_FILE))
            .map_err(|e| BackendError::Artifacts(format!("{PK_FILE}: {e}")))?;
        let vk_bytes = std::fs::read(dir.join(VK_FILE))
            .map_err(|e| BackendError::Artifacts(format!("{VK_FILE}: {e}")))?;

        let proving_key = ProvingKey::deserialize_compressed(pk_bytes.as_slice())
            .map_err(|e| BackendError::Artifacts(e.to_string()))?;
        let verifying_key = VerifyingKey::deserialize_compressed(vk_bytes.as_slice())
            .map_err(|e| BackendError::Artifacts(e.to_string()))?;

        Ok(Self {
            proving_key,
            verifying_key,
        })
    }

    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.verifying_key
    }

    /// Verify proof points locally against the circuit's public inputs
    /// `[nullifier, amount]` (decimal strings). Used before submission and
    /// in tests; the on-chain verifier is authoritative.
    pub fn verify(
        &self,
        points: &ProofPoints,
        nullifier: &str,
        amount: &str,
    ) -> Result<bool, BackendError> {
        let proof = proof_from_points(points);
        let nullifier = fr_from_str(nullifier).map_err(|e| BackendError::Witness(e.to_string()))?;
        let amount = fr_from_str(amount).map_err(|e| BackendError::Witness(e.to_string()))?;

        Groth16::<Bn254>::verify(&self.verifying_key, &[nullifier, amount], &proof)
            .map_err(|e| BackendError::Synthesis(e.to_string()))
    }
}

impl ProvingBackend for Groth16Backend {
    fn prove(&self, witness: &SpendWitness) -> Result<BackendOutput, BackendError> {
        let secret =
            fr_from_str(&witness.secret).map_err(|e| BackendError::Witness(e.to_string()))?;
        let amount: u64 = witness
            .amount
            .parse()
            .map_err(|e| BackendError::Witness(format!("amount: {e}")))?;

        let circuit = SpendCircuit::new(secret, amount);
        let nullifier = circuit.nullifier;

        let mut rng = StdRng::from_entropy();
        let proof = Groth16::<Bn254>::prove(&self.proving_key, circuit, &mut rng)
            .map_err(|e| BackendError::Synthesis(e.to_string()))?;

        debug!(amount, "spend proof synthesized");

        Ok(BackendOutput {
            proof: proof_to_json(&proof),
            public_signals: vec![fr_to_dec_string(&nullifier), amount.to_string()],
        })
    }
}

fn fq_dec(x: &Fq) -> String {
    BigUint::from(x.into_bigint()).to_string()
}

fn g1_json(p: &G1Affine) -> Value {
    if p.infinity {
        json!(["0", "0", "0"])
    } else {
        json!([fq_dec(&p.x), fq_dec(&p.y), "1"])
    }
}

fn g2_json(p: &G2Affine) -> Value {
    if p.infinity {
        json!([["0", "0"], ["0", "0"], ["0", "0"]])
    } else {
        json!([
            [fq_dec(&p.x.c0), fq_dec(&p.x.c1)],
            [fq_dec(&p.y.c0), fq_dec(&p.y.c1)],
            ["1", "0"],
        ])
    }
}

/// Encode an ark proof as the proving library's JSON shape.
fn proof_to_json(proof: &Proof<Bn254>) -> Value {
    json!({
        "pi_a": g1_json(&proof.a),
        "pi_b": g2_json(&proof.b),
        "pi_c": g1_json(&proof.c),
        "protocol": "groth16",
        "curve": "bn254",
    })
}

fn fq_from_biguint(value: &BigUint) -> Fq {
    Fq::from(value.clone())
}

/// Rebuild an ark proof from validated points. Coordinates are taken as-is;
/// verification rejects points that are not on the curve.
fn proof_from_points(points: &ProofPoints) -> Proof<Bn254> {
    Proof {
        a: G1Affine::new_unchecked(
            fq_from_biguint(&points.pi_a[0]),
            fq_from_biguint(&points.pi_a[1]),
        ),
        b: G2Affine::new_unchecked(
            Fq2::new(
                fq_from_biguint(&points.pi_b[0][0]),
                fq_from_biguint(&points.pi_b[0][1]),
            ),
            Fq2::new(
                fq_from_biguint(&points.pi_b[1][0]),
                fq_from_biguint(&points.pi_b[1][1]),
            ),
        ),
        c: G1Affine::new_unchecked(
            fq_from_biguint(&points.pi_c[0]),
            fq_from_biguint(&points.pi_c[1]),
        ),
    }
}
