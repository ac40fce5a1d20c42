//! Transaction records and privacy receipts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Transaction class; only cross-border payments count against the daily
/// limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionClass {
    Domestic,
    CrossBorder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

/// Which proof family backed a submitted payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    Groth16,
    Mock,
}

/// Receipt binding a submitted payment to its privacy artifacts. The
/// explorer shows only the transaction hash; the receipt is the user's
/// local evidence of what was proven.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyReceipt {
    pub tx_hash: String,
    pub network: String,
    pub timestamp: i64,
    pub commitment_root: String,
    /// SHA-256 of the serialized proof bytes.
    pub zk_proof_hash: String,
    pub nullifier: String,
    pub proof_type: ProofType,
}

impl PrivacyReceipt {
    /// Build a receipt, hashing the serialized proof bytes.
    pub fn new(
        tx_hash: impl Into<String>,
        network: impl Into<String>,
        commitment_root: impl Into<String>,
        proof_bytes: &[u8],
        nullifier: impl Into<String>,
        proof_type: ProofType,
        now: i64,
    ) -> Self {
        let digest = Sha256::digest(proof_bytes);
        Self {
            tx_hash: tx_hash.into(),
            network: network.into(),
            timestamp: now,
            commitment_root: commitment_root.into(),
            zk_proof_hash: hex::encode(digest),
            nullifier: nullifier.into(),
            proof_type,
        }
    }
}

/// A locally recorded payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub signature: String,
    /// Amount in lamports.
    pub amount: u64,
    pub recipient: String,
    pub class: TransactionClass,
    pub status: TransactionStatus,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<PrivacyReceipt>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_hashes_proof_bytes() {
        let receipt = PrivacyReceipt::new(
            "txhash",
            "devnet",
            "root",
            &[1u8, 2, 3],
            "nullifier",
            ProofType::Groth16,
            1_700_000_000,
        );
        // SHA-256 of [1, 2, 3].
        assert_eq!(
            receipt.zk_proof_hash,
            "039058c6f2c0cb492c533b0a4d14ef77cc0f78abccced5287d84a1a2011cfb81"
        );
    }

    #[test]
    fn test_record_serde_skips_empty_fields() {
        let record = TransactionRecord {
            id: "tx-1".to_string(),
            signature: "sig".to_string(),
            amount: 100,
            recipient: "addr".to_string(),
            class: TransactionClass::Domestic,
            status: TransactionStatus::Pending,
            timestamp: 0,
            error_message: None,
            receipt: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("errorMessage"));
        assert!(!json.contains("receipt"));
        assert!(json.contains("\"class\":\"domestic\""));
    }
}
