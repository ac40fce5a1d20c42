//! Tree persistence: snapshot export and replay-based import.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tree::CommitmentTree;
use crate::error::TreeError;
use crate::field::{fr_from_str, fr_to_dec_string};

/// Serializable tree state, stable across process restarts.
///
/// Leaves carry their indices explicitly and field elements travel as
/// decimal strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    pub depth: usize,
    pub leaves: Vec<(u64, String)>,
    pub root: String,
    pub leaf_count: u64,
}

impl CommitmentTree {
    /// Export the tree as a portable snapshot.
    pub fn export_state(&self) -> TreeSnapshot {
        TreeSnapshot {
            depth: self.depth(),
            leaves: self
                .leaves()
                .into_iter()
                .map(|(index, leaf)| (index, fr_to_dec_string(&leaf)))
                .collect(),
            root: fr_to_dec_string(&self.root()),
            leaf_count: self.leaf_count(),
        }
    }

    /// Rebuild a tree from a snapshot by replaying every leaf insertion,
    /// then cross-check the recomputed root against the exported one.
    ///
    /// The node cache is never trusted from outside: replay is what keeps
    /// the cache and the leaves consistent by construction.
    pub fn import_state(snapshot: &TreeSnapshot) -> Result<Self, TreeError> {
        if snapshot.leaf_count as usize != snapshot.leaves.len() {
            return Err(TreeError::InvalidState(format!(
                "leaf count {} does not match {} leaves",
                snapshot.leaf_count,
                snapshot.leaves.len()
            )));
        }

        let mut leaves = snapshot.leaves.clone();
        leaves.sort_by_key(|&(index, _)| index);

        let mut tree = Self::new(snapshot.depth)?;
        for (position, (index, encoded)) in leaves.iter().enumerate() {
            // Indices are assigned sequentially from 0 and never reused; a
            // gap or duplicate means the snapshot was not produced by this
            // tree.
            if *index != position as u64 {
                return Err(TreeError::InvalidState(format!(
                    "non-contiguous leaf index {index} at position {position}"
                )));
            }
            let leaf = fr_from_str(encoded)?;
            tree.add_leaf(leaf)?;
        }

        let expected = fr_from_str(&snapshot.root)?;
        if tree.root() != expected {
            return Err(TreeError::RootMismatch {
                expected: snapshot.root.clone(),
                computed: fr_to_dec_string(&tree.root()),
            });
        }

        debug!(leaves = tree.leaf_count(), "tree state imported");
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    fn populated_tree() -> CommitmentTree {
        let mut tree = CommitmentTree::new(8).unwrap();
        for i in 0..17u64 {
            tree.add_leaf(Fr::from(100 + i)).unwrap();
        }
        tree
    }

    #[test]
    fn test_export_import_fidelity() {
        let tree = populated_tree();
        let snapshot = tree.export_state();

        let restored = CommitmentTree::import_state(&snapshot).unwrap();
        assert_eq!(restored.root(), tree.root());
        assert_eq!(restored.leaf_count(), tree.leaf_count());
        assert_eq!(restored.depth(), tree.depth());

        // Proofs generated by the restored tree keep verifying.
        let proof = restored.proof(11).unwrap();
        assert!(restored.verify_proof(&proof));
    }

    #[test]
    fn test_empty_tree_round_trip() {
        let tree = CommitmentTree::new(8).unwrap();
        let restored = CommitmentTree::import_state(&tree.export_state()).unwrap();
        assert_eq!(restored.root(), tree.root());
        assert_eq!(restored.leaf_count(), 0);
    }

    #[test]
    fn test_snapshot_serde_round_trip() {
        let snapshot = populated_tree().export_state();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: TreeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_import_rejects_tampered_root() {
        let mut snapshot = populated_tree().export_state();
        snapshot.root = "12345".to_string();
        assert!(matches!(
            CommitmentTree::import_state(&snapshot),
            Err(TreeError::RootMismatch { .. })
        ));
    }

    #[test]
    fn test_import_rejects_gapped_indices() {
        let mut snapshot = populated_tree().export_state();
        snapshot.leaves.remove(3);
        snapshot.leaf_count -= 1;
        assert!(matches!(
            CommitmentTree::import_state(&snapshot),
            Err(TreeError::InvalidState(_))
        ));
    }

    #[test]
    fn test_import_rejects_count_mismatch() {
        let mut snapshot = populated_tree().export_state();
        snapshot.leaf_count += 1;
        assert!(matches!(
            CommitmentTree::import_state(&snapshot),
            Err(TreeError::InvalidState(_))
        ));
    }
}
