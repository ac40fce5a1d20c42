//! Membership proofs: ordered sibling hashes plus left/right direction bits.

use ark_bn254::Fr;

use crate::poseidon::poseidon_hash_two;

/// Proof that a leaf is a member of a tree under `root`.
///
/// `path[i]` is the sibling hash at level `i`; `indices[i]` is true when the
/// current node is the right child at that level. Folding `leaf` through
/// `path` in order must reproduce `root`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipProof {
    pub leaf: Fr,
    pub path: Vec<Fr>,
    pub indices: Vec<bool>,
    /// Root of the tree snapshot this proof was generated against.
    pub root: Fr,
}

impl MembershipProof {
    /// Number of levels covered by this proof.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Fold the path against the leaf, reproducing the root it commits to.
    pub fn compute_root(&self) -> Fr {
        fold(self.leaf, &self.path, &self.indices)
    }

    /// Verify against an explicit root. Used both for self-checks against
    /// the generating tree and for externally supplied roots (e.g. one
    /// fetched from chain) before submission.
    pub fn verify(&self, root: Fr) -> bool {
        verify_against_root(self.leaf, &self.path, &self.indices, root)
    }
}

fn fold(leaf: Fr, path: &[Fr], indices: &[bool]) -> Fr {
    let mut current = leaf;
    for (sibling, &is_right) in path.iter().zip(indices.iter()) {
        current = if is_right {
            poseidon_hash_two(*sibling, current)
        } else {
            poseidon_hash_two(current, *sibling)
        };
    }
    current
}

/// Free-standing proof verification against a supplied root.
///
/// Works without the full tree, so a proof can be checked in another
/// process against an on-chain root.
pub fn verify_against_root(leaf: Fr, path: &[Fr], indices: &[bool], root: Fr) -> bool {
    if path.len() != indices.len() {
        return false;
    }
    fold(leaf, path, indices) == root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_deterministic() {
        let proof = MembershipProof {
            leaf: Fr::from(5u64),
            path: vec![Fr::from(1u64), Fr::from(2u64)],
            indices: vec![false, true],
            root: Fr::from(0u64),
        };
        assert_eq!(proof.compute_root(), proof.compute_root());
    }

    #[test]
    fn test_direction_bits_change_root() {
        let leaf = Fr::from(5u64);
        let path = vec![Fr::from(1u64), Fr::from(2u64)];

        let left = fold(leaf, &path, &[false, false]);
        let right = fold(leaf, &path, &[true, false]);
        assert_ne!(left, right);
    }

    #[test]
    fn test_verify_against_external_root() {
        let leaf = Fr::from(9u64);
        let path = vec![Fr::from(3u64), Fr::from(4u64)];
        let indices = vec![true, false];

        let root = fold(leaf, &path, &indices);
        assert!(verify_against_root(leaf, &path, &indices, root));
        assert!(!verify_against_root(leaf, &path, &indices, Fr::from(1u64)));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let leaf = Fr::from(9u64);
        let path = vec![Fr::from(3u64), Fr::from(4u64)];
        let root = fold(leaf, &path, &[true, false]);
        assert!(!verify_against_root(leaf, &path, &[true], root));
    }
}
