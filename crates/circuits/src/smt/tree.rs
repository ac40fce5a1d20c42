//! Commitment tree: storage, insertion, root maintenance.

use std::collections::HashMap;
use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::Zero;
use tracing::debug;

use super::proof::MembershipProof;
use crate::error::TreeError;
use crate::poseidon::poseidon_hash_two;

/// Default tree depth (2^20 ≈ 1M commitments).
pub const DEFAULT_DEPTH: usize = 20;

/// Upper bound on construction depth.
pub const MAX_DEPTH: usize = 32;

/// Root of the empty tree: `H(0, 0)`.
///
/// Fixed together with the zero sibling sentinel below; insertion, proof
/// generation, and verification all rely on the same pair of constants.
pub fn genesis_root() -> Fr {
    static GENESIS: OnceLock<Fr> = OnceLock::new();
    *GENESIS.get_or_init(|| poseidon_hash_two(Fr::zero(), Fr::zero()))
}

/// Sentinel for every unpopulated leaf or node position.
fn zero_sentinel() -> Fr {
    Fr::zero()
}

/// Append-only Merkle tree over commitment leaves.
///
/// Indices are assigned sequentially starting at 0 and never reused, so the
/// final tree depends on insertion order. Storage is sparse: only populated
/// leaves and the internal nodes on their paths are kept.
#[derive(Clone, Debug)]
pub struct CommitmentTree {
    /// Levels from leaf (0) to root (`depth`).
    depth: usize,

    /// Populated leaves: index -> commitment.
    leaves: HashMap<u64, Fr>,

    /// Cached internal hashes: (level, index) -> hash, level in 1..=depth.
    nodes: HashMap<(usize, u64), Fr>,

    /// Current root.
    root: Fr,

    /// Next index to assign.
    next_index: u64,
}

impl CommitmentTree {
    /// Create an empty tree. The depth is fixed for the tree's lifetime.
    pub fn new(depth: usize) -> Result<Self, TreeError> {
        if depth == 0 || depth > MAX_DEPTH {
            return Err(TreeError::InvalidDepth(depth));
        }
        Ok(Self {
            depth,
            leaves: HashMap::new(),
            nodes: HashMap::new(),
            root: genesis_root(),
            next_index: 0,
        })
    }

    /// Append a commitment, returning its assigned index.
    ///
    /// Recomputes only the path from the new leaf to the root. A full tree
    /// is a terminal condition for this instance; callers must provision a
    /// deeper tree.
    pub fn add_leaf(&mut self, leaf: Fr) -> Result<u64, TreeError> {
        if self.next_index >= self.capacity() {
            return Err(TreeError::CapacityExhausted {
                depth: self.depth,
                capacity: self.capacity(),
            });
        }

        let index = self.next_index;
        self.leaves.insert(index, leaf);
        self.next_index += 1;
        self.recompute_path(index);

        debug!(index, leaves = self.next_index, "commitment appended");
        Ok(index)
    }

    /// Recompute cached hashes from a leaf up to the root.
    fn recompute_path(&mut self, index: u64) {
        let mut current_index = index;
        let mut current_hash = self.node(0, index);

        for level in 0..self.depth {
            let sibling = self.node(level, current_index ^ 1);

            let parent_index = current_index >> 1;
            let parent_hash = if current_index & 1 == 0 {
                poseidon_hash_two(current_hash, sibling)
            } else {
                poseidon_hash_two(sibling, current_hash)
            };

            self.nodes.insert((level + 1, parent_index), parent_hash);
            current_index = parent_index;
            current_hash = parent_hash;
        }

        self.root = current_hash;
    }

    /// Node hash at (level, index), falling back to the zero sentinel.
    fn node(&self, level: usize, index: u64) -> Fr {
        if level == 0 {
            self.leaves.get(&index).copied().unwrap_or_else(zero_sentinel)
        } else {
            self.nodes
                .get(&(level, index))
                .copied()
                .unwrap_or_else(zero_sentinel)
        }
    }

    /// Current root.
    pub fn root(&self) -> Fr {
        self.root
    }

    /// Fixed depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Maximum number of leaves.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    /// Number of leaves inserted so far.
    pub fn leaf_count(&self) -> u64 {
        self.next_index
    }

    /// The leaf at `index`, if assigned.
    pub fn leaf(&self, index: u64) -> Option<Fr> {
        self.leaves.get(&index).copied()
    }

    /// All populated leaves in index order.
    pub fn leaves(&self) -> Vec<(u64, Fr)> {
        let mut entries: Vec<(u64, Fr)> = self.leaves.iter().map(|(&i, &l)| (i, l)).collect();
        entries.sort_by_key(|&(i, _)| i);
        entries
    }

    /// Build a membership proof for the leaf at `index`.
    ///
    /// The proof captures the current root; callers proving against a tree
    /// that may advance concurrently hold this snapshot, and a root change
    /// surfaces as a verification failure at submission time.
    pub fn proof(&self, index: u64) -> Result<MembershipProof, TreeError> {
        let leaf = self
            .leaves
            .get(&index)
            .copied()
            .ok_or(TreeError::LeafNotFound(index))?;

        let mut path = Vec::with_capacity(self.depth);
        let mut indices = Vec::with_capacity(self.depth);

        let mut current_index = index;
        for level in 0..self.depth {
            path.push(self.node(level, current_index ^ 1));
            indices.push(current_index & 1 == 1);
            current_index >>= 1;
        }

        Ok(MembershipProof {
            leaf,
            path,
            indices,
            root: self.root,
        })
    }

    /// Verify a membership proof against this tree's current root.
    pub fn verify_proof(&self, proof: &MembershipProof) -> bool {
        proof.verify(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree() {
        let tree = CommitmentTree::new(8).unwrap();
        assert_eq!(tree.leaf_count(), 0);
        assert_eq!(tree.root(), genesis_root());
        assert!(tree.leaf(0).is_none());
    }

    #[test]
    fn test_rejects_bad_depth() {
        assert!(matches!(
            CommitmentTree::new(0),
            Err(TreeError::InvalidDepth(0))
        ));
        assert!(matches!(
            CommitmentTree::new(MAX_DEPTH + 1),
            Err(TreeError::InvalidDepth(_))
        ));
    }

    #[test]
    fn test_sequential_index_assignment() {
        let mut tree = CommitmentTree::new(8).unwrap();
        assert_eq!(tree.add_leaf(Fr::from(10u64)).unwrap(), 0);
        assert_eq!(tree.add_leaf(Fr::from(20u64)).unwrap(), 1);
        assert_eq!(tree.add_leaf(Fr::from(30u64)).unwrap(), 2);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_root_changes_on_insert() {
        let mut tree = CommitmentTree::new(8).unwrap();
        let r0 = tree.root();
        tree.add_leaf(Fr::from(1u64)).unwrap();
        let r1 = tree.root();
        assert_ne!(r0, r1);
        tree.add_leaf(Fr::from(2u64)).unwrap();
        assert_ne!(r1, tree.root());
    }

    #[test]
    fn test_insertion_order_matters() {
        // Index assignment is sequential, so order changes the tree. This is
        // documented behavior, not a defect.
        let mut a = CommitmentTree::new(8).unwrap();
        a.add_leaf(Fr::from(1u64)).unwrap();
        a.add_leaf(Fr::from(2u64)).unwrap();

        let mut b = CommitmentTree::new(8).unwrap();
        b.add_leaf(Fr::from(2u64)).unwrap();
        b.add_leaf(Fr::from(1u64)).unwrap();

        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn test_zero_sibling_consistency() {
        // A single leaf in a fresh tree: every sibling is the zero sentinel
        // and folding them against the leaf reproduces the root.
        let mut tree = CommitmentTree::new(8).unwrap();
        let leaf = Fr::from(424242u64);
        tree.add_leaf(leaf).unwrap();

        let proof = tree.proof(0).unwrap();
        assert_eq!(proof.path.len(), 8);
        assert!(proof.path.iter().all(|s| s.is_zero()));
        assert_eq!(proof.compute_root(), tree.root());
    }

    #[test]
    fn test_proof_round_trip_various_sizes() {
        for n in [0u64, 1, 2, 17] {
            let mut tree = CommitmentTree::new(8).unwrap();
            for i in 0..n {
                tree.add_leaf(Fr::from(1000 + i)).unwrap();
            }
            for i in 0..n {
                let proof = tree.proof(i).unwrap();
                assert!(tree.verify_proof(&proof), "index {i} of {n}");
            }
        }
    }

    #[test]
    fn test_proof_round_trip_large() {
        let mut tree = CommitmentTree::new(12).unwrap();
        for i in 0..1000u64 {
            tree.add_leaf(Fr::from(i + 1)).unwrap();
        }
        for i in 0..1000u64 {
            let proof = tree.proof(i).unwrap();
            assert!(tree.verify_proof(&proof), "index {i}");
        }
    }

    #[test]
    fn test_proof_unknown_index() {
        let mut tree = CommitmentTree::new(8).unwrap();
        tree.add_leaf(Fr::from(5u64)).unwrap();
        assert!(matches!(tree.proof(1), Err(TreeError::LeafNotFound(1))));
        assert!(matches!(tree.proof(99), Err(TreeError::LeafNotFound(99))));
    }

    #[test]
    fn test_capacity_boundary() {
        // Depth 2 holds exactly 4 leaves; the 5th must be rejected.
        let mut tree = CommitmentTree::new(2).unwrap();
        for i in 0..4u64 {
            tree.add_leaf(Fr::from(i + 1)).unwrap();
        }
        let err = tree.add_leaf(Fr::from(5u64)).unwrap_err();
        assert!(matches!(
            err,
            TreeError::CapacityExhausted {
                depth: 2,
                capacity: 4
            }
        ));
        assert_eq!(tree.leaf_count(), 4);
    }

    #[test]
    fn test_stale_proof_fails_after_update() {
        let mut tree = CommitmentTree::new(8).unwrap();
        tree.add_leaf(Fr::from(1u64)).unwrap();
        let proof = tree.proof(0).unwrap();
        assert!(tree.verify_proof(&proof));

        tree.add_leaf(Fr::from(2u64)).unwrap();
        // The captured snapshot no longer folds to the advanced root.
        assert!(!tree.verify_proof(&proof));
        // But it still folds to the root it captured.
        assert!(proof.verify(proof.root));
    }
}
