//! Host-side sparse Merkle tree over Poseidon.
//!
//! Unset leaves are zero; empty subtrees are represented by precomputed defaults, so only touched
//! paths are stored.

use crate::error::ZkError;
use crate::hash::hash_pair;
use crate::types::MerkleProof;
use ark_bn254::Fr;
use ark_ff::Zero;
use std::collections::BTreeMap;

/// Recompute a root from a leaf, its sibling path and its index.
///
/// Bit `i` of `index` (little-endian) says whether the running node is a right child at level `i`.
pub fn compute_root(leaf: Fr, path: &[Fr], index: u64) -> Fr {
    let mut current = leaf;
    for (level, sibling) in path.iter().enumerate() {
        // Levels past the index width are left children.
        let bit = u32::try_from(level).ok().and_then(|l| index.checked_shr(l)).unwrap_or(0) & 1;
        current = if bit == 0 {
            hash_pair(current, *sibling)
        } else {
            hash_pair(*sibling, current)
        };
    }
    current
}

#[derive(Clone, Debug)]
pub struct MerkleTree<const DEPTH: usize> {
    /// (level, position) -> node; level 0 holds leaves.
    nodes: BTreeMap<(usize, u64), Fr>,
    /// Root of an empty subtree of each height, `defaults[DEPTH]` being the empty root.
    defaults: Vec<Fr>,
}

impl<const DEPTH: usize> MerkleTree<DEPTH> {
    pub fn new() -> Self {
        let mut defaults = Vec::with_capacity(DEPTH + 1);
        defaults.push(Fr::zero());
        for level in 0..DEPTH {
            let below = defaults[level];
            defaults.push(hash_pair(below, below));
        }
        Self {
            nodes: BTreeMap::new(),
            defaults,
        }
    }

    /// Number of leaf slots, saturating at `u128::MAX` for very deep trees.
    pub fn capacity() -> u128 {
        u32::try_from(DEPTH)
            .ok()
            .and_then(|depth| 1u128.checked_shl(depth))
            .unwrap_or(u128::MAX)
    }

    fn check_index(index: u64) -> Result<(), ZkError> {
        if u128::from(index) >= Self::capacity() {
            return Err(ZkError::IndexOutOfRange { index, depth: DEPTH });
        }
        Ok(())
    }

    fn node(&self, level: usize, position: u64) -> Fr {
        self.nodes
            .get(&(level, position))
            .copied()
            .unwrap_or(self.defaults[level])
    }

    pub fn root(&self) -> Fr {
        self.node(DEPTH, 0)
    }

    pub fn leaf(&self, index: u64) -> Fr {
        self.node(0, index)
    }

    /// Set a leaf and rehash its path to the root.
    pub fn set(&mut self, index: u64, leaf: Fr) -> Result<(), ZkError> {
        Self::check_index(index)?;

        self.nodes.insert((0, index), leaf);
        let mut position = index;
        let mut current = leaf;
        for level in 0..DEPTH {
            let sibling = self.node(level, position ^ 1);
            current = if position & 1 == 0 {
                hash_pair(current, sibling)
            } else {
                hash_pair(sibling, current)
            };
            position >>= 1;
            self.nodes.insert((level + 1, position), current);
        }
        Ok(())
    }

    pub fn proof(&self, index: u64) -> Result<MerkleProof<DEPTH>, ZkError> {
        Self::check_index(index)?;

        let mut path = [Fr::zero(); DEPTH];
        let mut position = index;
        for (level, sibling) in path.iter_mut().enumerate() {
            *sibling = self.node(level, position ^ 1);
            position >>= 1;
        }
        Ok(MerkleProof {
            path,
            root: self.root(),
        })
    }
}

impl<const DEPTH: usize> Default for MerkleTree<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}
