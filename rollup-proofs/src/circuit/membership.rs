//! Account membership in the before/after state trees.

use crate::gadgets::hash::PoseidonHasherVar;
use crate::gadgets::merkle::{compute_root, MerkleProofVar};
use crate::gadgets::range::constrain_bits;
use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

/// Constrain `index < 2^depth` and return its little-endian bits.
pub fn decompose_index(index: &FpVar<Fr>, depth: usize) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    constrain_bits(index, depth)
}

/// `leaf` at `index_bits` reduces to the proof's claimed root, and that root is `expected_root`.
pub fn verify_membership(
    hasher: &mut PoseidonHasherVar,
    leaf: &FpVar<Fr>,
    proof: &MerkleProofVar,
    index_bits: &[Boolean<Fr>],
    expected_root: &FpVar<Fr>,
) -> Result<(), SynthesisError> {
    let recomputed = compute_root(hasher, leaf, &proof.path, index_bits)?;
    recomputed.enforce_equal(&proof.root)?;
    proof.root.enforce_equal(expected_root)
}
