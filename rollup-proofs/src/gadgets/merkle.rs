use super::hash::PoseidonHasherVar;
use crate::types::MerkleProof;
use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

/// Private Merkle path plus its claimed root.
#[derive(Clone)]
pub struct MerkleProofVar {
    pub path: Vec<FpVar<Fr>>,
    pub root: FpVar<Fr>,
}

impl MerkleProofVar {
    pub fn new_witness<const DEPTH: usize>(
        cs: ConstraintSystemRef<Fr>,
        proof: &MerkleProof<DEPTH>,
    ) -> Result<Self, SynthesisError> {
        let path = proof
            .path
            .iter()
            .map(|sibling| FpVar::new_witness(cs.clone(), || Ok(*sibling)))
            .collect::<Result<Vec<_>, _>>()?;
        let root = FpVar::new_witness(cs, || Ok(proof.root))?;
        Ok(Self { path, root })
    }
}

/// Fold `leaf` up the tree. `index_bits[i]` set means the running node is the right child.
pub fn compute_root(
    hasher: &mut PoseidonHasherVar,
    leaf: &FpVar<Fr>,
    path: &[FpVar<Fr>],
    index_bits: &[Boolean<Fr>],
) -> Result<FpVar<Fr>, SynthesisError> {
    if path.len() != index_bits.len() {
        return Err(SynthesisError::Unsatisfiable);
    }

    let mut current = leaf.clone();
    for (sibling, is_right) in path.iter().zip(index_bits) {
        let left = is_right.select(sibling, &current)?;
        let right = is_right.select(&current, sibling)?;
        current = hasher.hash(&[left, right])?;
    }
    Ok(current)
}
