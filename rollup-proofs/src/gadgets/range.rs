//! Bit decomposition and range constraints.

use crate::constants::VALUE_BITS;
use ark_bn254::Fr;
use ark_ff::PrimeField;
use ark_r1cs_std::prelude::*;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::SynthesisError;

/// Convert little-endian boolean bits into an FpVar.
pub fn bits_le_to_fp(bits_le: &[Boolean<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    let mut acc = FpVar::<Fr>::zero();
    let mut coeff = FpVar::<Fr>::one();

    for b in bits_le {
        // b ? coeff : 0
        let term = b.select(&coeff, &FpVar::<Fr>::zero())?;
        acc += term;
        coeff += coeff.clone();
    }

    Ok(acc)
}

/// Enforce `v < 2^num_bits` and return its `num_bits` little-endian bits.
///
/// `num_bits` must be below the field's bit size; wider requests cannot bound anything and are
/// rejected with `SynthesisError::Unsatisfiable`.
pub fn constrain_bits(v: &FpVar<Fr>, num_bits: usize) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    if num_bits >= Fr::MODULUS_BIT_SIZE as usize {
        return Err(SynthesisError::Unsatisfiable);
    }

    let bits = v.to_bits_le()?;
    let low = bits[..num_bits].to_vec();
    let reconstructed = bits_le_to_fp(&low)?;
    reconstructed.enforce_equal(v)?;
    Ok(low)
}

/// Enforce that `v` fits in a u64.
pub fn constrain_u64(v: &FpVar<Fr>) -> Result<(), SynthesisError> {
    constrain_bits(v, VALUE_BITS).map(|_| ())
}

/// Enforce `a <= b`.
///
/// Both operands must already be constrained to `VALUE_BITS`; then `b - a` fits in `VALUE_BITS`
/// exactly when `a <= b`, and wraps to a value near the modulus otherwise.
pub fn enforce_less_or_equal(a: &FpVar<Fr>, b: &FpVar<Fr>) -> Result<(), SynthesisError> {
    constrain_u64(&(b - a))
}
