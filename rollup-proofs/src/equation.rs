//! Toy circuit: knowledge of `x` with `x^3 + x + 5 == y`, `y` public.

use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

/// `x^3 + x + 5`, computed natively.
pub fn evaluate(x: Fr) -> Fr {
    x * x * x + x + Fr::from(5u64)
}

#[derive(Clone, Copy, Debug)]
pub struct EquationCircuit {
    /// Private.
    pub x: Fr,
    /// Public.
    pub y: Fr,
}

impl EquationCircuit {
    /// Circuit for `x` with `y` derived from it.
    pub fn from_x(x: Fr) -> Self {
        Self { x, y: evaluate(x) }
    }
}

impl ConstraintSynthesizer<Fr> for EquationCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let y = FpVar::<Fr>::new_input(cs.clone(), || Ok(self.y))?;
        let x = FpVar::<Fr>::new_witness(cs, || Ok(self.x))?;

        let cube = &x * &x * &x;
        (cube + &x + FpVar::constant(Fr::from(5u64))).enforce_equal(&y)
    }
}
