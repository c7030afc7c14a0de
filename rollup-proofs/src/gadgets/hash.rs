//! In-circuit Poseidon with an explicit `reset`.
//!
//! One instance is shared by all components of a circuit; each use starts with `reset` so state
//! absorbed by a previous use never leaks into the next digest.

use crate::constants::poseidon_config;
use ark_bn254::Fr;
use ark_crypto_primitives::sponge::constraints::CryptographicSpongeVar;
use ark_crypto_primitives::sponge::poseidon::constraints::PoseidonSpongeVar;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

pub struct PoseidonHasherVar {
    cs: ConstraintSystemRef<Fr>,
    config: &'static PoseidonConfig<Fr>,
    sponge: PoseidonSpongeVar<Fr>,
}

impl PoseidonHasherVar {
    pub fn new(cs: ConstraintSystemRef<Fr>) -> Self {
        let config = poseidon_config();
        let sponge = PoseidonSpongeVar::<Fr>::new(cs.clone(), config);
        Self { cs, config, sponge }
    }

    pub fn reset(&mut self) {
        self.sponge = PoseidonSpongeVar::<Fr>::new(self.cs.clone(), self.config);
    }

    pub fn absorb(&mut self, values: &[FpVar<Fr>]) -> Result<(), SynthesisError> {
        for v in values {
            self.sponge.absorb(v)?;
        }
        Ok(())
    }

    pub fn digest(&mut self) -> Result<FpVar<Fr>, SynthesisError> {
        let mut out = self.sponge.squeeze_field_elements(1)?;
        Ok(out.remove(0))
    }

    /// `reset`, absorb `values`, `digest`.
    pub fn hash(&mut self, values: &[FpVar<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
        self.reset();
        self.absorb(values)?;
        self.digest()
    }
}
