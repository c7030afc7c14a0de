//! EdDSA verification over Baby Jubjub inside the BN254 circuit.

use super::hash::PoseidonHasherVar;
use crate::keys::{check_point, PublicKey, Signature};
use ark_bn254::Fr;
use ark_ec::AffineRepr;
use ark_ed_on_bn254::constraints::EdwardsVar;
use ark_ed_on_bn254::{EdwardsAffine, EdwardsProjective};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

/// Allocate a curve point as a private witness.
///
/// Allocation constrains the point to the curve and to the prime-order subgroup.
pub fn alloc_point(cs: ConstraintSystemRef<Fr>, point: &EdwardsAffine) -> Result<EdwardsVar, SynthesisError> {
    EdwardsVar::new_witness(cs, || Ok(EdwardsProjective::from(*point)))
}

/// Structural check on key material, run before anything is allocated.
pub fn check_public_key(pk: &PublicKey) -> Result<(), SynthesisError> {
    check_point(&pk.0).map_err(|_| SynthesisError::MalformedVerifyingKey)?;
    pk.validate().map_err(|_| SynthesisError::UnexpectedIdentity)
}

pub fn check_signature(signature: &Signature) -> Result<(), SynthesisError> {
    check_point(&signature.r).map_err(|_| SynthesisError::MalformedVerifyingKey)
}

#[derive(Clone)]
pub struct SignatureVar {
    pub r: EdwardsVar,
    /// Response scalar, carried in the circuit field.
    pub s: FpVar<Fr>,
}

impl SignatureVar {
    pub fn new_witness(cs: ConstraintSystemRef<Fr>, signature: &Signature) -> Result<Self, SynthesisError> {
        let r = alloc_point(cs.clone(), &signature.r)?;
        let s = FpVar::new_witness(cs, || Ok(signature.s_as_base_field()))?;
        Ok(Self { r, s })
    }
}

/// Enforce `[s]B == R + [c]A` with `c = Poseidon(R.x, R.y, A.x, A.y, message)`.
pub fn verify(
    hasher: &mut PoseidonHasherVar,
    signature: &SignatureVar,
    message: &FpVar<Fr>,
    public_key: &EdwardsVar,
) -> Result<(), SynthesisError> {
    let challenge = hasher.hash(&[
        signature.r.x.clone(),
        signature.r.y.clone(),
        public_key.x.clone(),
        public_key.y.clone(),
        message.clone(),
    ])?;

    let generator = EdwardsVar::constant(EdwardsAffine::generator().into_group());
    let s_bits = signature.s.to_bits_le()?;
    let lhs = generator.scalar_mul_le(s_bits.iter())?;

    let c_bits = challenge.to_bits_le()?;
    let rhs = signature.r.clone() + public_key.scalar_mul_le(c_bits.iter())?;

    lhs.enforce_equal(&rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SecretKey;
    use ark_relations::r1cs::ConstraintSystem;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn run(pk: &PublicKey, signature: &Signature, message: Fr) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let pk_var = alloc_point(cs.clone(), &pk.0).unwrap();
        let sig_var = SignatureVar::new_witness(cs.clone(), signature).unwrap();
        let msg_var = FpVar::new_witness(cs.clone(), || Ok(message)).unwrap();

        let mut hasher = PoseidonHasherVar::new(cs.clone());
        verify(&mut hasher, &sig_var, &msg_var, &pk_var).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn accepts_native_signature() {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let sk = SecretKey::random(&mut rng);
        let msg = Fr::from(42u64);
        let sig = sk.sign(msg, &mut rng);

        assert!(sk.public_key().verify(msg, &sig));
        assert!(run(&sk.public_key(), &sig, msg));
    }

    #[test]
    fn rejects_wrong_message_and_key() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let sk = SecretKey::random(&mut rng);
        let other = SecretKey::random(&mut rng);
        let msg = Fr::from(42u64);
        let sig = sk.sign(msg, &mut rng);

        assert!(!run(&sk.public_key(), &sig, Fr::from(43u64)));
        assert!(!run(&other.public_key(), &sig, msg));
    }

    #[test]
    fn structural_checks() {
        let off_curve = PublicKey(EdwardsAffine::new_unchecked(Fr::from(1u64), Fr::from(2u64)));
        assert!(matches!(
            check_public_key(&off_curve),
            Err(SynthesisError::MalformedVerifyingKey)
        ));

        let identity = PublicKey(EdwardsAffine::new_unchecked(Fr::from(0u64), Fr::from(1u64)));
        assert!(matches!(
            check_public_key(&identity),
            Err(SynthesisError::UnexpectedIdentity)
        ));
    }
}
