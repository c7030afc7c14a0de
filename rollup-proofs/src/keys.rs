//! EdDSA over Baby Jubjub (`ark-ed-on-bn254`), host side.
//!
//! The curve's base field is BN254's scalar field, so public-key coordinates are native circuit
//! values. Verification equation: `[s]B == R + [c]A` with `c = Poseidon(R.x, R.y, A.x, A.y, m)`.
//! The circuit multiplies by the full integer `c`; signing reduces it mod the subgroup order, which
//! is the same point because `A` lives in the prime-order subgroup.

use crate::error::ZkError;
use crate::hash::hash_fields;
use ark_bn254::Fr;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bn254::{EdwardsAffine, Fr as JubjubScalar};
use ark_ff::{BigInteger, One, PrimeField, Zero};
use ark_serialize::CanonicalDeserialize;
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};

/// Validate a curve point for use as key material.
pub(crate) fn check_point(point: &EdwardsAffine) -> Result<(), ZkError> {
    if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ZkError::InvalidPoint);
    }
    Ok(())
}

fn is_identity(point: &EdwardsAffine) -> bool {
    point.x.is_zero() && point.y.is_one()
}

#[derive(Clone)]
pub struct SecretKey(JubjubScalar);

impl SecretKey {
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let sk = JubjubScalar::rand(rng);
            if !sk.is_zero() {
                return Self(sk);
            }
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey((EdwardsAffine::generator() * self.0).into_affine())
    }

    pub fn sign<R: RngCore + CryptoRng>(&self, message: Fr, rng: &mut R) -> Signature {
        let k = JubjubScalar::rand(rng);
        let r = (EdwardsAffine::generator() * k).into_affine();
        let c = challenge(&r, &self.public_key(), message);
        let s = k + challenge_scalar(c) * self.0;
        Signature { r, s }
    }
}

/// Account / signer public key.
///
/// The inner point is public so callers can carry raw points around; use
/// [`PublicKey::from_coordinates`] or [`PublicKey::validate`] before trusting one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(pub EdwardsAffine);

impl PublicKey {
    pub fn from_coordinates(x: Fr, y: Fr) -> Result<Self, ZkError> {
        let pk = Self(EdwardsAffine::new_unchecked(x, y));
        pk.validate()?;
        Ok(pk)
    }

    /// On curve, in the prime-order subgroup, not the identity.
    pub fn validate(&self) -> Result<(), ZkError> {
        check_point(&self.0)?;
        if is_identity(&self.0) {
            return Err(ZkError::IdentityKey);
        }
        Ok(())
    }

    pub fn coordinates(&self) -> (Fr, Fr) {
        (self.0.x, self.0.y)
    }

    pub fn verify(&self, message: Fr, signature: &Signature) -> bool {
        let c = challenge(&signature.r, self, message);
        let lhs = EdwardsAffine::generator() * signature.s;
        let rhs = signature.r.into_group() + self.0.mul_bigint(c.into_bigint());
        lhs == rhs
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub r: EdwardsAffine,
    pub s: JubjubScalar,
}

impl Signature {
    /// Build a signature from raw parts; `s_le` must be a canonical little-endian scalar.
    pub fn from_parts(r_x: Fr, r_y: Fr, s_le: &[u8; 32]) -> Result<Self, ZkError> {
        let r = EdwardsAffine::new_unchecked(r_x, r_y);
        check_point(&r)?;
        let s = JubjubScalar::deserialize_compressed(&s_le[..]).map_err(|_| ZkError::InvalidScalar)?;
        Ok(Self { r, s })
    }

    /// `s` as a BN254 scalar-field element (the subgroup order is below the BN254 modulus).
    pub fn s_as_base_field(&self) -> Fr {
        Fr::from_le_bytes_mod_order(&self.s.into_bigint().to_bytes_le())
    }
}

/// Fiat-Shamir challenge, in the circuit's field.
pub fn challenge(r: &EdwardsAffine, public_key: &PublicKey, message: Fr) -> Fr {
    let (ax, ay) = public_key.coordinates();
    hash_fields(&[r.x, r.y, ax, ay, message])
}

fn challenge_scalar(c: Fr) -> JubjubScalar {
    JubjubScalar::from_le_bytes_mod_order(&c.into_bigint().to_bytes_le())
}
