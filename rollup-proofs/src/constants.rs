//! Crate-wide constants shared by the transfer circuit and host-side witness construction.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{find_poseidon_ark_and_mds, PoseidonConfig};
use ark_ff::PrimeField;
use std::sync::OnceLock;

/// Depth of the account tree used by the demo binary.
///
/// 2^8 = 256 account slots. The depth fixes the circuit shape, so keys generated for one depth
/// cannot prove transfers for another.
pub const DEFAULT_TREE_DEPTH: usize = 8;

/// Bit width of balances, amounts and nonces.
///
/// Every value that takes part in an ordering check is constrained to this many bits, which keeps
/// `b - a` for `a <= b` far away from the field modulus.
pub const VALUE_BITS: usize = 64;

// Poseidon sponge configuration.
//
// Width-3 sponge (rate=2, capacity=1). Native hashing and the in-circuit gadget both derive their
// constants from `poseidon_config`, so a leaf or message hashed on the host matches the circuit.
pub const POSEIDON_RATE: usize = 2;
pub const POSEIDON_CAPACITY: usize = 1;

pub const POSEIDON_FULL_ROUNDS: usize = 8;
pub const POSEIDON_PARTIAL_ROUNDS: usize = 57;

/// Poseidon S-box exponent (alpha).
pub const POSEIDON_ALPHA: u64 = 5;

/// Poseidon parameters for BN254::Fr, derived once per process.
pub fn poseidon_config() -> &'static PoseidonConfig<Fr> {
    static CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();
    CONFIG.get_or_init(derive_poseidon_config)
}

/// Deterministically derive Poseidon parameters for BN254::Fr.
fn derive_poseidon_config() -> PoseidonConfig<Fr> {
    let prime_bits = Fr::MODULUS_BIT_SIZE as u64;

    let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
        prime_bits,
        POSEIDON_RATE,
        POSEIDON_FULL_ROUNDS as u64,
        POSEIDON_PARTIAL_ROUNDS as u64,
        0,
    );

    PoseidonConfig::new(
        POSEIDON_FULL_ROUNDS,
        POSEIDON_PARTIAL_ROUNDS,
        POSEIDON_ALPHA,
        mds,
        ark,
        POSEIDON_RATE,
        POSEIDON_CAPACITY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poseidon_config_is_derived_once() {
        let first = poseidon_config();
        let second = poseidon_config();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.full_rounds, POSEIDON_FULL_ROUNDS);
        assert_eq!(first.partial_rounds, POSEIDON_PARTIAL_ROUNDS);
    }
}
