//! Host-side Poseidon hashing.
//!
//! Every function here has an in-circuit twin (see `gadgets::hash` and the circuit components);
//! absorption order is part of the format and must stay in sync with the gadgets.

use crate::constants::poseidon_config;
use crate::types::{Account, Transfer};
use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::{PoseidonConfig, PoseidonSponge};
use ark_crypto_primitives::sponge::CryptographicSponge;

/// Resettable Poseidon hasher: `reset`, `absorb`, `digest`.
#[derive(Clone)]
pub struct PoseidonHasher {
    config: &'static PoseidonConfig<Fr>,
    sponge: PoseidonSponge<Fr>,
}

impl PoseidonHasher {
    pub fn new() -> Self {
        let config = poseidon_config();
        let sponge = PoseidonSponge::<Fr>::new(config);
        Self { config, sponge }
    }

    /// Drop all absorbed state.
    pub fn reset(&mut self) {
        self.sponge = PoseidonSponge::<Fr>::new(self.config);
    }

    pub fn absorb(&mut self, values: &[Fr]) {
        for v in values {
            self.sponge.absorb(v);
        }
    }

    pub fn digest(&mut self) -> Fr {
        self.sponge.squeeze_field_elements::<Fr>(1)[0]
    }

    /// `reset`, absorb `values`, `digest`.
    pub fn hash(&mut self, values: &[Fr]) -> Fr {
        self.reset();
        self.absorb(values);
        self.digest()
    }
}

impl Default for PoseidonHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot Poseidon over a list of field elements.
pub fn hash_fields(values: &[Fr]) -> Fr {
    PoseidonHasher::new().hash(values)
}

/// Merkle interior node.
pub fn hash_pair(left: Fr, right: Fr) -> Fr {
    hash_fields(&[left, right])
}

/// Leaf committed in the account tree: Poseidon(index, nonce, balance, pk.x, pk.y).
pub fn account_leaf(account: &Account) -> Fr {
    let (x, y) = account.pubkey.coordinates();
    hash_fields(&[
        Fr::from(account.index),
        Fr::from(account.nonce),
        Fr::from(account.balance),
        x,
        y,
    ])
}

/// Canonical signed message: Poseidon(nonce, amount, sender.x, sender.y, receiver.x, receiver.y).
pub fn transfer_message(transfer: &Transfer) -> Fr {
    let (sx, sy) = transfer.sender_pubkey.coordinates();
    let (rx, ry) = transfer.receiver_pubkey.coordinates();
    hash_fields(&[
        Fr::from(transfer.nonce),
        Fr::from(transfer.amount),
        sx,
        sy,
        rx,
        ry,
    ])
}
