//! Types shared between the circuit and the host-side prover/verifier.

use crate::error::ZkError;
use crate::keys::{PublicKey, Signature};
use ark_bn254::Fr;
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

/// One ledger entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account {
    pub nonce: u64,
    pub balance: u64,
    /// Leaf position in the account tree.
    pub index: u64,
    pub pubkey: PublicKey,
}

/// Intent to move `amount` from the sender to the receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub amount: u64,
    /// Must equal the sender's nonce before the transfer.
    pub nonce: u64,
    pub sender_pubkey: PublicKey,
    pub receiver_pubkey: PublicKey,
    pub signature: Signature,
}

/// Membership evidence for one leaf in a tree of depth `DEPTH`.
///
/// `path[0]` is the sibling at the leaf level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MerkleProof<const DEPTH: usize> {
    pub path: [Fr; DEPTH],
    /// Claimed root.
    pub root: Fr,
}

impl<const DEPTH: usize> MerkleProof<DEPTH> {
    pub fn empty() -> Self {
        Self {
            path: [Fr::zero(); DEPTH],
            root: Fr::zero(),
        }
    }
}

/// Everything the transfer circuit consumes for one transfer.
///
/// Only `root_before` and `root_after` become public inputs.
#[derive(Clone, Debug)]
pub struct TransactionWitness<const DEPTH: usize> {
    pub sender_before: Account,
    pub receiver_before: Account,
    pub sender_after: Account,
    pub receiver_after: Account,

    pub transfer: Transfer,

    pub sender_before_proof: MerkleProof<DEPTH>,
    pub sender_after_proof: MerkleProof<DEPTH>,
    pub receiver_before_proof: MerkleProof<DEPTH>,
    pub receiver_after_proof: MerkleProof<DEPTH>,

    pub sender_index: u64,
    pub receiver_index: u64,

    pub root_before: Fr,
    pub root_after: Fr,
}

/// JSON-friendly representation of a field element.
///
/// Hex of the arkworks compressed encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrHex {
    pub hex: String,
}

impl FrHex {
    pub fn from_fr(x: &Fr) -> Self {
        let mut bytes = Vec::new();
        x.serialize_compressed(&mut bytes)
            .expect("in-memory serialization");
        Self { hex: hex::encode(bytes) }
    }

    pub fn to_fr(&self) -> Result<Fr, ZkError> {
        let bytes = hex::decode(&self.hex).map_err(|e| ZkError::Serialization(format!("invalid hex: {e}")))?;
        Fr::deserialize_compressed(&bytes[..])
            .map_err(|e| ZkError::Serialization(format!("invalid field bytes: {e}")))
    }
}

/// Public inputs of a transfer proof.
///
/// Ordering MUST match the circuit's public input allocation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPublicInputs {
    pub root_before: FrHex,
    pub root_after: FrHex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fr_hex_rejects_garbage() {
        assert!(matches!(
            FrHex { hex: "zz".to_string() }.to_fr(),
            Err(ZkError::Serialization(_))
        ));
        assert!(matches!(
            FrHex { hex: "ff".repeat(32) }.to_fr(),
            Err(ZkError::Serialization(_))
        ));
    }

    #[test]
    fn public_inputs_json_shape() {
        let inputs = TransferPublicInputs {
            root_before: FrHex::from_fr(&Fr::from(1u64)),
            root_after: FrHex::from_fr(&Fr::from(2u64)),
        };
        let json = serde_json::to_value(&inputs).unwrap();

        assert!(json["root_before"]["hex"].is_string());
        assert_eq!(inputs.root_after.to_fr().unwrap(), Fr::from(2u64));
    }
}
