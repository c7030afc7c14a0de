//! R1CS circuit proving one account-to-account transfer against the ledger's state roots.
//!
//! What this circuit proves:
//! 1) The sender and receiver accounts move from their "before" to their "after" state by exactly
//!    `amount`, with the sender's nonce bumped and no overdraft.
//! 2) The transfer is signed by the sender over Poseidon(nonce, amount, sender, receiver).
//! 3) All four account states are leaves of the public `root_before` / `root_after` trees at the
//!    accounts' indices.
//!
//! Privacy: accounts, transfer, signature and Merkle paths are witnesses. Only the two roots are
//! public.

pub mod authenticity;
pub mod membership;
pub mod transition;

use crate::gadgets::hash::PoseidonHasherVar;
use crate::gadgets::merkle::MerkleProofVar;
use crate::gadgets::signature::{alloc_point, SignatureVar};
use crate::keys::{PublicKey, Signature};
use crate::types::{Account, MerkleProof, Transfer, TransactionWitness};
use ark_bn254::Fr;
use ark_ec::AffineRepr;
use ark_ed_on_bn254::constraints::EdwardsVar;
use ark_ed_on_bn254::{EdwardsAffine, Fr as JubjubScalar};
use ark_ff::Zero;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

/// In-circuit account state.
#[derive(Clone)]
pub struct AccountVar {
    pub nonce: FpVar<Fr>,
    pub balance: FpVar<Fr>,
    pub index: FpVar<Fr>,
    pub pubkey: EdwardsVar,
}

impl AccountVar {
    pub fn new_witness(cs: ConstraintSystemRef<Fr>, account: &Account) -> Result<Self, SynthesisError> {
        Ok(Self {
            nonce: FpVar::new_witness(cs.clone(), || Ok(Fr::from(account.nonce)))?,
            balance: FpVar::new_witness(cs.clone(), || Ok(Fr::from(account.balance)))?,
            index: FpVar::new_witness(cs.clone(), || Ok(Fr::from(account.index)))?,
            pubkey: alloc_point(cs, &account.pubkey.0)?,
        })
    }

    /// Tree leaf; must agree with `hash::account_leaf`.
    pub fn leaf(&self, hasher: &mut PoseidonHasherVar) -> Result<FpVar<Fr>, SynthesisError> {
        hasher.hash(&[
            self.index.clone(),
            self.nonce.clone(),
            self.balance.clone(),
            self.pubkey.x.clone(),
            self.pubkey.y.clone(),
        ])
    }
}

#[derive(Clone)]
pub struct TransferVar {
    pub amount: FpVar<Fr>,
    pub nonce: FpVar<Fr>,
    pub sender_pubkey: EdwardsVar,
    pub receiver_pubkey: EdwardsVar,
    pub signature: SignatureVar,
}

impl TransferVar {
    pub fn new_witness(cs: ConstraintSystemRef<Fr>, transfer: &Transfer) -> Result<Self, SynthesisError> {
        Ok(Self {
            amount: FpVar::new_witness(cs.clone(), || Ok(Fr::from(transfer.amount)))?,
            nonce: FpVar::new_witness(cs.clone(), || Ok(Fr::from(transfer.nonce)))?,
            sender_pubkey: alloc_point(cs.clone(), &transfer.sender_pubkey.0)?,
            receiver_pubkey: alloc_point(cs.clone(), &transfer.receiver_pubkey.0)?,
            signature: SignatureVar::new_witness(cs, &transfer.signature)?,
        })
    }
}

/// Circuit for a single transfer in a tree of depth `DEPTH`.
///
/// The depth is part of the circuit shape: keys are per-`DEPTH`.
#[derive(Clone, Debug)]
pub struct TransactionCircuit<const DEPTH: usize> {
    pub witness: TransactionWitness<DEPTH>,
}

impl<const DEPTH: usize> TransactionCircuit<DEPTH> {
    pub fn new(witness: TransactionWitness<DEPTH>) -> Self {
        Self { witness }
    }

    /// Structurally valid placeholder with the same shape as any real transfer, for key setup.
    ///
    /// It does not satisfy the relation.
    pub fn dummy() -> Self {
        let pubkey = PublicKey(EdwardsAffine::generator());
        let account = Account {
            nonce: 0,
            balance: 0,
            index: 0,
            pubkey,
        };
        let transfer = Transfer {
            amount: 0,
            nonce: 0,
            sender_pubkey: pubkey,
            receiver_pubkey: pubkey,
            signature: Signature {
                r: EdwardsAffine::generator(),
                s: JubjubScalar::zero(),
            },
        };

        Self {
            witness: TransactionWitness {
                sender_before: account,
                receiver_before: account,
                sender_after: account,
                receiver_after: account,
                transfer,
                sender_before_proof: MerkleProof::empty(),
                sender_after_proof: MerkleProof::empty(),
                receiver_before_proof: MerkleProof::empty(),
                receiver_after_proof: MerkleProof::empty(),
                sender_index: 0,
                receiver_index: 0,
                root_before: Fr::zero(),
                root_after: Fr::zero(),
            },
        }
    }

    /// Public inputs in allocation order.
    pub fn public_inputs(&self) -> Vec<Fr> {
        vec![self.witness.root_before, self.witness.root_after]
    }
}

impl<const DEPTH: usize> ConstraintSynthesizer<Fr> for TransactionCircuit<DEPTH> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let w = self.witness;

        // --- Public inputs ---
        // IMPORTANT: ordering MUST match `TransactionCircuit::public_inputs`.
        let root_before = FpVar::<Fr>::new_input(cs.clone(), || Ok(w.root_before))?;
        let root_after = FpVar::<Fr>::new_input(cs.clone(), || Ok(w.root_after))?;

        authenticity::ensure_well_formed(
            &w.transfer,
            [&w.sender_before, &w.receiver_before, &w.sender_after, &w.receiver_after],
        )?;

        // --- Witness ---
        let sender_before = AccountVar::new_witness(cs.clone(), &w.sender_before)?;
        let receiver_before = AccountVar::new_witness(cs.clone(), &w.receiver_before)?;
        let sender_after = AccountVar::new_witness(cs.clone(), &w.sender_after)?;
        let receiver_after = AccountVar::new_witness(cs.clone(), &w.receiver_after)?;
        let transfer = TransferVar::new_witness(cs.clone(), &w.transfer)?;

        let sender_before_proof = MerkleProofVar::new_witness(cs.clone(), &w.sender_before_proof)?;
        let sender_after_proof = MerkleProofVar::new_witness(cs.clone(), &w.sender_after_proof)?;
        let receiver_before_proof = MerkleProofVar::new_witness(cs.clone(), &w.receiver_before_proof)?;
        let receiver_after_proof = MerkleProofVar::new_witness(cs.clone(), &w.receiver_after_proof)?;

        let sender_index = FpVar::<Fr>::new_witness(cs.clone(), || Ok(Fr::from(w.sender_index)))?;
        let receiver_index = FpVar::<Fr>::new_witness(cs.clone(), || Ok(Fr::from(w.receiver_index)))?;

        // Shared by every hashing step below; each use resets it.
        let mut hasher = PoseidonHasherVar::new(cs.clone());

        transition::enforce_transition(
            &sender_before,
            &receiver_before,
            &sender_after,
            &receiver_after,
            &transfer.amount,
        )?;

        authenticity::enforce_transfer_parties(&transfer, &sender_before, &receiver_before)?;
        authenticity::verify_transfer_signature(&mut hasher, &transfer)?;

        // The account records carry their own index; it must be the leaf position being proven.
        sender_before.index.enforce_equal(&sender_index)?;
        receiver_before.index.enforce_equal(&receiver_index)?;
        let sender_bits = membership::decompose_index(&sender_index, DEPTH)?;
        let receiver_bits = membership::decompose_index(&receiver_index, DEPTH)?;

        let checks = [
            (&sender_before, &sender_before_proof, &sender_bits, &root_before),
            (&sender_after, &sender_after_proof, &sender_bits, &root_after),
            (&receiver_before, &receiver_before_proof, &receiver_bits, &root_before),
            (&receiver_after, &receiver_after_proof, &receiver_bits, &root_after),
        ];
        for (account, proof, bits, root) in checks {
            let leaf = account.leaf(&mut hasher)?;
            membership::verify_membership(&mut hasher, &leaf, proof, bits, root)?;
        }

        Ok(())
    }
}
