//! Host-side account ledger that produces circuit witnesses.

use crate::error::ZkError;
use crate::hash::{account_leaf, transfer_message};
use crate::merkle::MerkleTree;
use crate::types::{Account, Transfer, TransactionWitness};
use ark_bn254::Fr;
use std::collections::BTreeMap;
use tracing::debug;

/// Accounts keyed by leaf index, mirrored into a Poseidon Merkle tree.
#[derive(Clone, Debug, Default)]
pub struct AccountTree<const DEPTH: usize> {
    accounts: BTreeMap<u64, Account>,
    tree: MerkleTree<DEPTH>,
}

impl<const DEPTH: usize> AccountTree<DEPTH> {
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
            tree: MerkleTree::new(),
        }
    }

    /// Add an account at its own `index`.
    pub fn insert(&mut self, account: Account) -> Result<(), ZkError> {
        account.pubkey.validate()?;
        if self.accounts.contains_key(&account.index) {
            return Err(ZkError::AccountExists { index: account.index });
        }
        self.tree.set(account.index, account_leaf(&account))?;
        self.accounts.insert(account.index, account);
        Ok(())
    }

    pub fn get(&self, index: u64) -> Option<&Account> {
        self.accounts.get(&index)
    }

    pub fn root(&self) -> Fr {
        self.tree.root()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Apply a signed transfer and return the witness proving it.
    ///
    /// Every rule the circuit enforces is checked here first, with a typed error. On error the
    /// ledger is unchanged.
    pub fn apply_transfer(
        &mut self,
        transfer: &Transfer,
        sender_index: u64,
        receiver_index: u64,
    ) -> Result<TransactionWitness<DEPTH>, ZkError> {
        if sender_index == receiver_index {
            return Err(ZkError::SelfTransfer);
        }
        let sender_before = *self
            .accounts
            .get(&sender_index)
            .ok_or(ZkError::UnknownAccount(sender_index))?;
        let receiver_before = *self
            .accounts
            .get(&receiver_index)
            .ok_or(ZkError::UnknownAccount(receiver_index))?;

        if transfer.sender_pubkey != sender_before.pubkey || transfer.receiver_pubkey != receiver_before.pubkey {
            return Err(ZkError::KeyMismatch);
        }
        if transfer.nonce != sender_before.nonce {
            return Err(ZkError::NonceMismatch {
                expected: sender_before.nonce,
                got: transfer.nonce,
            });
        }
        if !sender_before.pubkey.verify(transfer_message(transfer), &transfer.signature) {
            return Err(ZkError::InvalidSignature);
        }

        let sender_balance = sender_before
            .balance
            .checked_sub(transfer.amount)
            .ok_or(ZkError::InsufficientBalance {
                have: sender_before.balance,
                need: transfer.amount,
            })?;
        let receiver_balance = receiver_before
            .balance
            .checked_add(transfer.amount)
            .ok_or(ZkError::BalanceOverflow { index: receiver_index })?;
        let sender_nonce = sender_before
            .nonce
            .checked_add(1)
            .ok_or(ZkError::NonceExhausted { index: sender_index })?;

        let sender_after = Account {
            nonce: sender_nonce,
            balance: sender_balance,
            ..sender_before
        };
        let receiver_after = Account {
            balance: receiver_balance,
            ..receiver_before
        };

        let root_before = self.tree.root();
        let sender_before_proof = self.tree.proof(sender_index)?;
        let receiver_before_proof = self.tree.proof(receiver_index)?;

        self.tree.set(sender_index, account_leaf(&sender_after))?;
        self.tree.set(receiver_index, account_leaf(&receiver_after))?;
        self.accounts.insert(sender_index, sender_after);
        self.accounts.insert(receiver_index, receiver_after);

        let root_after = self.tree.root();
        let sender_after_proof = self.tree.proof(sender_index)?;
        let receiver_after_proof = self.tree.proof(receiver_index)?;

        debug!(sender_index, receiver_index, amount = transfer.amount, "transfer applied");

        Ok(TransactionWitness {
            sender_before,
            receiver_before,
            sender_after,
            receiver_after,
            transfer: *transfer,
            sender_before_proof,
            sender_after_proof,
            receiver_before_proof,
            receiver_after_proof,
            sender_index,
            receiver_index,
            root_before,
            root_after,
        })
    }
}
