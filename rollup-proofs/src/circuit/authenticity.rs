//! Transfer authenticity: canonical message hash and sender signature.

use super::{AccountVar, TransferVar};
use crate::gadgets::hash::PoseidonHasherVar;
use crate::gadgets::signature::{self, check_public_key, check_signature};
use crate::types::{Account, Transfer};
use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

/// Reject structurally invalid key material before any constraint is emitted.
///
/// This is the only hard failure of the transfer circuit; everything else becomes an
/// unsatisfiable constraint.
pub fn ensure_well_formed(transfer: &Transfer, accounts: [&Account; 4]) -> Result<(), SynthesisError> {
    check_public_key(&transfer.sender_pubkey)?;
    check_public_key(&transfer.receiver_pubkey)?;
    check_signature(&transfer.signature)?;
    for account in accounts {
        check_public_key(&account.pubkey)?;
    }
    Ok(())
}

/// Poseidon(nonce, amount, sender.x, sender.y, receiver.x, receiver.y).
///
/// The order is the signed message format; `hash::transfer_message` must agree.
pub fn transfer_message(
    hasher: &mut PoseidonHasherVar,
    transfer: &TransferVar,
) -> Result<FpVar<Fr>, SynthesisError> {
    hasher.hash(&[
        transfer.nonce.clone(),
        transfer.amount.clone(),
        transfer.sender_pubkey.x.clone(),
        transfer.sender_pubkey.y.clone(),
        transfer.receiver_pubkey.x.clone(),
        transfer.receiver_pubkey.y.clone(),
    ])
}

/// Signature over the canonical message, under the transfer's sender key.
pub fn verify_transfer_signature(
    hasher: &mut PoseidonHasherVar,
    transfer: &TransferVar,
) -> Result<(), SynthesisError> {
    let message = transfer_message(hasher, transfer)?;
    signature::verify(hasher, &transfer.signature, &message, &transfer.sender_pubkey)
}

/// The transfer names the ledger's accounts and spends the sender's current nonce.
pub fn enforce_transfer_parties(
    transfer: &TransferVar,
    sender_before: &AccountVar,
    receiver_before: &AccountVar,
) -> Result<(), SynthesisError> {
    transfer.sender_pubkey.enforce_equal(&sender_before.pubkey)?;
    transfer.receiver_pubkey.enforce_equal(&receiver_before.pubkey)?;
    transfer.nonce.enforce_equal(&sender_before.nonce)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash;
    use crate::keys::SecretKey;
    use ark_relations::r1cs::ConstraintSystem;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn signed_transfer(rng: &mut ChaCha20Rng) -> (SecretKey, Transfer) {
        let sender = SecretKey::random(rng);
        let receiver = SecretKey::random(rng).public_key();
        let mut transfer = Transfer {
            amount: 30,
            nonce: 1,
            sender_pubkey: sender.public_key(),
            receiver_pubkey: receiver,
            signature: sender.sign(Fr::from(0u64), rng),
        };
        transfer.signature = sender.sign(hash::transfer_message(&transfer), rng);
        (sender, transfer)
    }

    fn signature_holds(transfer: &Transfer) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let var = TransferVar::new_witness(cs.clone(), transfer).unwrap();
        let mut hasher = PoseidonHasherVar::new(cs.clone());
        verify_transfer_signature(&mut hasher, &var).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn message_matches_native() {
        let mut rng = ChaCha20Rng::seed_from_u64(20);
        let (_, transfer) = signed_transfer(&mut rng);

        let cs = ConstraintSystem::<Fr>::new_ref();
        let var = TransferVar::new_witness(cs.clone(), &transfer).unwrap();
        let mut hasher = PoseidonHasherVar::new(cs.clone());
        // Dirty the hasher first: the message must not depend on earlier use.
        hasher.absorb(&[var.amount.clone()]).unwrap();
        let message = transfer_message(&mut hasher, &var).unwrap();

        assert_eq!(message.value().unwrap(), hash::transfer_message(&transfer));
    }

    #[test]
    fn valid_signature() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let (_, transfer) = signed_transfer(&mut rng);
        assert!(signature_holds(&transfer));
    }

    #[test]
    fn tampered_fields_break_signature() {
        let mut rng = ChaCha20Rng::seed_from_u64(22);
        let (_, transfer) = signed_transfer(&mut rng);

        let mut t = transfer;
        t.amount = 31;
        assert!(!signature_holds(&t));

        let mut t = transfer;
        t.nonce = 2;
        assert!(!signature_holds(&t));

        let mut t = transfer;
        t.receiver_pubkey = SecretKey::random(&mut rng).public_key();
        assert!(!signature_holds(&t));
    }

    #[test]
    fn signed_by_someone_else() {
        let mut rng = ChaCha20Rng::seed_from_u64(23);
        let (_, mut transfer) = signed_transfer(&mut rng);
        let mallory = SecretKey::random(&mut rng);
        transfer.signature = mallory.sign(hash::transfer_message(&transfer), &mut rng);
        assert!(!signature_holds(&transfer));
    }

    #[test]
    fn malformed_key_is_a_hard_error() {
        let mut rng = ChaCha20Rng::seed_from_u64(24);
        let (_, mut transfer) = signed_transfer(&mut rng);
        transfer.signature.r = ark_ed_on_bn254::EdwardsAffine::new_unchecked(Fr::from(3u64), Fr::from(4u64));

        let account = Account {
            nonce: 1,
            balance: 100,
            index: 0,
            pubkey: transfer.sender_pubkey,
        };
        assert!(matches!(
            ensure_well_formed(&transfer, [&account; 4]),
            Err(SynthesisError::MalformedVerifyingKey)
        ));
    }
}
