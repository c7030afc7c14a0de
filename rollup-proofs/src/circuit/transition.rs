//! Balance/nonce transition between the before and after account states.

use super::AccountVar;
use crate::gadgets::range::{constrain_u64, enforce_less_or_equal};
use ark_bn254::Fr;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;

/// Enforce a well-formed debit of `amount` from the sender and credit to the receiver.
///
/// - sender nonce increments by one, receiver nonce is unchanged
/// - `amount <= sender_before.balance`
/// - balances move by exactly `amount`, and the receiver's new balance still fits in a u64
/// - public keys and leaf indices are unchanged
///
/// A bad transition is never an error here: it leaves the constraint system unsatisfiable.
pub fn enforce_transition(
    sender_before: &AccountVar,
    receiver_before: &AccountVar,
    sender_after: &AccountVar,
    receiver_after: &AccountVar,
    amount: &FpVar<Fr>,
) -> Result<(), SynthesisError> {
    (&sender_before.nonce + FpVar::one()).enforce_equal(&sender_after.nonce)?;
    receiver_before.nonce.enforce_equal(&receiver_after.nonce)?;

    constrain_u64(amount)?;
    constrain_u64(&sender_before.balance)?;
    constrain_u64(&receiver_before.balance)?;
    enforce_less_or_equal(amount, &sender_before.balance)?;

    (&sender_before.balance - amount).enforce_equal(&sender_after.balance)?;
    (&receiver_before.balance + amount).enforce_equal(&receiver_after.balance)?;
    constrain_u64(&receiver_after.balance)?;

    sender_before.pubkey.enforce_equal(&sender_after.pubkey)?;
    receiver_before.pubkey.enforce_equal(&receiver_after.pubkey)?;

    sender_before.index.enforce_equal(&sender_after.index)?;
    receiver_before.index.enforce_equal(&receiver_after.index)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SecretKey;
    use crate::types::Account;
    use ark_relations::r1cs::{ConstraintSystem, ConstraintSystemRef};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    struct Case {
        sender_before: Account,
        receiver_before: Account,
        sender_after: Account,
        receiver_after: Account,
        amount: u64,
    }

    fn reference_case() -> Case {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let sender_pk = SecretKey::random(&mut rng).public_key();
        let receiver_pk = SecretKey::random(&mut rng).public_key();
        let account = |nonce, balance, index, pubkey| Account { nonce, balance, index, pubkey };

        Case {
            sender_before: account(1, 100, 0, sender_pk),
            receiver_before: account(0, 50, 1, receiver_pk),
            sender_after: account(2, 70, 0, sender_pk),
            receiver_after: account(0, 80, 1, receiver_pk),
            amount: 30,
        }
    }

    fn satisfied_with(case: &Case, tweak: impl FnOnce(&ConstraintSystemRef<Fr>, &mut [AccountVar; 4])) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let alloc = |a: &Account| AccountVar::new_witness(cs.clone(), a).unwrap();
        let mut vars = [
            alloc(&case.sender_before),
            alloc(&case.receiver_before),
            alloc(&case.sender_after),
            alloc(&case.receiver_after),
        ];
        tweak(&cs, &mut vars);
        let amount = FpVar::new_witness(cs.clone(), || Ok(Fr::from(case.amount))).unwrap();

        let [sender_before, receiver_before, sender_after, receiver_after] = &vars;
        enforce_transition(sender_before, receiver_before, sender_after, receiver_after, &amount).unwrap();
        cs.is_satisfied().unwrap()
    }

    fn satisfied(case: &Case) -> bool {
        satisfied_with(case, |_, _| {})
    }

    #[test]
    fn reference_transfer() {
        assert!(satisfied(&reference_case()));
    }

    #[test]
    fn amount_must_match_balance_delta() {
        let mut case = reference_case();
        case.amount = 31;
        assert!(!satisfied(&case));
    }

    #[test]
    fn zero_amount_still_bumps_nonce() {
        let mut case = reference_case();
        case.amount = 0;
        case.sender_after.balance = 100;
        case.receiver_after.balance = 50;
        assert!(satisfied(&case));

        case.sender_after.nonce = 1;
        assert!(!satisfied(&case));
    }

    #[test]
    fn overdraft() {
        let mut case = reference_case();
        case.amount = 101;
        case.receiver_after.balance = 151;
        assert!(!satisfied(&case));

        // Conservation alone holds in the field (100 - 101 = p - 1); only the range check rejects it.
        assert!(!satisfied_with(&case, |cs, vars| {
            vars[2].balance = FpVar::new_witness(cs.clone(), || Ok(Fr::from(100u64) - Fr::from(101u64))).unwrap();
        }));
    }

    #[test]
    fn whole_balance() {
        let mut case = reference_case();
        case.amount = 100;
        case.sender_after.balance = 0;
        case.receiver_after.balance = 150;
        assert!(satisfied(&case));
    }

    #[test]
    fn nonce_rules() {
        let mut case = reference_case();
        case.sender_after.nonce = 3;
        assert!(!satisfied(&case));

        let mut case = reference_case();
        case.receiver_after.nonce = 1;
        assert!(!satisfied(&case));
    }

    #[test]
    fn keys_and_indices_are_immutable() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let stranger = SecretKey::random(&mut rng).public_key();

        let mut case = reference_case();
        case.sender_after.pubkey = stranger;
        assert!(!satisfied(&case));

        let mut case = reference_case();
        case.receiver_after.pubkey = stranger;
        assert!(!satisfied(&case));

        let mut case = reference_case();
        case.sender_after.index = 2;
        assert!(!satisfied(&case));
    }

    #[test]
    fn receiver_overflow() {
        let mut case = reference_case();
        case.receiver_before.balance = u64::MAX - 10;

        assert!(!satisfied_with(&case, |cs, vars| {
            let credited = Fr::from(u64::MAX - 10) + Fr::from(30u64);
            vars[3].balance = FpVar::new_witness(cs.clone(), || Ok(credited)).unwrap();
        }));
    }
}
