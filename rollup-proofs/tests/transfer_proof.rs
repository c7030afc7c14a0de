use ark_bn254::Fr;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rollup_proofs::groth16::{prove_transfer, setup_keys, verify_transfer_proof};
use rollup_proofs::hash::transfer_message;
use rollup_proofs::keys::SecretKey;
use rollup_proofs::types::{Account, Transfer};
use rollup_proofs::witness::AccountTree;
use rollup_proofs::ZkError;

const DEPTH: usize = 4;

#[test]
fn transfer_proof_end_to_end() {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let (pk, vk) = setup_keys::<DEPTH>(&mut rng).unwrap();

    let sender = SecretKey::random(&mut rng);
    let receiver = SecretKey::random(&mut rng);
    let mut ledger = AccountTree::<DEPTH>::new();
    ledger
        .insert(Account { nonce: 1, balance: 100, index: 0, pubkey: sender.public_key() })
        .unwrap();
    ledger
        .insert(Account { nonce: 0, balance: 50, index: 1, pubkey: receiver.public_key() })
        .unwrap();

    let mut transfer = Transfer {
        amount: 30,
        nonce: 1,
        sender_pubkey: sender.public_key(),
        receiver_pubkey: receiver.public_key(),
        signature: sender.sign(Fr::from(0u64), &mut rng),
    };
    transfer.signature = sender.sign(transfer_message(&transfer), &mut rng);

    let witness = ledger.apply_transfer(&transfer, 0, 1).unwrap();
    let (root_before, root_after) = (witness.root_before, witness.root_after);

    // Forged amount against the same balances.
    let mut forged = witness.clone();
    forged.transfer.amount = 31;
    forged.transfer.signature = sender.sign(transfer_message(&forged.transfer), &mut rng);
    assert!(matches!(
        prove_transfer(&mut rng, &pk, forged),
        Err(ZkError::Unsatisfiable)
    ));

    let proof = prove_transfer(&mut rng, &pk, witness).unwrap();
    verify_transfer_proof(&vk, &proof, root_before, root_after).unwrap();

    assert!(matches!(
        verify_transfer_proof(&vk, &proof, root_after, root_before),
        Err(ZkError::VerificationFailed)
    ));
    assert!(matches!(
        verify_transfer_proof(&vk, &proof, root_before, root_before),
        Err(ZkError::VerificationFailed)
    ));
}
