use crate::errors::DemoError;
use crate::state::{ProverState, DEMO_TREE_DEPTH};
use ark_bn254::Fr;
use rollup_proofs::groth16::{prove_transfer, transfer_public_inputs_json, verify_transfer_proof};
use rollup_proofs::hash::transfer_message;
use rollup_proofs::keys::SecretKey;
use rollup_proofs::types::{Account, Transfer, TransactionWitness};
use rollup_proofs::witness::AccountTree;
use rollup_proofs::ZkError;
use tracing::{info, warn};

/// Sender {nonce 1, balance 100} at index 0 pays 30 to receiver {nonce 0, balance 50} at index 1.
fn reference_transfer(state: &ProverState) -> Result<(SecretKey, TransactionWitness<DEMO_TREE_DEPTH>), DemoError> {
    let mut rng = state.rng(2);
    let sender = SecretKey::random(&mut rng);
    let receiver = SecretKey::random(&mut rng);

    let mut ledger = AccountTree::<DEMO_TREE_DEPTH>::new();
    ledger.insert(Account {
        nonce: 1,
        balance: 100,
        index: 0,
        pubkey: sender.public_key(),
    })?;
    ledger.insert(Account {
        nonce: 0,
        balance: 50,
        index: 1,
        pubkey: receiver.public_key(),
    })?;

    let mut transfer = Transfer {
        amount: 30,
        nonce: 1,
        sender_pubkey: sender.public_key(),
        receiver_pubkey: receiver.public_key(),
        signature: sender.sign(Fr::from(0u64), &mut rng),
    };
    transfer.signature = sender.sign(transfer_message(&transfer), &mut rng);

    let witness = ledger.apply_transfer(&transfer, 0, 1)?;
    Ok((sender, witness))
}

/// Honest proof verifies; a forged amount cannot be proven; wrong roots are rejected.
pub async fn run(state: &ProverState) -> Result<(), DemoError> {
    let keys = state.ensure_keys().await?;
    let (sender, witness) = reference_transfer(state)?;
    let (root_before, root_after) = (witness.root_before, witness.root_after);

    println!(
        "{}",
        serde_json::to_string_pretty(&transfer_public_inputs_json(root_before, root_after))?
    );

    // Same balances, re-signed for 31.
    let mut forged = witness.clone();
    forged.transfer.amount = 31;
    let mut rng = state.rng(3);
    forged.transfer.signature = sender.sign(transfer_message(&forged.transfer), &mut rng);

    let pk = keys.pk.clone();
    let (proof, forged_result) = tokio::task::spawn_blocking(move || {
        let forged_result = prove_transfer(&mut rng, &pk, forged);
        let proof = prove_transfer(&mut rng, &pk, witness)?;
        Ok::<_, DemoError>((proof, forged_result))
    })
    .await??;

    verify_transfer_proof(&keys.vk, &proof, root_before, root_after)?;
    info!("honest transfer proof verified");

    match forged_result {
        Err(ZkError::Unsatisfiable) => info!("forged amount rejected by the prover"),
        Err(e) => return Err(e.into()),
        Ok(_) => return Err(DemoError::Unexpected("forged transfer produced a proof")),
    }

    for (label, before, after) in [
        ("swapped roots", root_after, root_before),
        ("unchanged root", root_before, root_before),
    ] {
        match verify_transfer_proof(&keys.vk, &proof, before, after) {
            Err(ZkError::VerificationFailed) => info!(case = label, "proof rejected for wrong roots"),
            Err(e) => return Err(e.into()),
            Ok(()) => {
                warn!(case = label, "proof accepted for wrong roots");
                return Err(DemoError::Unexpected("proof verified against wrong roots"));
            }
        }
    }

    Ok(())
}
