//! Groth16 prover/verifier orchestration for the transfer and equation circuits.
//!
//! SECURITY NOTE (prototype): Groth16 requires a trusted setup that produces a proving key (PK)
//! and verifying key (VK). This prototype generates keys locally. In production, an MPC ceremony
//! (or a transparent system) should be used.

use crate::circuit::TransactionCircuit;
use crate::equation::EquationCircuit;
use crate::error::ZkError;
use crate::types::{FrHex, TransactionWitness, TransferPublicInputs};
use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_snark::SNARK;
use rand::RngCore;
use tracing::debug;

/// Convert the roots to the public-input vector expected by Groth16.
///
/// ORDERING MUST MATCH the circuit's `new_input` allocation order.
pub fn transfer_public_inputs_to_field_elems(root_before: Fr, root_after: Fr) -> Vec<Fr> {
    vec![root_before, root_after]
}

pub fn transfer_public_inputs_json(root_before: Fr, root_after: Fr) -> TransferPublicInputs {
    TransferPublicInputs {
        root_before: FrHex::from_fr(&root_before),
        root_after: FrHex::from_fr(&root_after),
    }
}

/// Run the circuit against a throwaway constraint system and report whether it is satisfied.
pub fn check_witness<C: ConstraintSynthesizer<Fr>>(circuit: C) -> Result<bool, ZkError> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit.generate_constraints(cs.clone())?;
    debug!(
        constraints = cs.num_constraints(),
        witnesses = cs.num_witness_variables(),
        instances = cs.num_instance_variables(),
        "circuit synthesized"
    );
    Ok(cs.is_satisfied()?)
}

fn setup<C: ConstraintSynthesizer<Fr>>(
    circuit: C,
    rng: &mut impl RngCore,
) -> Result<(ProvingKey<Bn254>, VerifyingKey<Bn254>), ZkError> {
    let pk = Groth16::<Bn254>::generate_random_parameters_with_reduction(circuit, rng)
        .map_err(|e| ZkError::Ark(format!("{e}")))?;

    let vk = pk.vk.clone();
    Ok((pk, vk))
}

fn prove<C: ConstraintSynthesizer<Fr> + Clone>(
    circuit: C,
    pk: &ProvingKey<Bn254>,
    rng: &mut impl RngCore,
) -> Result<Proof<Bn254>, ZkError> {
    // The prover does not check satisfiability itself; an unsatisfied witness would yield a
    // proof that merely fails to verify.
    if !check_witness(circuit.clone())? {
        return Err(ZkError::Unsatisfiable);
    }
    Groth16::<Bn254>::create_random_proof_with_reduction(circuit, pk, rng)
        .map_err(|e| ZkError::Ark(format!("{e}")))
}

fn verify(vk: &VerifyingKey<Bn254>, proof: &Proof<Bn254>, public_inputs: &[Fr]) -> Result<(), ZkError> {
    let ok = <Groth16<Bn254> as SNARK<Fr>>::verify(vk, public_inputs, proof)
        .map_err(|e| ZkError::Ark(format!("{e}")))?;
    if !ok {
        return Err(ZkError::VerificationFailed);
    }
    Ok(())
}

/// Generate a Groth16 keypair for the transfer circuit.
///
/// For a fixed `DEPTH`, this must be run once.
pub fn setup_keys<const DEPTH: usize>(
    rng: &mut impl RngCore,
) -> Result<(ProvingKey<Bn254>, VerifyingKey<Bn254>), ZkError> {
    // Constraints only depend on DEPTH.
    let keys = setup(TransactionCircuit::<DEPTH>::dummy(), rng)?;
    debug!(depth = DEPTH, "transfer keys generated");
    Ok(keys)
}

/// Prove one transfer.
///
/// Returns [`ZkError::Unsatisfiable`] without detail if the witness breaks any rule.
pub fn prove_transfer<const DEPTH: usize>(
    rng: &mut impl RngCore,
    pk: &ProvingKey<Bn254>,
    witness: TransactionWitness<DEPTH>,
) -> Result<Proof<Bn254>, ZkError> {
    let root_before = FrHex::from_fr(&witness.root_before);
    let root_after = FrHex::from_fr(&witness.root_after);

    let proof = prove(TransactionCircuit::new(witness), pk, rng)?;
    debug!(root_before = %root_before.hex, root_after = %root_after.hex, "transfer proved");
    Ok(proof)
}

/// Verify a transfer proof against the claimed state roots.
pub fn verify_transfer_proof(
    vk: &VerifyingKey<Bn254>,
    proof: &Proof<Bn254>,
    root_before: Fr,
    root_after: Fr,
) -> Result<(), ZkError> {
    verify(vk, proof, &transfer_public_inputs_to_field_elems(root_before, root_after))
}

pub fn setup_equation_keys(rng: &mut impl RngCore) -> Result<(ProvingKey<Bn254>, VerifyingKey<Bn254>), ZkError> {
    setup(EquationCircuit::from_x(Fr::from(0u64)), rng)
}

/// Prove knowledge of `x` for the public `y`.
pub fn prove_equation(
    rng: &mut impl RngCore,
    pk: &ProvingKey<Bn254>,
    x: Fr,
    y: Fr,
) -> Result<Proof<Bn254>, ZkError> {
    prove(EquationCircuit { x, y }, pk, rng)
}

pub fn verify_equation_proof(vk: &VerifyingKey<Bn254>, proof: &Proof<Bn254>, y: Fr) -> Result<(), ZkError> {
    verify(vk, proof, &[y])
}
