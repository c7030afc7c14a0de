use crate::errors::DemoError;
use crate::state::ProverState;
use ark_bn254::Fr;
use rollup_proofs::equation::evaluate;
use rollup_proofs::groth16::{prove_equation, setup_equation_keys, verify_equation_proof};
use rollup_proofs::types::FrHex;
use rollup_proofs::ZkError;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct EquationReport {
    y: FrHex,
    g1_elements: usize,
    g2_elements: usize,
    verified: bool,
    wrong_output_rejected: bool,
}

/// Prove knowledge of `x` with `x^3 + x + 5 == y` and print a JSON report.
pub async fn run(state: &ProverState, x: u64) -> Result<(), DemoError> {
    let mut rng = state.rng(1);

    let report = tokio::task::spawn_blocking(move || {
        let (pk, vk) = setup_equation_keys(&mut rng)?;
        let g1_elements = pk.a_query.len() + pk.b_g1_query.len() + pk.h_query.len() + pk.l_query.len();
        let g2_elements = pk.b_g2_query.len();
        info!(g1_elements, g2_elements, "equation proving key ready");

        let x = Fr::from(x);
        let y = evaluate(x);
        let proof = prove_equation(&mut rng, &pk, x, y)?;
        verify_equation_proof(&vk, &proof, y)?;

        let wrong_output_rejected = matches!(
            verify_equation_proof(&vk, &proof, y + Fr::from(1u64)),
            Err(ZkError::VerificationFailed)
        );

        Ok::<EquationReport, DemoError>(EquationReport {
            y: FrHex::from_fr(&y),
            g1_elements,
            g2_elements,
            verified: true,
            wrong_output_rejected,
        })
    })
    .await??;

    if !report.wrong_output_rejected {
        return Err(DemoError::Unexpected("equation proof accepted a wrong output"));
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
