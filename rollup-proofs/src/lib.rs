//! ZK layer for a single-transfer account rollup.
//!
//! This crate contains:
//! - A SNARK circuit proving that one signed transfer moves the account tree from a public
//!   `root_before` to a public `root_after`.
//! - Host-side twins of every in-circuit computation (Poseidon, EdDSA over Baby Jubjub, the
//!   account Merkle tree) and a ledger that builds transfer witnesses.
//! - Prover + verifier orchestration, and a toy equation circuit.

pub mod circuit;
pub mod constants;
pub mod equation;
pub mod error;
pub mod gadgets;
pub mod groth16;
pub mod hash;
pub mod keys;
pub mod merkle;
pub mod types;
pub mod witness;

pub use error::ZkError;
