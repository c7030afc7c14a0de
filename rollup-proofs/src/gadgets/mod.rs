//! Reusable sub-circuits: range checks, Poseidon, EdDSA, Merkle paths.

pub mod hash;
pub mod merkle;
pub mod range;
pub mod signature;
