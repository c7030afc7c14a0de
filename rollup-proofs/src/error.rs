use ark_relations::r1cs::SynthesisError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZkError {
    /// Circuit construction aborted (e.g. malformed key material reached the signature gadget).
    #[error("circuit synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    /// The witness does not satisfy the transfer relation. Deliberately carries no detail.
    #[error("witness does not satisfy the circuit")]
    Unsatisfiable,

    #[error("proof verification failed")]
    VerificationFailed,

    #[error("point is not on the curve or not in the prime-order subgroup")]
    InvalidPoint,

    #[error("public key is the identity point")]
    IdentityKey,

    #[error("signature scalar is not canonical")]
    InvalidScalar,

    #[error("leaf index {index} out of range for tree depth {depth}")]
    IndexOutOfRange { index: u64, depth: usize },

    #[error("no account at index {0}")]
    UnknownAccount(u64),

    #[error("account index {index} already occupied")]
    AccountExists { index: u64 },

    #[error("sender and receiver are the same account")]
    SelfTransfer,

    #[error("transfer nonce {got} does not match account nonce {expected}")]
    NonceMismatch { expected: u64, got: u64 },

    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u64 },

    #[error("balance overflow at account {index}")]
    BalanceOverflow { index: u64 },

    #[error("nonce exhausted at account {index}")]
    NonceExhausted { index: u64 },

    #[error("transfer public keys do not match the ledger accounts")]
    KeyMismatch,

    #[error("transfer signature does not verify")]
    InvalidSignature,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("arkworks error: {0}")]
    Ark(String),
}
