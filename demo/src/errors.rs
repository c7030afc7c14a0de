use rollup_proofs::ZkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("bad configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Zk(#[from] ZkError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A check the demo expects to fail went through.
    #[error("unexpected outcome: {0}")]
    Unexpected(&'static str),
}
