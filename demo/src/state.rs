use crate::errors::DemoError;
use ark_bn254::Bn254;
use ark_groth16::{ProvingKey, VerifyingKey};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rollup_proofs::groth16::setup_keys;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Tree depth the demo's keys are generated for.
pub const DEMO_TREE_DEPTH: usize = rollup_proofs::constants::DEFAULT_TREE_DEPTH;

#[derive(Clone)]
pub struct ProverState {
    seed: u64,
    keys: Arc<OnceCell<ZkKeys>>,
}

#[derive(Clone)]
pub struct ZkKeys {
    pub pk: Arc<ProvingKey<Bn254>>,
    pub vk: Arc<VerifyingKey<Bn254>>,
}

impl ProverState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            keys: Arc::new(OnceCell::new()),
        }
    }

    /// Deterministic RNG for one stage of the demo.
    pub fn rng(&self, stage: u64) -> ChaCha20Rng {
        let mut seed = [0u8; 32];
        seed[0..8].copy_from_slice(&self.seed.to_le_bytes());
        seed[8..16].copy_from_slice(&stage.to_le_bytes());
        ChaCha20Rng::from_seed(seed)
    }

    /// Transfer-circuit keys, generated on first use.
    ///
    /// This runs the trusted setup (prototype) off the async runtime. Keys are kept in memory only.
    pub async fn ensure_keys(&self) -> Result<ZkKeys, DemoError> {
        let mut rng = self.rng(0);

        self.keys
            .get_or_try_init(|| async move {
                tokio::task::spawn_blocking(move || {
                    info!(depth = DEMO_TREE_DEPTH, "running transfer circuit setup");
                    let (pk, vk) = setup_keys::<DEMO_TREE_DEPTH>(&mut rng)?;
                    Ok::<ZkKeys, DemoError>(ZkKeys { pk: Arc::new(pk), vk: Arc::new(vk) })
                })
                .await?
            })
            .await
            .cloned()
    }
}
