mod config;
mod equation;
mod errors;
mod rollup;
mod state;

use crate::config::{DemoConfig, RunMode};
use crate::errors::DemoError;
use crate::state::ProverState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DemoError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DemoConfig::from_env()?;
    tracing::info!(run = ?config.run, seed = config.seed, "demo starting");

    let state = ProverState::new(config.seed);

    if matches!(config.run, RunMode::All | RunMode::Equation) {
        equation::run(&state, config.equation_x).await?;
    }
    if matches!(config.run, RunMode::All | RunMode::Rollup) {
        rollup::run(&state).await?;
    }

    tracing::info!("demo finished");
    Ok(())
}
