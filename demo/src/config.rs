use crate::errors::DemoError;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    All,
    Equation,
    Rollup,
}

impl FromStr for RunMode {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "equation" => Ok(Self::Equation),
            "rollup" => Ok(Self::Rollup),
            other => Err(DemoError::Config(format!("ROLLUP_DEMO_RUN: unknown mode {other:?}"))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub run: RunMode,
    /// Seed for every RNG the demo uses, including key setup.
    pub seed: u64,
    pub equation_x: u64,
}

impl DemoConfig {
    pub fn from_env() -> Result<Self, DemoError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DemoError> {
        let run = lookup("ROLLUP_DEMO_RUN").unwrap_or_else(|| "all".to_string()).parse()?;
        let seed = parse_u64(&lookup, "ROLLUP_DEMO_SEED", 42)?;
        let equation_x = parse_u64(&lookup, "EQUATION_DEMO_X", 3)?;
        Ok(Self { run, seed, equation_x })
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64, DemoError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| DemoError::Config(format!("{key}: {raw:?}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<DemoConfig, DemoError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        DemoConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.run, RunMode::All);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.equation_x, 3);
    }

    #[test]
    fn overrides() {
        let cfg = config(&[("ROLLUP_DEMO_RUN", "rollup"), ("ROLLUP_DEMO_SEED", "7")]).unwrap();
        assert_eq!(cfg.run, RunMode::Rollup);
        assert_eq!(cfg.seed, 7);
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(config(&[("ROLLUP_DEMO_RUN", "both")]), Err(DemoError::Config(_))));
        assert!(matches!(config(&[("EQUATION_DEMO_X", "-1")]), Err(DemoError::Config(_))));
    }
}
