use std::fs;
use std::path::Path;

use puyo_engine::{AttackConfig, TimingConfig};
use serde::{Deserialize, Serialize};

use crate::error::MatchResult;

/// Everything one round needs besides its inputs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub attack: AttackConfig,
    pub timing: TimingConfig,
    /// Fixed seed for piece colors and nuisance columns. `None` draws one
    /// from OS entropy every time the round is (re)started.
    pub seed: Option<u64>,
}

impl RoundConfig {
    /// Human-vs-human relay rules at real-time pacing.
    pub fn versus() -> Self {
        Self {
            attack: AttackConfig::versus(),
            timing: TimingConfig::standard(),
            seed: None,
        }
    }

    /// Rules for a round facing the automated opponent.
    pub fn cpu_match() -> Self {
        Self {
            attack: AttackConfig::cpu_match(),
            ..Self::versus()
        }
    }

    /// Zero pauses and a fixed seed, for tests and batch runs.
    pub fn headless(seed: u64) -> Self {
        Self {
            timing: TimingConfig::headless(),
            seed: Some(seed),
            ..Self::versus()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> MatchResult<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
