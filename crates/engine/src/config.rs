use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::attack::{
    ALL_CLEAR_BONUS, ATTACK_DIVISOR, CELLS_PER_UNIT, CHAIN_POWER, CHAIN_SCORE_UNIT,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackConfig {
    pub chain_power: Vec<u32>,
    pub cells_per_unit: u32,
    pub divisor: u32,
    pub all_clear_bonus: u32,
    pub chain_score_unit: u32,
    /// Net outgoing attack against pending incoming units before sending.
    pub netting: bool,
}

impl AttackConfig {
    /// Two human players over the relay: outgoing attack offsets incoming.
    pub fn versus() -> Self {
        Self {
            chain_power: CHAIN_POWER.to_vec(),
            cells_per_unit: CELLS_PER_UNIT,
            divisor: ATTACK_DIVISOR,
            all_clear_bonus: ALL_CLEAR_BONUS,
            chain_score_unit: CHAIN_SCORE_UNIT,
            netting: true,
        }
    }

    /// Against the automated opponent: attacks are sent without netting.
    pub fn cpu_match() -> Self {
        Self {
            netting: false,
            ..Self::versus()
        }
    }
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self::versus()
    }
}

/// Pacing of a round. Pauses only exist so an observer can see the
/// intermediate grids; they never change the outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// One fall step while a pair is under control.
    pub fall_interval_ms: u64,
    /// After the locked pair is written, before the first connectivity pass.
    pub lock_pause_ms: u64,
    /// After each chain level's erase.
    pub erase_pause_ms: u64,
    /// After each chain level's gravity pass.
    pub settle_pause_ms: u64,
}

impl TimingConfig {
    pub fn standard() -> Self {
        Self {
            fall_interval_ms: 1000,
            lock_pause_ms: 50,
            erase_pause_ms: 300,
            settle_pause_ms: 300,
        }
    }

    /// No pauses at all, for simulation and tests.
    pub fn headless() -> Self {
        Self {
            fall_interval_ms: 0,
            lock_pause_ms: 0,
            erase_pause_ms: 0,
            settle_pause_ms: 0,
        }
    }

    pub fn fall_interval(&self) -> Duration {
        Duration::from_millis(self.fall_interval_ms)
    }

    pub fn lock_pause(&self) -> Duration {
        Duration::from_millis(self.lock_pause_ms)
    }

    pub fn erase_pause(&self) -> Duration {
        Duration::from_millis(self.erase_pause_ms)
    }

    pub fn settle_pause(&self) -> Duration {
        Duration::from_millis(self.settle_pause_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::standard()
    }
}
