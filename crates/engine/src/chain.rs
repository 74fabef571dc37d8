//! Chain resolution: connectivity and gravity alternated until nothing pops.

use puyo_core::Grid;
use tracing::trace;

use crate::config::AttackConfig;
use crate::connect::resolve_connections;
use crate::gravity::apply_gravity;

/// One observable stage of a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainStep {
    /// Groups were erased, leaving holes. `level` is 1-based.
    Erased { level: u32, erased: u32 },
    /// Gravity compacted the grid after the erase at `level`.
    Settled { level: u32 },
    /// A connectivity pass found nothing to erase.
    Finished,
}

/// Final state of a fully resolved chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainOutcome {
    pub grid: Grid,
    pub chain_count: u32,
    pub total_erased: u32,
    /// At least one level popped and the grid ended up empty.
    pub all_clear: bool,
}

impl ChainOutcome {
    pub fn score(&self, config: &AttackConfig) -> u64 {
        crate::attack::total_chain_score(self.chain_count, config)
    }

    pub fn outgoing(&self, config: &AttackConfig) -> u32 {
        crate::attack::outgoing_attack(
            self.chain_count,
            self.total_erased,
            self.all_clear,
            config,
        )
    }
}

/// Drives a chain one stage at a time so callers can observe (and pace)
/// every intermediate grid.
#[derive(Clone, Debug)]
pub struct ChainStepper {
    grid: Grid,
    chain_count: u32,
    total_erased: u32,
    needs_gravity: bool,
    finished: bool,
}

impl ChainStepper {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            chain_count: 0,
            total_erased: 0,
            needs_gravity: false,
            finished: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn chain_count(&self) -> u32 {
        self.chain_count
    }

    pub fn total_erased(&self) -> u32 {
        self.total_erased
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn step(&mut self) -> ChainStep {
        if self.finished {
            return ChainStep::Finished;
        }

        if self.needs_gravity {
            self.grid = apply_gravity(&self.grid);
            self.needs_gravity = false;
            return ChainStep::Settled {
                level: self.chain_count,
            };
        }

        let pass = resolve_connections(&self.grid);
        if !pass.any_erased {
            self.finished = true;
            return ChainStep::Finished;
        }

        self.chain_count += 1;
        self.total_erased += pass.erased_count;
        self.grid = pass.grid;
        self.needs_gravity = true;
        trace!(
            level = self.chain_count,
            erased = pass.erased_count,
            groups = pass.groups,
            "chain level"
        );
        ChainStep::Erased {
            level: self.chain_count,
            erased: pass.erased_count,
        }
    }

    /// Runs any remaining stages and returns the outcome.
    pub fn finish(mut self) -> ChainOutcome {
        while self.step() != ChainStep::Finished {}
        ChainOutcome {
            grid: self.grid,
            chain_count: self.chain_count,
            total_erased: self.total_erased,
            all_clear: self.chain_count > 0 && self.grid.is_empty(),
        }
    }
}

/// Resolve a grid to completion without pacing.
pub fn resolve_chains(grid: &Grid) -> ChainOutcome {
    ChainStepper::new(*grid).finish()
}
