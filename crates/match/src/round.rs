//! One player's round: grid, active pair, next queue, score and pending
//! nuisance, advanced only through [`Round::handle`].
//!
//! Locking hands the grid to a [`ChainStepper`]; every tick while resolving
//! performs one observable stage, so a real-time driver can pause between
//! them and a headless driver can call [`Round::run_until_idle`].

use std::time::Duration;

use puyo_core::{Grid, NextQueue, PiecePair};
use puyo_engine::{
    chain_score, fits, lock_pair, materialize, outgoing_attack, settle_attack, try_drop,
    try_move, try_rotate, ChainStep, ChainStepper, GameRng, PairGenerator,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::RoundConfig;

/// Column and row of the cell whose occupancy after a lock ends the round.
pub const GAME_OVER_CELL: (usize, usize) = (2, 0);

/// Player commands. Edge-triggered: one input, one attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDrop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundInput {
    Tick,
    Command(Command),
    ReceiveNuisance(u32),
    OpponentDisconnected,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEvent {
    /// The active pair changed position or rotation.
    Moved,
    Locked,
    ChainLevel { level: u32, erased: u32 },
    Settled { level: u32 },
    AllClear,
    SendNuisance(u32),
    NuisanceDropped(u32),
    Spawned,
    GameOver,
}

#[derive(Clone, Debug)]
enum Phase {
    Falling,
    Resolving { stepper: ChainStepper, pause: Duration },
    GameOver,
}

pub struct Round {
    config: RoundConfig,
    /// Injected generator, cloned fresh on restart. `None` means seeded
    /// from `config.seed`.
    template: Option<PairGenerator>,
    generator: PairGenerator,
    nuisance_rng: GameRng,
    grid: Grid,
    active: PiecePair,
    queue: NextQueue,
    score: u64,
    pending: u32,
    phase: Phase,
}

impl Round {
    pub fn new(config: RoundConfig) -> Self {
        let (generator, nuisance_rng) = seeded_sources(config.seed);
        Self::build(config, None, generator, nuisance_rng)
    }

    /// Round dealing pairs from `generator` instead of the seeded random
    /// source. Nuisance columns still follow `config.seed`.
    pub fn with_generator(config: RoundConfig, generator: PairGenerator) -> Self {
        let (_, nuisance_rng) = seeded_sources(config.seed);
        Self::build(config, Some(generator.clone()), generator, nuisance_rng)
    }

    fn build(
        config: RoundConfig,
        template: Option<PairGenerator>,
        mut generator: PairGenerator,
        nuisance_rng: GameRng,
    ) -> Self {
        let active = generator.next_pair();
        let queue = generator.fill_queue();
        Self {
            config,
            template,
            generator,
            nuisance_rng,
            grid: Grid::new(),
            active,
            queue,
            score: 0,
            pending: 0,
            phase: Phase::Falling,
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> &PiecePair {
        &self.active
    }

    pub fn queue(&self) -> &NextQueue {
        &self.queue
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.phase, Phase::Resolving { .. })
    }

    /// True while a pair is under control.
    pub fn is_falling(&self) -> bool {
        matches!(self.phase, Phase::Falling)
    }

    /// Grid with the active pair drawn over it while one is falling.
    pub fn display_grid(&self) -> Grid {
        if self.is_falling() {
            lock_pair(&self.grid, &self.active)
        } else {
            self.grid
        }
    }

    /// How long a real-time driver should wait before the next tick.
    /// `None` once the round is over.
    pub fn next_delay(&self) -> Option<Duration> {
        match &self.phase {
            Phase::Falling => Some(self.config.timing.fall_interval()),
            Phase::Resolving { pause, .. } => Some(*pause),
            Phase::GameOver => None,
        }
    }

    pub fn handle(&mut self, input: RoundInput) -> Vec<RoundEvent> {
        let mut events = Vec::new();
        match input {
            RoundInput::Tick => match self.phase {
                Phase::Falling => self.fall(&mut events),
                Phase::Resolving { .. } => self.advance_resolution(&mut events),
                Phase::GameOver => {}
            },
            RoundInput::Command(command) => {
                if self.is_falling() {
                    self.apply_command(command, &mut events);
                }
            }
            RoundInput::ReceiveNuisance(units) => {
                if !self.is_game_over() {
                    self.pending = self.pending.saturating_add(units);
                    debug!(units, pending = self.pending, "nuisance received");
                }
            }
            RoundInput::OpponentDisconnected => {
                if !self.is_game_over() {
                    info!("opponent disconnected");
                    self.end(&mut events);
                }
            }
            RoundInput::Restart => self.restart(&mut events),
        }
        events
    }

    /// Ticks until the current resolution has finished.
    pub fn run_until_idle(&mut self) -> Vec<RoundEvent> {
        let mut events = Vec::new();
        while self.is_resolving() {
            self.advance_resolution(&mut events);
        }
        events
    }

    /// Teleport the active pair, e.g. to a resting position chosen by the
    /// placement search. Rejected unless falling and `pair` fits.
    pub fn place_active(&mut self, pair: PiecePair) -> bool {
        if !self.is_falling() || !fits(&self.grid, &pair) {
            return false;
        }
        self.active = pair;
        true
    }

    fn apply_command(&mut self, command: Command, events: &mut Vec<RoundEvent>) {
        let moved = match command {
            Command::MoveLeft => try_move(&self.grid, &self.active, -1),
            Command::MoveRight => try_move(&self.grid, &self.active, 1),
            Command::Rotate => try_rotate(&self.grid, &self.active),
            Command::SoftDrop => return self.fall(events),
        };
        if let Some(pair) = moved {
            self.active = pair;
            events.push(RoundEvent::Moved);
        }
    }

    fn fall(&mut self, events: &mut Vec<RoundEvent>) {
        match try_drop(&self.grid, &self.active) {
            Some(pair) => {
                trace!(y = pair.axis.y, "fall");
                self.active = pair;
                events.push(RoundEvent::Moved);
            }
            None => self.lock(events),
        }
    }

    fn lock(&mut self, events: &mut Vec<RoundEvent>) {
        self.grid = lock_pair(&self.grid, &self.active);
        events.push(RoundEvent::Locked);
        debug!(
            x = self.active.axis.x,
            rotation = ?self.active.rotation(),
            "pair locked"
        );

        let (x, y) = GAME_OVER_CELL;
        if self.grid.is_occupied(x, y) {
            self.end(events);
            return;
        }

        self.phase = Phase::Resolving {
            stepper: ChainStepper::new(self.grid),
            pause: self.config.timing.lock_pause(),
        };
    }

    fn advance_resolution(&mut self, events: &mut Vec<RoundEvent>) {
        let Phase::Resolving { stepper, pause } = &mut self.phase else {
            return;
        };

        match stepper.step() {
            ChainStep::Erased { level, erased } => {
                self.grid = *stepper.grid();
                self.score += chain_score(level, &self.config.attack);
                *pause = self.config.timing.erase_pause();
                events.push(RoundEvent::ChainLevel { level, erased });
            }
            ChainStep::Settled { level } => {
                self.grid = *stepper.grid();
                *pause = self.config.timing.settle_pause();
                events.push(RoundEvent::Settled { level });
            }
            ChainStep::Finished => {
                let chain_count = stepper.chain_count();
                let total_erased = stepper.total_erased();
                self.finish_resolution(chain_count, total_erased, events);
            }
        }
    }

    fn finish_resolution(
        &mut self,
        chain_count: u32,
        total_erased: u32,
        events: &mut Vec<RoundEvent>,
    ) {
        let all_clear = chain_count > 0 && self.grid.is_empty();
        if all_clear {
            events.push(RoundEvent::AllClear);
        }

        let attack = &self.config.attack;
        let outgoing = outgoing_attack(chain_count, total_erased, all_clear, attack);
        let settlement = settle_attack(self.pending, outgoing, attack.netting);
        self.pending = settlement.pending;
        if chain_count > 0 {
            debug!(
                chain = chain_count,
                erased = total_erased,
                outgoing,
                send = settlement.send,
                pending = self.pending,
                "chain resolved"
            );
        }
        if settlement.send > 0 {
            events.push(RoundEvent::SendNuisance(settlement.send));
        }

        if self.pending > 0 {
            let placed = materialize(&mut self.grid, self.pending, &mut self.nuisance_rng);
            debug!(pending = self.pending, placed, "nuisance dropped");
            self.pending = 0;
            events.push(RoundEvent::NuisanceDropped(placed));
        }

        self.spawn(events);
    }

    fn spawn(&mut self, events: &mut Vec<RoundEvent>) {
        let fresh = self.generator.next_pair();
        self.active = self.queue.advance(fresh);
        self.phase = Phase::Falling;
        events.push(RoundEvent::Spawned);
    }

    fn end(&mut self, events: &mut Vec<RoundEvent>) {
        self.phase = Phase::GameOver;
        info!(score = self.score, "game over");
        events.push(RoundEvent::GameOver);
    }

    fn restart(&mut self, events: &mut Vec<RoundEvent>) {
        let (seeded, nuisance_rng) = seeded_sources(self.config.seed);
        let generator = self.template.clone().unwrap_or(seeded);
        *self = Self::build(self.config.clone(), self.template.take(), generator, nuisance_rng);
        debug!(seed = ?self.config.seed, "round restarted");
        events.push(RoundEvent::Spawned);
    }
}

/// Pair generator and nuisance RNG, as independent streams of one seed.
fn seeded_sources(seed: Option<u64>) -> (PairGenerator, GameRng) {
    let mut root = seed.map_or_else(GameRng::from_entropy, GameRng::new);
    let pairs = root.fork();
    let nuisance = root.fork();
    (PairGenerator::random(pairs), nuisance)
}
