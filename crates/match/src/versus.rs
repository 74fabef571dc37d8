//! Local match against the placement search. The two rounds never touch
//! each other's state; only nuisance counts cross over.

use puyo_search::PlacementSearch;
use tracing::{debug, info};

use crate::config::RoundConfig;
use crate::round::{Round, RoundEvent, RoundInput};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Player,
    Cpu,
}

/// Events produced by both rounds during one step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchEvents {
    pub player: Vec<RoundEvent>,
    pub cpu: Vec<RoundEvent>,
}

pub struct CpuMatch {
    player: Round,
    cpu: Round,
    search: PlacementSearch,
    locks: u32,
}

impl CpuMatch {
    /// Both rounds use `config`; the CPU's seed is offset by one so the two
    /// sides are dealt different pairs.
    pub fn new(config: RoundConfig) -> Self {
        let cpu_config = RoundConfig {
            seed: config.seed.map(|seed| seed.wrapping_add(1)),
            ..config.clone()
        };
        Self::with_rounds(
            Round::new(config),
            Round::new(cpu_config),
            PlacementSearch::default(),
        )
    }

    pub fn with_rounds(player: Round, cpu: Round, search: PlacementSearch) -> Self {
        Self {
            player,
            cpu,
            search,
            locks: 0,
        }
    }

    pub fn player(&self) -> &Round {
        &self.player
    }

    pub fn cpu(&self) -> &Round {
        &self.cpu
    }

    /// Pairs the CPU has locked since the last (re)start.
    pub fn cpu_locks(&self) -> u32 {
        self.locks
    }

    pub fn is_over(&self) -> bool {
        self.player.is_game_over() || self.cpu.is_game_over()
    }

    /// Side still standing once the other has topped out.
    pub fn winner(&self) -> Option<Side> {
        match (self.player.is_game_over(), self.cpu.is_game_over()) {
            (true, false) => Some(Side::Cpu),
            (false, true) => Some(Side::Player),
            _ => None,
        }
    }

    /// Input for the human side.
    pub fn handle_player(&mut self, input: RoundInput) -> MatchEvents {
        let player = self.player.handle(input);
        transfer(&player, &mut self.cpu);
        MatchEvents {
            player,
            ..MatchEvents::default()
        }
    }

    /// One CPU step: while a pair is falling, choose a placement on a
    /// snapshot of the grid, move the pair there and tick it into a lock.
    pub fn tick_cpu(&mut self) -> Vec<RoundEvent> {
        if self.cpu.is_falling() {
            let snapshot = *self.cpu.grid();
            let chosen = self.search.choose_move(&snapshot, self.cpu.active());
            if !self.cpu.place_active(chosen) {
                debug!("cpu placement rejected");
            }
        }
        let events = self.cpu.handle(RoundInput::Tick);
        if events.contains(&RoundEvent::Locked) {
            self.locks += 1;
        }
        transfer(&events, &mut self.player);
        events
    }

    /// One tick for both sides.
    pub fn tick(&mut self) -> MatchEvents {
        let mut step = self.handle_player(RoundInput::Tick);
        step.cpu = self.tick_cpu();
        self.log_result();
        step
    }

    /// Finish any resolution in progress on either side.
    pub fn run_until_idle(&mut self) -> MatchEvents {
        let player = self.player.run_until_idle();
        transfer(&player, &mut self.cpu);
        let cpu = self.cpu.run_until_idle();
        transfer(&cpu, &mut self.player);
        MatchEvents { player, cpu }
    }

    pub fn restart(&mut self) -> MatchEvents {
        self.locks = 0;
        MatchEvents {
            player: self.player.handle(RoundInput::Restart),
            cpu: self.cpu.handle(RoundInput::Restart),
        }
    }

    fn log_result(&self) {
        if let Some(side) = self.winner() {
            info!(
                winner = ?side,
                player_score = self.player.score(),
                cpu_score = self.cpu.score(),
                "match decided"
            );
        }
    }
}

/// Hand every `SendNuisance` in `events` to the opposing round.
fn transfer(events: &[RoundEvent], opponent: &mut Round) {
    for event in events {
        if let RoundEvent::SendNuisance(units) = *event {
            opponent.handle(RoundInput::ReceiveNuisance(units));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puyo_core::Color;
    use puyo_engine::PairGenerator;

    #[test]
    fn test_cpu_locks_every_falling_tick() {
        let mut m = CpuMatch::new(RoundConfig::headless(11));
        let events = m.tick_cpu();
        assert_eq!(events.first(), Some(&RoundEvent::Locked));
        assert_eq!(m.cpu().grid().occupied_count(), 2);
        assert_eq!(m.cpu_locks(), 1);
    }

    #[test]
    fn test_nuisance_crosses_over() {
        let config = RoundConfig::headless(1);
        let cpu = Round::with_generator(
            config.clone(),
            PairGenerator::scripted(&[(Color::Yellow, Color::Yellow)]),
        );
        let mut m = CpuMatch::with_rounds(Round::new(config), cpu, PlacementSearch::default());
        // two yellow pairs on the floor pop as one group: all clear, 30 units
        let mut sent = 0;
        for _ in 0..8 {
            for event in m.tick_cpu() {
                if let RoundEvent::SendNuisance(units) = event {
                    sent += units;
                }
            }
        }
        assert_eq!(sent, 30);
        assert_eq!(m.player().pending(), 30);
    }

    #[test]
    fn test_match_runs_to_a_decision() {
        let mut m = CpuMatch::new(RoundConfig::headless(5));
        let mut ticks = 0;
        while !m.is_over() && ticks < 100_000 {
            m.tick();
            ticks += 1;
        }
        assert!(m.is_over());
        match m.winner() {
            Some(Side::Cpu) => assert!(!m.cpu().is_game_over()),
            Some(Side::Player) => assert!(!m.player().is_game_over()),
            None => assert!(m.cpu().is_game_over() && m.player().is_game_over()),
        }

        m.restart();
        assert!(!m.is_over());
        assert_eq!(m.cpu_locks(), 0);
        assert!(m.player().grid().is_empty());
    }
}
