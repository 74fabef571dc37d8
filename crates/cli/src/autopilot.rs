use puyo_core::PiecePair;
use puyo_match::{Command, Round, RoundEvent};
use puyo_search::PlacementSearch;

/// Steers a round through player commands toward the placement the search
/// picks, one command per call.
pub struct Autopilot {
    search: PlacementSearch,
    target: Option<PiecePair>,
    blocked: bool,
}

impl Autopilot {
    pub fn new(search: PlacementSearch) -> Self {
        Self {
            search,
            target: None,
            blocked: false,
        }
    }

    pub fn next_command(&mut self, round: &Round) -> Option<Command> {
        if !round.is_falling() {
            return None;
        }
        if self.blocked {
            return Some(Command::SoftDrop);
        }
        let active = *round.active();
        let target = *self
            .target
            .get_or_insert_with(|| self.search.choose_move(round.grid(), &active));
        Some(steer(&active, &target))
    }

    /// Feed back what the last command or tick produced.
    pub fn observe(&mut self, command: Option<Command>, events: &[RoundEvent]) {
        if events.contains(&RoundEvent::Spawned) {
            self.target = None;
            self.blocked = false;
            return;
        }
        // a refused move or rotation means the target is out of reach
        if matches!(command, Some(c) if c != Command::SoftDrop) && events.is_empty() {
            self.blocked = true;
        }
    }
}

fn steer(active: &PiecePair, target: &PiecePair) -> Command {
    if active.rotation() != target.rotation() {
        Command::Rotate
    } else if active.axis.x < target.axis.x {
        Command::MoveRight
    } else if active.axis.x > target.axis.x {
        Command::MoveLeft
    } else {
        Command::SoftDrop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puyo_core::{Color, Rotation};

    #[test]
    fn test_steer_rotates_first() {
        let active = PiecePair::spawn(Color::Red, Color::Blue);
        let target = active.with_rotation(Rotation::East).at_column(4);
        assert_eq!(steer(&active, &target), Command::Rotate);
        let rotated = active.with_rotation(Rotation::East);
        assert_eq!(steer(&rotated, &target), Command::MoveRight);
        assert_eq!(steer(&target, &target), Command::SoftDrop);
    }

    #[test]
    fn test_blocked_pilot_drops() {
        let mut pilot = Autopilot::new(PlacementSearch::default());
        pilot.observe(Some(Command::MoveLeft), &[]);
        let round = Round::new(puyo_match::RoundConfig::headless(1));
        assert_eq!(pilot.next_command(&round), Some(Command::SoftDrop));
        pilot.observe(None, &[RoundEvent::Locked, RoundEvent::Spawned]);
        assert_ne!(pilot.next_command(&round), None);
    }
}
