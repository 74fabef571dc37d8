//! Nuisance economy: netting outgoing attack against pending incoming units,
//! and dropping pending units onto the grid as filler puyos.

use puyo_core::{Color, Grid};

use crate::rng::GameRng;

/// Outcome of netting one chain resolution's attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Settlement {
    /// Incoming units still owed to this round.
    pub pending: u32,
    /// Units to send to the opponent.
    pub send: u32,
}

/// Net `outgoing` against `pending`. Without netting the full outgoing
/// amount is sent and the pending count is left untouched.
pub fn settle_attack(pending: u32, outgoing: u32, netting: bool) -> Settlement {
    if !netting {
        return Settlement {
            pending,
            send: outgoing,
        };
    }

    let net = i64::from(pending) - i64::from(outgoing);
    if net < 0 {
        Settlement {
            pending: 0,
            send: net.unsigned_abs() as u32,
        }
    } else {
        Settlement {
            pending: net as u32,
            send: 0,
        }
    }
}

/// Incoming counts from outside are not trusted; negatives become zero.
pub fn clamp_incoming(raw: i64) -> u32 {
    raw.clamp(0, i64::from(u32::MAX)) as u32
}

/// Drop `units` nuisance puyos, each into the lowest empty row of a
/// uniformly random column. Units landing on a full column are skipped.
/// Returns how many were placed.
pub fn materialize(grid: &mut Grid, units: u32, rng: &mut GameRng) -> u32 {
    let mut placed = 0;
    for _ in 0..units {
        let x = rng.gen_range(0..Grid::WIDTH);
        if let Some(y) = grid.lowest_empty_row(x) {
            grid.set(x, y, Some(Color::Nuisance));
            placed += 1;
        }
    }
    placed
}
