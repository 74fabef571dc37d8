//! Player commands on the active pair. Rejected moves return `None` and the
//! caller keeps its previous state.

use crate::collision::fits;
use puyo_core::{Grid, PiecePair};

/// Shift both cells horizontally by `dx`.
pub fn try_move(grid: &Grid, pair: &PiecePair, dx: i8) -> Option<PiecePair> {
    let moved = pair.shifted(dx, 0);
    fits(grid, &moved).then_some(moved)
}

/// Rotate the child 90 degrees clockwise about the axis. No kicks.
pub fn try_rotate(grid: &Grid, pair: &PiecePair) -> Option<PiecePair> {
    let rotated = pair.rotated_cw();
    fits(grid, &rotated).then_some(rotated)
}

/// One row down.
pub fn try_drop(grid: &Grid, pair: &PiecePair) -> Option<PiecePair> {
    let dropped = pair.shifted(0, 1);
    fits(grid, &dropped).then_some(dropped)
}
