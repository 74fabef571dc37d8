use puyo_core::{Grid, PiecePair};

use crate::chain::{resolve_chains, ChainOutcome};
use crate::collision::hard_drop;

/// Write the pair's on-grid cells into a copy of `grid`. Cells above the
/// field are discarded.
pub fn lock_pair(grid: &Grid, pair: &PiecePair) -> Grid {
    let mut next = *grid;
    for puyo in pair.cells() {
        if Grid::in_bounds(puyo.x, puyo.y) {
            next.set(puyo.x as usize, puyo.y as usize, Some(puyo.color));
        }
    }
    next
}

/// Drop the pair, lock it into a scratch grid and resolve the chain.
/// Returns the resting pair together with the outcome; `grid` is untouched.
pub fn simulate_placement(grid: &Grid, pair: &PiecePair) -> (PiecePair, ChainOutcome) {
    let landed = hard_drop(grid, pair);
    let locked = lock_pair(grid, &landed);
    (landed, resolve_chains(&locked))
}
