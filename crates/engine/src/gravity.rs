//! Column compaction. Settled puyos fall straight down; there is no
//! cross-column movement.

use puyo_core::Grid;

/// Returns a compacted copy of `grid`. Each column keeps its top-to-bottom
/// order with the empties moved to the top. Idempotent.
pub fn apply_gravity(grid: &Grid) -> Grid {
    let mut next = *grid;
    for x in 0..Grid::WIDTH {
        let mut write_y = Grid::HEIGHT;
        for y in (0..Grid::HEIGHT).rev() {
            if let Some(color) = grid.get(x, y) {
                write_y -= 1;
                next.set(x, write_y, Some(color));
            }
        }
        for y in 0..write_y {
            next.set(x, y, None);
        }
    }
    next
}

/// True when no occupied cell sits above an empty one.
pub fn is_settled(grid: &Grid) -> bool {
    (0..Grid::WIDTH).all(|x| {
        let mut seen_puyo = false;
        (0..Grid::HEIGHT).all(|y| {
            let occupied = grid.is_occupied(x, y);
            let ok = occupied || !seen_puyo;
            seen_puyo |= occupied;
            ok
        })
    })
}
