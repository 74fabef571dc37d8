//! Same-color group detection and erasure.
//!
//! One pass only: groups are found on the grid as given and erased together.
//! Repeating until nothing pops is the chain stepper's job.

use puyo_core::Grid;

/// Smallest group that pops.
pub const MIN_GROUP_SIZE: u32 = 4;

// visited/erase sets are single u128 bitmaps indexed by y * WIDTH + x
const _: () = assert!(Grid::CELLS <= 128);

const NEIGHBOURS_4: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Result of a single connectivity pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connections {
    /// Grid with every qualifying group emptied. Not compacted.
    pub grid: Grid,
    pub any_erased: bool,
    /// Sum of the sizes of all qualifying groups.
    pub erased_count: u32,
    pub groups: u32,
}

#[inline(always)]
fn bit(x: usize, y: usize) -> u128 {
    1u128 << (y * Grid::WIDTH + x)
}

/// Scan row-major from the top-left, flood each unvisited puyo over
/// 4-neighbours of identical color, and erase every group of at least
/// `MIN_GROUP_SIZE`.
pub fn resolve_connections(grid: &Grid) -> Connections {
    let mut visited = 0u128;
    let mut erase = 0u128;
    let mut erased_count = 0u32;
    let mut groups = 0u32;
    // each cell is enqueued at most once, so CELLS slots always suffice
    let mut queue = [(0u8, 0u8); Grid::CELLS];

    for y in 0..Grid::HEIGHT {
        for x in 0..Grid::WIDTH {
            let Some(color) = grid.get(x, y) else {
                continue;
            };
            if visited & bit(x, y) != 0 {
                continue;
            }

            visited |= bit(x, y);
            let mut group = bit(x, y);
            let mut size = 1u32;
            queue[0] = (x as u8, y as u8);
            let (mut head, mut tail) = (0usize, 1usize);

            while head < tail {
                let (cx, cy) = queue[head];
                head += 1;
                for (dx, dy) in NEIGHBOURS_4 {
                    let nx = cx as i8 + dx;
                    let ny = cy as i8 + dy;
                    if !Grid::in_bounds(nx, ny) {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    let b = bit(nx, ny);
                    if visited & b == 0 && grid.get(nx, ny) == Some(color) {
                        visited |= b;
                        group |= b;
                        size += 1;
                        queue[tail] = (nx as u8, ny as u8);
                        tail += 1;
                    }
                }
            }

            if size >= MIN_GROUP_SIZE {
                erase |= group;
                erased_count += size;
                groups += 1;
            }
        }
    }

    let mut next = *grid;
    let mut bits = erase;
    while bits != 0 {
        let index = bits.trailing_zeros() as usize;
        next.set(index % Grid::WIDTH, index / Grid::WIDTH, None);
        bits &= bits - 1;
    }

    Connections {
        grid: next,
        any_erased: groups > 0,
        erased_count,
        groups,
    }
}
