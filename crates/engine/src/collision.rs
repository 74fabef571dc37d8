//! collision detection - walls, floor, settled puyos

use puyo_core::{Grid, PiecePair, Puyo};

/// Can the axis/child pair occupy these positions?
///
/// Rows above the field (y < 0) are exempt from occupancy checks, so a
/// freshly spawned pair is valid even though its axis is off-grid.
pub fn can_place(grid: &Grid, axis: Puyo, child: Puyo) -> bool {
    if axis.y >= Grid::HEIGHT as i8 || child.y >= Grid::HEIGHT as i8 {
        return false;
    }
    if !in_columns(axis.x) || !in_columns(child.x) {
        return false;
    }
    !occupied(grid, axis) && !occupied(grid, child)
}

/// `can_place` for a whole pair.
#[inline]
pub fn fits(grid: &Grid, pair: &PiecePair) -> bool {
    can_place(grid, pair.axis, pair.child)
}

/// Pair moved down until the next row would collide.
pub fn hard_drop(grid: &Grid, pair: &PiecePair) -> PiecePair {
    let mut landed = *pair;
    loop {
        let below = landed.shifted(0, 1);
        if !fits(grid, &below) {
            return landed;
        }
        landed = below;
    }
}

#[inline(always)]
fn in_columns(x: i8) -> bool {
    x >= 0 && (x as usize) < Grid::WIDTH
}

#[inline(always)]
fn occupied(grid: &Grid, puyo: Puyo) -> bool {
    matches!(grid.cell_at(puyo.x, puyo.y), Some(Some(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use puyo_core::Color;

    fn puyo(x: i8, y: i8) -> Puyo {
        Puyo::new(x, y, Color::Red)
    }

    #[test]
    fn test_free_placement() {
        let grid = Grid::new();
        assert!(can_place(&grid, puyo(0, 0), puyo(0, 1)));
    }

    #[test]
    fn test_floor() {
        let grid = Grid::new();
        assert!(!can_place(&grid, puyo(0, 11), puyo(0, 12)));
        assert!(can_place(&grid, puyo(0, 10), puyo(0, 11)));
    }

    #[test]
    fn test_walls() {
        let grid = Grid::new();
        assert!(!can_place(&grid, puyo(-1, 0), puyo(0, 0)));
        assert!(!can_place(&grid, puyo(5, 0), puyo(6, 0)));
    }

    #[test]
    fn test_collision_with_settled() {
        let mut grid = Grid::new();
        grid.set(0, 1, Some(Color::Blue));
        assert!(!can_place(&grid, puyo(0, 0), puyo(0, 1)));
    }

    #[test]
    fn test_above_field_is_exempt() {
        let mut grid = Grid::new();
        for y in 0..Grid::HEIGHT {
            grid.set(2, y, Some(Color::Green));
        }
        // cells above the field never collide, even over a full column
        assert!(can_place(&grid, puyo(2, -2), puyo(2, -1)));
        // but walls still apply above the field
        assert!(!can_place(&grid, puyo(-1, -2), puyo(-1, -1)));
    }

    #[test]
    fn test_hard_drop_empty() {
        let grid = Grid::new();
        let pair = PiecePair::spawn(Color::Red, Color::Blue);
        let landed = hard_drop(&grid, &pair);
        assert_eq!(landed.child.y, 11);
        assert_eq!(landed.axis.y, 10);
    }

    #[test]
    fn test_hard_drop_with_obstacle() {
        let mut grid = Grid::new();
        grid.set(2, 11, Some(Color::Yellow));
        let pair = PiecePair::spawn(Color::Red, Color::Blue);
        let landed = hard_drop(&grid, &pair);
        assert_eq!(landed.child.y, 10);
    }
}
