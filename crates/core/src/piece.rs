//! Falling piece pair: an axis puyo and a child puyo orbiting it.

use serde::{Deserialize, Serialize};

use crate::Color;

/// Where the child sits relative to the axis.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    North,
    East,
    #[default]
    South,
    West,
}

impl Rotation {
    pub fn cw(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Child offset `(dx, dy)` from the axis. y grows downward.
    pub fn offset(self) -> (i8, i8) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    pub fn from_offset(dx: i8, dy: i8) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::North),
            (1, 0) => Some(Self::East),
            (0, 1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Puyo {
    pub x: i8,
    pub y: i8,
    pub color: Color,
}

impl Puyo {
    pub fn new(x: i8, y: i8, color: Color) -> Self {
        Self { x, y, color }
    }

    pub fn shifted(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
}

/// Axis + child. The two are always orthogonally adjacent.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct PiecePair {
    pub axis: Puyo,
    pub child: Puyo,
}

impl PiecePair {
    pub const SPAWN_X: i8 = 2;
    /// Axis row at spawn; the child sits one row below it.
    pub const SPAWN_Y: i8 = -1;

    pub fn new(axis: Puyo, child: Puyo) -> Self {
        Self { axis, child }
    }

    /// Spawn position: axis above the field, child on row 0.
    pub fn spawn(axis_color: Color, child_color: Color) -> Self {
        let axis = Puyo::new(Self::SPAWN_X, Self::SPAWN_Y, axis_color);
        Self {
            axis,
            child: axis.shifted(0, 1).with_color(child_color),
        }
    }

    pub fn cells(&self) -> [Puyo; 2] {
        [self.axis, self.child]
    }

    pub fn rotation(&self) -> Rotation {
        Rotation::from_offset(self.child.x - self.axis.x, self.child.y - self.axis.y)
            .unwrap_or_default()
    }

    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            axis: self.axis.shifted(dx, dy),
            child: self.child.shifted(dx, dy),
        }
    }

    /// Child rotated 90 degrees clockwise about the axis.
    pub fn rotated_cw(&self) -> Self {
        let dx = self.child.x - self.axis.x;
        let dy = self.child.y - self.axis.y;
        Self {
            axis: self.axis,
            child: Puyo {
                x: self.axis.x - dy,
                y: self.axis.y + dx,
                color: self.child.color,
            },
        }
    }

    pub fn with_rotation(&self, rotation: Rotation) -> Self {
        let (dx, dy) = rotation.offset();
        Self {
            axis: self.axis,
            child: Puyo {
                x: self.axis.x + dx,
                y: self.axis.y + dy,
                color: self.child.color,
            },
        }
    }

    /// Moves the axis to column `x`, keeping the child's relative offset.
    pub fn at_column(&self, x: i8) -> Self {
        self.shifted(x - self.axis.x, 0)
    }
}
