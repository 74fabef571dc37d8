//! grid representation - fixed 6x12 row-major cell matrix
//! row 0 is the top visible row, pieces spawn above it (negative rows)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Puyo colors. The first five are dealt in pieces, `Nuisance` is the filler
/// color that materialized attack units take.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Nuisance,
}

impl Color {
    /// Colors a freshly generated piece can carry.
    pub const PALETTE: [Color; 5] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
    ];

    pub fn glyph(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Purple => 'P',
            Color::Nuisance => 'N',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph.to_ascii_uppercase() {
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            'B' => Some(Color::Blue),
            'Y' => Some(Color::Yellow),
            'P' => Some(Color::Purple),
            'N' => Some(Color::Nuisance),
            _ => None,
        }
    }
}

/// A grid cell: a color tag or empty.
pub type Cell = Option<Color>;

const EMPTY_GLYPH: char = '.';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridParseError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row}: expected {expected} cells, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column {col}: unknown cell glyph {glyph:?}")]
    UnknownGlyph { row: usize, col: usize, glyph: char },
}

/// 6x12 playing field. Dimensions are fixed at compile time.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Grid {
    cells: [[Cell; Grid::WIDTH]; Grid::HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            cells: [[None; Grid::WIDTH]; Grid::HEIGHT],
        }
    }
}

impl Grid {
    pub const WIDTH: usize = 6;
    pub const HEIGHT: usize = 12;
    pub const CELLS: usize = Self::WIDTH * Self::HEIGHT;

    pub fn new() -> Self {
        Self::default()
    }

    /// Panics on out-of-range coordinates; callers go through the validator first.
    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[y][x]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y][x] = cell;
    }

    /// Signed coordinates are accepted here because piece cells can sit above
    /// the field. Anything outside the grid is `None`.
    pub fn cell_at(&self, x: i8, y: i8) -> Option<Cell> {
        Self::in_bounds(x, y).then(|| self.cells[y as usize][x as usize])
    }

    #[inline]
    pub fn in_bounds(x: i8, y: i8) -> bool {
        x >= 0 && (x as usize) < Self::WIDTH && y >= 0 && (y as usize) < Self::HEIGHT
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.cells[y][x].is_some()
    }

    /// True when no cell holds a color (all-clear).
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Lowest empty row in a column, `None` when the column is full.
    pub fn lowest_empty_row(&self, x: usize) -> Option<usize> {
        (0..Self::HEIGHT).rev().find(|&y| self.cells[y][x].is_none())
    }

    /// Topmost occupied row across all columns.
    pub fn top_row(&self) -> Option<usize> {
        (0..Self::HEIGHT).find(|&y| self.cells[y].iter().any(Option::is_some))
    }

    /// Rows between the floor and the highest occupied cell, inclusive.
    pub fn stack_height(&self) -> usize {
        self.top_row().map_or(0, |y| Self::HEIGHT - y)
    }

    pub fn column_height(&self, x: usize) -> usize {
        (0..Self::HEIGHT)
            .find(|&y| self.cells[y][x].is_some())
            .map_or(0, |y| Self::HEIGHT - y)
    }

    /// Iterate `(x, y, color)` over occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Color)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.map(|color| (x, y, color)))
        })
    }

    fn row_string(&self, y: usize) -> String {
        self.cells[y]
            .iter()
            .map(|cell| cell.map_or(EMPTY_GLYPH, Color::glyph))
            .collect()
    }

    fn parse_row(y: usize, line: &str) -> Result<[Cell; Grid::WIDTH], GridParseError> {
        let glyphs: Vec<char> = line.chars().collect();
        if glyphs.len() != Self::WIDTH {
            return Err(GridParseError::RowWidth {
                row: y,
                expected: Self::WIDTH,
                found: glyphs.len(),
            });
        }
        let mut row = [None; Grid::WIDTH];
        for (x, &glyph) in glyphs.iter().enumerate() {
            row[x] = match glyph {
                EMPTY_GLYPH => None,
                g => Some(Color::from_glyph(g).ok_or(GridParseError::UnknownGlyph {
                    row: y,
                    col: x,
                    glyph: g,
                })?),
            };
        }
        Ok(row)
    }

    fn from_row_strings<S: AsRef<str>>(lines: &[S]) -> Result<Self, GridParseError> {
        if lines.len() != Self::HEIGHT {
            return Err(GridParseError::RowCount {
                expected: Self::HEIGHT,
                found: lines.len(),
            });
        }
        let mut grid = Grid::new();
        for (y, line) in lines.iter().enumerate() {
            grid.cells[y] = Self::parse_row(y, line.as_ref())?;
        }
        Ok(grid)
    }
}

impl FromStr for Grid {
    type Err = GridParseError;

    /// One line per row, top row first. Blank lines and surrounding
    /// whitespace are ignored so grids can be written as indented literals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_row_strings(&lines)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..Self::HEIGHT {
            writeln!(f, "{}", self.row_string(y))?;
        }
        Ok(())
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rows: Vec<String> = (0..Self::HEIGHT).map(|y| self.row_string(y)).collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows: Vec<String> = Vec::deserialize(deserializer)?;
        Grid::from_row_strings(&rows).map_err(serde::de::Error::custom)
    }
}
