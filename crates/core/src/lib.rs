//! puyo core crate - fundamental value types for the chain puzzle engine.

mod grid;
mod piece;
mod queue;

pub use grid::{Cell, Color, Grid, GridParseError};
pub use piece::{PiecePair, Puyo, Rotation};
pub use queue::NextQueue;
