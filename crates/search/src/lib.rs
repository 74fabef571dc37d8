//! Puyo search crate - enumerate-and-evaluate placement search.

mod placement;

pub use placement::{Candidate, PlacementSearch};

use std::iter::successors;

use puyo_core::{Grid, PiecePair};

/// Every column/rotation combination for `pair`, columns left to right
/// outermost, then the pair's current rotation followed by three clockwise
/// turns. Ties in the search go to the earliest candidate, so this order is
/// observable. Candidates are not validated.
pub fn candidate_pairs(pair: &PiecePair) -> impl Iterator<Item = PiecePair> + '_ {
    (0..Grid::WIDTH as i8).flat_map(move |x| {
        successors(Some(pair.rotation()), |rotation| Some(rotation.cw()))
            .take(4)
            .map(move |rotation| pair.with_rotation(rotation).at_column(x))
    })
}
