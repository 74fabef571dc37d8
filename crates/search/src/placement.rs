use puyo_core::{Grid, PiecePair};
use puyo_engine::{fits, simulate_placement};
use puyo_eval::{evaluate, EvalWeights};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::debug;

use crate::candidate_pairs;

/// One legal placement and how it scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Resting position after the drop.
    pub landed: PiecePair,
    pub chain_count: u32,
    pub total_erased: u32,
    pub score: i64,
}

#[derive(Clone, Debug, Default)]
pub struct PlacementSearch {
    pub weights: EvalWeights,
}

impl PlacementSearch {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    /// Pick the best resting position for `pair` on `grid`.
    ///
    /// Ties go to the earliest candidate in enumeration order. When nothing
    /// fits, `pair` comes back unchanged.
    pub fn choose_move(&self, grid: &Grid, pair: &PiecePair) -> PiecePair {
        match self.best_candidate(grid, pair) {
            Some(best) => {
                debug!(
                    x = best.landed.axis.x,
                    rotation = ?best.landed.rotation(),
                    chain = best.chain_count,
                    score = best.score,
                    "placement chosen"
                );
                best.landed
            }
            None => *pair,
        }
    }

    pub fn best_candidate(&self, grid: &Grid, pair: &PiecePair) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for candidate in self.scored_candidates(grid, pair) {
            // strictly greater, so the first of equal scores stays
            if best.map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Score every legal placement, in enumeration order.
    pub fn scored_candidates(&self, grid: &Grid, pair: &PiecePair) -> Vec<Candidate> {
        let pairs: Vec<PiecePair> = candidate_pairs(pair)
            .filter(|candidate| fits(grid, candidate))
            .collect();

        #[cfg(feature = "rayon")]
        let scored: Vec<Candidate> = pairs
            .par_iter()
            .map(|candidate| self.score_placement(grid, candidate))
            .collect();
        #[cfg(not(feature = "rayon"))]
        let scored: Vec<Candidate> = pairs
            .iter()
            .map(|candidate| self.score_placement(grid, candidate))
            .collect();

        scored
    }

    fn score_placement(&self, grid: &Grid, pair: &PiecePair) -> Candidate {
        let (landed, outcome) = simulate_placement(grid, pair);
        Candidate {
            landed,
            chain_count: outcome.chain_count,
            total_erased: outcome.total_erased,
            score: evaluate(
                &outcome.grid,
                outcome.chain_count,
                outcome.total_erased,
                &self.weights,
            ),
        }
    }
}
