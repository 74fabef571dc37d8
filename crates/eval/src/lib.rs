//! Puyo eval crate - heuristics for scoring a resolved grid.

use puyo_core::Grid;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Multiplies `chain_count^2`.
    pub chain: i64,
    pub erased: i64,
    pub height: i64,
    pub adjacency: i64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            chain: 100,
            erased: 10,
            height: -5,
            adjacency: 1,
        }
    }
}

/// Score a grid that has already been fully resolved, given the chain it
/// took to get there.
pub fn evaluate(grid: &Grid, chain_count: u32, total_erased: u32, weights: &EvalWeights) -> i64 {
    let chains = i64::from(chain_count);
    let mut score = chains * chains * weights.chain;
    score += i64::from(total_erased) * weights.erased;

    // Height penalty
    score += grid.stack_height() as i64 * weights.height;

    // Same-color neighbours
    score += i64::from(adjacency_pairs(grid)) * weights.adjacency;

    score
}

/// Count same-color pairs that touch horizontally or vertically. Each pair
/// is counted once, from its left or upper cell.
pub fn adjacency_pairs(grid: &Grid) -> u32 {
    let mut pairs = 0u32;
    for (x, y, color) in grid.occupied() {
        if x + 1 < Grid::WIDTH && grid.get(x + 1, y) == Some(color) {
            pairs += 1;
        }
        if y + 1 < Grid::HEIGHT && grid.get(x, y + 1) == Some(color) {
            pairs += 1;
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use puyo_core::Color;

    #[test]
    fn test_empty_grid_scores_zero() {
        assert_eq!(evaluate(&Grid::new(), 0, 0, &EvalWeights::default()), 0);
    }

    #[test]
    fn test_adjacency_counts_each_pair_once() {
        let mut g = Grid::new();
        g.set(0, 11, Some(Color::Red));
        g.set(1, 11, Some(Color::Red));
        g.set(0, 10, Some(Color::Red));
        g.set(2, 11, Some(Color::Blue));
        // (0,11)-(1,11) and (0,10)-(0,11)
        assert_eq!(adjacency_pairs(&g), 2);
    }

    #[test]
    fn test_adjacency_ignores_diagonals() {
        let mut g = Grid::new();
        g.set(0, 11, Some(Color::Green));
        g.set(1, 10, Some(Color::Green));
        assert_eq!(adjacency_pairs(&g), 0);
    }

    #[test]
    fn test_weighted_sum() {
        let mut g = Grid::new();
        g.set(3, 11, Some(Color::Yellow));
        g.set(3, 10, Some(Color::Yellow));
        // 2^2 * 100 + 8 * 10 - 2 * 5 + 1
        assert_eq!(evaluate(&g, 2, 8, &EvalWeights::default()), 471);
    }

    #[test]
    fn test_chain_term_dominates_height() {
        let weights = EvalWeights::default();
        let mut tall = Grid::new();
        for y in 1..Grid::HEIGHT {
            tall.set(0, y, Some(Color::Nuisance));
        }
        let flat = Grid::new();
        assert!(evaluate(&tall, 1, 4, &weights) > evaluate(&flat, 0, 0, &weights));
    }

    #[test]
    fn test_weights_deserialize_partial() {
        let w: EvalWeights = serde_json::from_str(r#"{"height": -20}"#).expect("weights");
        assert_eq!(w.height, -20);
        assert_eq!(w.chain, 100);
    }
}
