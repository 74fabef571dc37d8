use puyo_core::{Color, NextQueue, PiecePair};

use crate::rng::GameRng;

/// Source of spawn-positioned pairs: uniform random colors, or a fixed
/// script that repeats once exhausted.
#[derive(Clone, Debug)]
pub enum PairGenerator {
    Random(GameRng),
    Scripted { pairs: Vec<PiecePair>, index: usize },
}

impl PairGenerator {
    pub fn random(rng: GameRng) -> Self {
        Self::Random(rng)
    }

    /// Pairs are given as `(axis, child)` colors. An empty script falls
    /// back to all-red pairs.
    pub fn scripted(colors: &[(Color, Color)]) -> Self {
        Self::Scripted {
            pairs: colors
                .iter()
                .map(|&(axis, child)| PiecePair::spawn(axis, child))
                .collect(),
            index: 0,
        }
    }

    pub fn next_pair(&mut self) -> PiecePair {
        match self {
            Self::Random(rng) => {
                let axis = Color::PALETTE[rng.gen_range(0..Color::PALETTE.len())];
                let child = Color::PALETTE[rng.gen_range(0..Color::PALETTE.len())];
                PiecePair::spawn(axis, child)
            }
            Self::Scripted { pairs, index } => {
                if pairs.is_empty() {
                    return PiecePair::spawn(Color::Red, Color::Red);
                }
                let pair = pairs[*index % pairs.len()];
                *index += 1;
                pair
            }
        }
    }

    pub fn fill_queue(&mut self) -> NextQueue {
        NextQueue::new((0..NextQueue::LEN).map(|_| self.next_pair()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_pairs_use_palette() {
        let mut gen = PairGenerator::random(GameRng::new(5));
        for _ in 0..100 {
            let pair = gen.next_pair();
            assert!(Color::PALETTE.contains(&pair.axis.color));
            assert!(Color::PALETTE.contains(&pair.child.color));
            assert_eq!(pair, PiecePair::spawn(pair.axis.color, pair.child.color));
        }
    }

    #[test]
    fn test_random_is_seeded() {
        let mut a = PairGenerator::random(GameRng::new(11));
        let mut b = PairGenerator::random(GameRng::new(11));
        for _ in 0..20 {
            assert_eq!(a.next_pair(), b.next_pair());
        }
    }

    #[test]
    fn test_scripted_cycles() {
        let mut gen = PairGenerator::scripted(&[(Color::Red, Color::Blue), (Color::Green, Color::Green)]);
        assert_eq!(gen.next_pair().child.color, Color::Blue);
        assert_eq!(gen.next_pair().axis.color, Color::Green);
        assert_eq!(gen.next_pair().axis.color, Color::Red);
    }

    #[test]
    fn test_fill_queue() {
        let mut gen = PairGenerator::scripted(&[(Color::Yellow, Color::Purple)]);
        let queue = gen.fill_queue();
        assert_eq!(queue.len(), NextQueue::LEN);
    }
}
