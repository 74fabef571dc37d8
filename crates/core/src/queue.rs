//! Next-piece lookahead buffer.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::PiecePair;

/// Fixed-length FIFO of upcoming pairs. Every lock consumes the head and a
/// freshly generated pair is appended at the tail, so the length never changes.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NextQueue {
    pairs: VecDeque<PiecePair>,
}

impl NextQueue {
    pub const LEN: usize = 2;

    /// Panics if `pairs` does not hold exactly `LEN` entries.
    pub fn new(pairs: impl IntoIterator<Item = PiecePair>) -> Self {
        let pairs: VecDeque<PiecePair> = pairs.into_iter().collect();
        assert_eq!(pairs.len(), Self::LEN, "next queue holds {} pairs", Self::LEN);
        Self { pairs }
    }

    /// Pops the head and pushes `fresh` at the tail.
    pub fn advance(&mut self, fresh: PiecePair) -> PiecePair {
        match self.pairs.pop_front() {
            Some(head) => {
                self.pairs.push_back(fresh);
                head
            }
            None => fresh,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PiecePair> + '_ {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
