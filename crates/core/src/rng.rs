//! RNG module - 7-bag piece randomizer
//!
//! Each bag holds one of every kind in a uniformly shuffled order. Pieces are
//! handed out front to back and a fresh bag is shuffled only once the current
//! one is empty, so no kind can go missing for more than 12 draws in a row.
//!
//! The random source is injected. [`PieceBag::seeded`] wires up a
//! `ChaCha8Rng` so a seed fully determines the piece sequence.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::PieceKind;

const BAG_SIZE: usize = PieceKind::ALL.len();

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceBag<R = ChaCha8Rng> {
    /// Current bag, in draw order
    bag: [PieceKind; BAG_SIZE],
    /// Index of the next piece in `bag`; `BAG_SIZE` means empty
    bag_index: usize,
    rng: R,
}

impl PieceBag<ChaCha8Rng> {
    /// Deterministic bag: the same seed always yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Bag seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }
}

impl<R: Rng> PieceBag<R> {
    /// Create an empty bag drawing its shuffles from `rng`.
    ///
    /// Nothing is shuffled until the first [`PieceBag::next`].
    pub fn new(rng: R) -> Self {
        Self {
            bag: PieceKind::ALL,
            bag_index: BAG_SIZE,
            rng,
        }
    }

    /// Refill with a fresh uniform permutation of all kinds.
    fn refill(&mut self) {
        self.bag = PieceKind::ALL;
        self.bag.shuffle(&mut self.rng);
        self.bag_index = 0;
    }

    /// Draw the next piece, refilling first if the bag is empty.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> PieceKind {
        if self.bag_index >= BAG_SIZE {
            self.refill();
        }
        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Next piece of the current bag, `None` when the bag is spent.
    pub fn peek(&self) -> Option<PieceKind> {
        self.bag.get(self.bag_index).copied()
    }

    /// Pieces still waiting in the current bag, in draw order
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index.min(BAG_SIZE)..]
    }

    /// Throw away the rest of the current bag; the RNG stream continues.
    pub fn clear(&mut self) {
        self.bag_index = BAG_SIZE;
    }
}

impl Default for PieceBag<ChaCha8Rng> {
    fn default() -> Self {
        Self::seeded(1)
    }
}
