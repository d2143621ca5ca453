//! Shuffle-without-replacement word supplier

use rand::Rng;
use rand::seq::SliceRandom;

use crate::dictionary::WordId;

/// Bag of remaining word ids for the session
#[derive(Debug, Clone)]
pub struct Deck {
    /// Size of the active dictionary
    size: usize,
    remaining: Vec<WordId>,
}

impl Deck {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            remaining: Vec::with_capacity(size),
        }
    }

    /// Words left before the next refill
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Draw one word; refills with the full dictionary once empty.
    ///
    /// Returns `None` only for an empty dictionary.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<WordId> {
        if self.remaining.is_empty() {
            if self.size == 0 {
                return None;
            }
            self.remaining.extend((0..self.size as u32).map(WordId));
            self.remaining.shuffle(rng);
        }
        let pick = rng.random_range(0..self.remaining.len());
        Some(self.remaining.swap_remove(pick))
    }
}
