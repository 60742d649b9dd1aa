//! Word sampling without replacement.
//!
//! Randomness is injected through [`Shuffler`] so sessions can be replayed
//! deterministically in tests.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A uniform random permutation capability.
pub trait Shuffler {
    /// Permute `words` in place.
    fn shuffle(&mut self, words: &mut [String]);
}

/// Shuffles with the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadShuffler;

impl Shuffler for ThreadShuffler {
    fn shuffle(&mut self, words: &mut [String]) {
        words.shuffle(&mut rand::rng());
    }
}

/// Shuffles with a seeded generator; the same seed yields the same samples.
#[derive(Debug, Clone)]
pub struct SeededShuffler {
    rng: StdRng,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&mut self, words: &mut [String]) {
        words.shuffle(&mut self.rng);
    }
}

/// Leaves the order untouched. Useful for scripted sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityShuffler;

impl Shuffler for IdentityShuffler {
    fn shuffle(&mut self, _words: &mut [String]) {}
}

/// Pick a shuffler from an optional seed.
pub fn shuffler_for(seed: Option<u64>) -> Box<dyn Shuffler> {
    match seed {
        Some(seed) => Box::new(SeededShuffler::new(seed)),
        None => Box::new(ThreadShuffler),
    }
}

/// Draw up to `size` distinct words from `pool`, skipping anything in `used`.
///
/// The remainder is permuted by `shuffler` and truncated. A pool smaller
/// than `size` yields a short sample rather than an error.
pub fn draw_sample(
    pool: &[String],
    used: &HashSet<String>,
    size: usize,
    shuffler: &mut dyn Shuffler,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<String> = pool
        .iter()
        .filter(|w| !used.contains(*w) && seen.insert(w.as_str()))
        .cloned()
        .collect();

    shuffler.shuffle(&mut candidates);
    candidates.truncate(size);
    candidates
}
