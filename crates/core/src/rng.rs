//! RNG module - random sources for tile spawning
//!
//! Spawning is the only non-deterministic step of the engine, so it draws
//! from a [`RandomSource`] handed in by the caller:
//!
//! - [`SimpleRng`]: seeded LCG, same seed gives the same game (replays, AI)
//! - [`SequenceRng`]: replays a fixed list of draws (unit tests)
//! - `rand::rngs::StdRng`: any seeded `rand` generator

use rand::rngs::StdRng;
use rand::Rng;

/// Source of uniform draws for the spawner.
pub trait RandomSource {
    /// Uniform value in `0..bound`. Callers never pass `bound == 0`.
    fn next_below(&mut self, bound: u32) -> u32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_below(&mut self, bound: u32) -> u32 {
        (**self).next_below(bound)
    }
}

impl RandomSource for StdRng {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.gen_range(0..bound)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Seed from OS entropy. Returns the RNG together with the seed used so a
    /// game can be replayed later.
    pub fn from_entropy() -> (Self, u32) {
        let seed: u32 = rand::random();
        (Self::new(seed), seed)
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (restarting from it continues the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_below(&mut self, bound: u32) -> u32 {
        self.next_range(bound)
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Replays a scripted list of draws, each reduced modulo the requested bound.
/// Wraps around when the script runs out.
///
/// ```
/// use tui_2048_core::{RandomSource, SequenceRng};
///
/// let mut rng = SequenceRng::new([3, 950]);
/// assert_eq!(rng.next_below(4), 3);
/// assert_eq!(rng.next_below(1000), 950);
/// assert_eq!(rng.next_below(4), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<u32>,
    pos: usize,
}

impl SequenceRng {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        let values: Vec<u32> = values.into_iter().collect();
        Self { values, pos: 0 }
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for SequenceRng {
    fn next_below(&mut self, bound: u32) -> u32 {
        if self.values.is_empty() {
            self.pos += 1;
            return 0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v % bound
    }
}
