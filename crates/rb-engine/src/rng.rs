//! Deterministic random stream and weighted sampling.
//!
//! Reproducibility is a hard requirement: a recorded seed must replay the
//! exact same spins, so the generator algorithm is part of the public
//! contract and must never change silently. Not cryptographically secure;
//! the purpose is fairness auditing and reproducible testing.

use serde::{Deserialize, Serialize};

/// Deterministic float stream seeded from a 32-bit integer.
///
/// Implements the mulberry32 mixing generator: an additive Weyl step
/// followed by two multiply-xor-shift rounds, normalized to `[0, 1)` by
/// dividing the 32-bit output by 2^32. Identical seed and call order always
/// yield the identical sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a new stream from a seed.
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next float in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(t | 1);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(t | 61));
        f64::from(r ^ (r >> 14)) / 4_294_967_296.0
    }

    /// Bernoulli trial with probability `p`. Consumes exactly one draw.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index in `0..bound`. `bound` must be positive.
    #[inline]
    pub fn index(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        (self.next_f64() * bound as f64) as usize
    }

    /// Uniform integer in `min..=max`.
    #[inline]
    pub fn range_inclusive(&mut self, min: usize, max: usize) -> usize {
        debug_assert!(min <= max);
        min + (self.next_f64() * (max - min + 1) as f64) as usize
    }
}

/// Cumulative-walk weighted choice.
///
/// Draws `r = rng() * total` and returns the first item whose cumulative
/// weight exceeds `r`. If floating point error leaves `r` unconsumed the
/// last item is returned instead of failing. Always consumes exactly one
/// draw, even for an empty slice (which yields `None`).
pub fn pick_weighted<'a, T, F>(rng: &mut SeededRng, items: &'a [T], weight: F) -> Option<&'a T>
where
    F: Fn(&T) -> f64,
{
    let total: f64 = items.iter().map(&weight).sum();
    let r = rng.next_f64() * total;
    let mut acc = 0.0;
    for item in items {
        acc += weight(item);
        if r < acc {
            return Some(item);
        }
    }
    items.last()
}
