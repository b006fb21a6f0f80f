// Secure random source abstraction
// Everything that draws random indices (password generation, short codes) goes through here

use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};

/// A source of uniformly distributed integers.
///
/// Implemented for every `rand` generator that is also marked `CryptoRng`,
/// so production code uses the OS generator while tests can plug in a seeded
/// `StdRng` without touching the algorithms.
pub trait RandomSource {
    /// Uniform integer in `[0, upper)`. `upper` must be greater than zero.
    fn uniform(&mut self, upper: usize) -> usize;
}

impl<R> RandomSource for R
where
    R: RngCore + CryptoRng,
{
    #[inline]
    fn uniform(&mut self, upper: usize) -> usize {
        // gen_range rejects-and-resamples internally, so there is no modulo bias
        self.gen_range(0..upper)
    }
}

/// The operating system CSPRNG. Stateless, safe to use from any task.
pub fn os_rng() -> OsRng {
    OsRng
}

/// Pick one element of `items` uniformly. Returns `None` for an empty slice.
pub fn choose<'a, T, R>(rng: &mut R, items: &'a [T]) -> Option<&'a T>
where
    R: RandomSource + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    Some(&items[rng.uniform(items.len())])
}

/// In-place Fisher-Yates shuffle driven by `rng`.
///
/// Walks from the last index down to 1 and swaps each slot with a uniformly
/// chosen index in `[0, i]`, which yields every permutation with equal
/// probability.
pub fn shuffle<T, R>(rng: &mut R, items: &mut [T])
where
    R: RandomSource + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.uniform(i + 1);
        items.swap(i, j);
    }
}
