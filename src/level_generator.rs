//! Each key stored in the skiplist is represented by a *tower* of nodes, one
//! per level from level 0 up to the tower's height.  The height is drawn once,
//! when the key is first inserted, and never changes afterwards.
//!
//! By default heights are drawn uniformly from `$[1, \text{max}]$` where
//! `max` is the list's current maximum height, see [`Uniform`].  The draw sits
//! behind the [`LevelGenerator`] trait so that it can be replaced, most
//! notably by [`Sequence`] which replays a fixed list of heights and makes the
//! shape of a list fully reproducible in tests.

use std::fmt;

use rand::prelude::*;

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new key in the list, the key is replicated to
/// `height` levels as determined by a [`LevelGenerator`].
pub trait LevelGenerator {
    /// Generate the tower height for a new key in the range `[1, max]`.
    ///
    /// `max` is always at least 1.  Values outside of the range are clamped
    /// by the list, so a generator can never produce an empty tower.
    #[must_use]
    fn height(&mut self, max: usize) -> usize;
}

impl<G> LevelGenerator for Box<G>
where
    G: LevelGenerator + ?Sized,
{
    #[inline]
    fn height(&mut self, max: usize) -> usize {
        (**self).height(max)
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Uniform
// ////////////////////////////////////////////////////////////////////////////

/// A level generator drawing heights uniformly from `$[1, \text{max}]$`.
pub struct Uniform {
    /// The random number generator.
    rng: SmallRng,
}

impl Uniform {
    /// Create a new uniform level generator seeded from the thread-local
    /// random number generator.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Uniform {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create a new uniform level generator with a fixed seed, producing the
    /// same sequence of heights on every run.
    #[inline]
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Uniform {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for Uniform {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Uniform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uniform").finish_non_exhaustive()
    }
}

impl LevelGenerator for Uniform {
    #[inline]
    fn height(&mut self, max: usize) -> usize {
        self.rng.random_range(1..=max.max(1))
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Sequence
// ////////////////////////////////////////////////////////////////////////////

/// A deterministic level generator which cycles through a fixed list of
/// heights.
///
/// The heights are used as given, regardless of the maximum height requested
/// by the list; the list clamps them into range.  An empty sequence always
/// yields height 1.
///
/// ```
/// use kv_skiplist::{LevelGenerator, Sequence};
///
/// let mut heights = Sequence::new([3, 1]);
/// assert_eq!(heights.height(10), 3);
/// assert_eq!(heights.height(10), 1);
/// assert_eq!(heights.height(10), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Sequence {
    heights: Vec<usize>,
    position: usize,
}

impl Sequence {
    /// Create a generator replaying `heights` in a loop.
    #[inline]
    pub fn new(heights: impl IntoIterator<Item = usize>) -> Self {
        Sequence {
            heights: heights.into_iter().collect(),
            position: 0,
        }
    }
}

impl LevelGenerator for Sequence {
    #[inline]
    fn height(&mut self, _max: usize) -> usize {
        let Some(&height) = self.heights.get(self.position) else {
            return 1;
        };
        self.position = (self.position + 1) % self.heights.len();
        height
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{LevelGenerator, Sequence, Uniform};

    #[rstest]
    fn uniform_in_range(#[values(1, 2, 10, 64)] max: usize) {
        let mut generator = Uniform::new();
        let mut seen = vec![false; max + 1];
        for _ in 0..100_000 {
            let height = generator.height(max);
            assert!((1..=max).contains(&height));
            seen[height] = true;
        }
        // Every height, including the extremes, should be reachable.
        assert!(seen[1..].iter().all(|&s| s));
    }

    #[test]
    fn uniform_seeded_is_reproducible() {
        let mut a = Uniform::seeded(0x1234_abcd);
        let mut b = Uniform::seeded(0x1234_abcd);
        let a: Vec<_> = (0..100).map(|_| a.height(16)).collect();
        let b: Vec<_> = (0..100).map(|_| b.height(16)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn uniform_zero_max() {
        let mut generator = Uniform::seeded(1);
        assert_eq!(generator.height(0), 1);
    }

    #[test]
    fn sequence_cycles() {
        let mut generator = Sequence::new([2, 4, 1]);
        let heights: Vec<_> = (0..7).map(|_| generator.height(3)).collect();
        assert_eq!(heights, [2, 4, 1, 2, 4, 1, 2]);
    }

    #[test]
    fn sequence_empty() {
        let mut generator = Sequence::new(Vec::<usize>::new());
        assert_eq!(generator.height(5), 1);
        assert_eq!(generator.height(5), 1);
    }

    #[test]
    fn boxed() {
        let mut generator: Box<dyn LevelGenerator> = Box::new(Sequence::new([3]));
        assert_eq!(generator.height(5), 3);
    }
}
