//! Builder-style configuration for [`SkipList`].

use crate::{
    error::{Error, Result},
    level_generator::{LevelGenerator, Uniform},
    skiplist::SkipList,
};

/// Default upper bound on tower heights.
pub const DEFAULT_MAX_HEIGHT: usize = 10;

/// Options used to construct a [`SkipList`].
///
/// # Examples
///
/// ```
/// use kv_skiplist::{SkipList, SkipListOptions};
///
/// let list: SkipList<i32, &str> = SkipListOptions::new()
///     .max_height(4)
///     .grow_max_height(false)
///     .seed(7)
///     .build()?;
/// assert_eq!(list.max_height(), 4);
/// # Ok::<(), kv_skiplist::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SkipListOptions {
    max_height: usize,
    grow_max_height: bool,
    seed: Option<u64>,
}

impl Default for SkipListOptions {
    fn default() -> Self {
        Self {
            max_height: DEFAULT_MAX_HEIGHT,
            grow_max_height: true,
            seed: None,
        }
    }
}

impl SkipListOptions {
    /// Options with the defaults: a max height of 10 which grows with the
    /// number of keys, and an entropy-seeded height generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on the height drawn for new towers.  Must be at least 1.
    pub fn max_height(&mut self, max_height: usize) -> &mut Self {
        self.max_height = max_height;
        self
    }

    /// Whether inserts raise the max height to `floor(log2(len)) + 2` once
    /// the list outgrows it.  The max height is never lowered.
    pub fn grow_max_height(&mut self, grow: bool) -> &mut Self {
        self.grow_max_height = grow;
        self
    }

    /// Seed for the default [`Uniform`] height generator.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Build an empty list drawing tower heights with [`Uniform`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroMaxHeight`] if the max height is 0.
    pub fn build<K, V>(&self) -> Result<SkipList<K, V, Uniform>> {
        let generator = match self.seed {
            Some(seed) => Uniform::seeded(seed),
            None => Uniform::new(),
        };
        self.build_with_generator(generator)
    }

    /// Build an empty list drawing tower heights from `generator`.  Any seed
    /// configured is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroMaxHeight`] if the max height is 0.
    pub fn build_with_generator<K, V, G>(&self, generator: G) -> Result<SkipList<K, V, G>>
    where
        G: LevelGenerator,
    {
        if self.max_height == 0 {
            return Err(Error::ZeroMaxHeight);
        }
        Ok(SkipList::from_parts(
            self.max_height,
            self.grow_max_height,
            generator,
        ))
    }
}
