//! A thread-safe ordered key-value skiplist with floor search.

use std::{fmt, iter};

use parking_lot::RwLock;

use crate::{
    error::{Error, Result},
    level_generator::{LevelGenerator, Uniform},
    levels::Levels,
    options::DEFAULT_MAX_HEIGHT,
};

// ////////////////////////////////////////////////////////////////////////////
// Floor
// ////////////////////////////////////////////////////////////////////////////

/// The outcome of a floor search: either the entry with the largest key less
/// than or equal to the query, or the head sentinel when every stored key is
/// greater than the query (or the list is empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Floor<K, V> {
    /// No key is less than or equal to the query.
    Sentinel,
    /// The floor entry.
    Entry(K, V),
}

impl<K, V> Floor<K, V> {
    /// Returns `true` if the search found no key at or below the query.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Floor::Sentinel)
    }

    /// The key of the floor entry.
    #[inline]
    pub fn key(&self) -> Option<&K> {
        match self {
            Floor::Sentinel => None,
            Floor::Entry(k, _) => Some(k),
        }
    }

    /// The value of the floor entry.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        match self {
            Floor::Sentinel => None,
            Floor::Entry(_, v) => Some(v),
        }
    }

    /// Converts into the floor entry, if any.
    #[inline]
    pub fn into_entry(self) -> Option<(K, V)> {
        match self {
            Floor::Sentinel => None,
            Floor::Entry(k, v) => Some((k, v)),
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// SkipList
// ////////////////////////////////////////////////////////////////////////////

/// An ordered key-value skiplist which can be shared between threads.
///
/// Each key is stored as a tower of nodes reaching from level 0 up to a height
/// drawn by the list's [`LevelGenerator`] when the key is first inserted.
/// Lookups use *floor* semantics: [`search`][SkipList::search] returns the
/// entry with the largest key less than or equal to the query.
///
/// All methods take `&self`.  Inserts and removals hold an exclusive lock for
/// their whole duration, so at most one mutation runs at a time.  Searches hold
/// the same lock in shared mode: they run concurrently with each other but
/// never observe a mutation half-way through.
///
/// Levels are added as needed by inserts and are never removed, so
/// [`height`][SkipList::height] never decreases, even when the list is
/// emptied.
///
/// # Examples
///
/// ```
/// use kv_skiplist::{Floor, SkipList};
///
/// let list = SkipList::new();
/// assert!(list.insert(1, "one"));
/// assert!(list.insert(5, "five"));
///
/// assert_eq!(list.search(&3), Floor::Entry(1, "one"));
/// assert!(list.search(&0).is_sentinel());
///
/// assert!(list.remove(&1));
/// assert_eq!(list.len(), 1);
/// ```
pub struct SkipList<K, V, G = Uniform> {
    inner: RwLock<Levels<K, V, G>>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K, V> SkipList<K, V, Uniform> {
    /// Create a new skiplist with a max height of 10 and an entropy-seeded
    /// [`Uniform`] height generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use kv_skiplist::SkipList;
    ///
    /// let list: SkipList<i64, String> = SkipList::new();
    /// assert_eq!(list.height(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(DEFAULT_MAX_HEIGHT, true, Uniform::new())
    }
}

impl<K, V, G> SkipList<K, V, G> {
    /// Create a new skiplist drawing tower heights from `generator`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroMaxHeight`] if `max_height` is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use kv_skiplist::{Sequence, SkipList};
    ///
    /// let list = SkipList::with_generator(4, Sequence::new([4, 1]))?;
    /// list.insert("a", 1);
    /// assert_eq!(list.height(), 4);
    /// # Ok::<(), kv_skiplist::Error>(())
    /// ```
    #[inline]
    pub fn with_generator(max_height: usize, generator: G) -> Result<Self> {
        if max_height == 0 {
            return Err(Error::ZeroMaxHeight);
        }
        Ok(Self::from_parts(max_height, true, generator))
    }

    pub(crate) fn from_parts(max_height: usize, grow_max_height: bool, generator: G) -> Self {
        SkipList {
            inner: RwLock::new(Levels::new(max_height, grow_max_height, generator)),
        }
    }

    /// Returns the number of distinct keys in the skiplist.
    ///
    /// # Examples
    ///
    /// ```
    /// use kv_skiplist::SkipList;
    ///
    /// let list = SkipList::new();
    /// list.insert(1, 'a');
    /// list.insert(1, 'b');
    /// list.insert(2, 'c');
    /// assert_eq!(list.len(), 2);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the skiplist contains no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of levels currently in the skiplist.
    ///
    /// The height starts at 1 and only grows, when an insert draws a tower
    /// taller than the current height.
    #[inline]
    pub fn height(&self) -> usize {
        self.inner.read().height()
    }

    /// Returns the current upper bound on the height of new towers.
    #[inline]
    pub fn max_height(&self) -> usize {
        self.inner.read().max_height()
    }

    /// Sets the upper bound on the height of new towers.
    ///
    /// Existing towers and levels are left untouched, even if they are taller
    /// than the new bound.  Unless disabled through
    /// [`SkipListOptions::grow_max_height`][crate::SkipListOptions::grow_max_height],
    /// later inserts may raise the bound again as the list grows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroMaxHeight`] if `max_height` is 0, leaving the
    /// current bound in place.
    #[inline]
    pub fn set_max_height(&self, max_height: usize) -> Result<()> {
        if max_height == 0 {
            return Err(Error::ZeroMaxHeight);
        }
        self.inner.write().set_max_height(max_height);
        Ok(())
    }
}

impl<K, V, G> SkipList<K, V, G>
where
    K: Ord + Clone,
    V: Clone,
{
    /// Returns the entry with the largest key less than or equal to `key`, or
    /// [`Floor::Sentinel`] if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use kv_skiplist::{Floor, SkipList};
    ///
    /// let list = SkipList::new();
    /// list.insert(10, "ten");
    /// list.insert(20, "twenty");
    ///
    /// assert_eq!(list.search(&20), Floor::Entry(20, "twenty"));
    /// assert_eq!(list.search(&15), Floor::Entry(10, "ten"));
    /// assert_eq!(list.search(&5), Floor::Sentinel);
    /// ```
    pub fn search(&self, key: &K) -> Floor<K, V> {
        let levels = self.inner.read();
        let (floor, _) = levels.floor_search(key);
        match levels.node(floor).entry.as_ref() {
            Some((k, v)) => Floor::Entry(k.clone(), v.clone()),
            None => Floor::Sentinel,
        }
    }

    /// Returns the value stored for exactly `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kv_skiplist::SkipList;
    ///
    /// let list = SkipList::new();
    /// list.insert(10, "ten");
    /// assert_eq!(list.get(&10), Some("ten"));
    /// assert_eq!(list.get(&11), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<V> {
        match self.search(key) {
            Floor::Entry(k, v) if k == *key => Some(v),
            _ => None,
        }
    }

    /// Returns `true` if the skiplist holds `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        let levels = self.inner.read();
        let (floor, _) = levels.floor_search(key);
        levels.node(floor).key() == Some(key)
    }

    /// Removes `key` from the skiplist, returning `true` if it was present.
    ///
    /// Levels which no longer hold any key are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use kv_skiplist::SkipList;
    ///
    /// let list = SkipList::new();
    /// list.insert(1, ());
    /// assert!(list.remove(&1));
    /// assert!(!list.remove(&1));
    /// ```
    pub fn remove(&self, key: &K) -> bool {
        self.inner.write().remove(key)
    }
}

impl<K, V, G> SkipList<K, V, G>
where
    K: Ord + Clone,
    V: Clone,
    G: LevelGenerator,
{
    /// Inserts the pair, returning `true` if `key` was not yet present.
    ///
    /// If the key already exists its value is replaced, on every level of its
    /// tower, and `false` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use kv_skiplist::SkipList;
    ///
    /// let list = SkipList::new();
    /// assert!(list.insert(1, "Hello"));
    /// assert!(!list.insert(1, "World"));
    /// assert_eq!(list.get(&1), Some("World"));
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn insert(&self, key: K, value: V) -> bool {
        self.inner.write().insert(key, value)
    }
}

#[cfg(test)]
impl<K, V, G> SkipList<K, V, G>
where
    K: Ord + Clone + fmt::Debug,
    V: Clone,
{
    fn check(&self) {
        self.inner.read().check();
    }

    pub(crate) fn structure(&self) -> String {
        self.inner.read().structure()
    }

    fn tower_values(&self, key: &K) -> Vec<V> {
        self.inner.read().tower_values(key)
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K, V> Default for SkipList<K, V, Uniform> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, G> fmt::Debug for SkipList<K, V, G>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels = self.inner.read();
        let mut result = write!(f, "[");
        let mut first = true;
        levels.for_each_entry(|k, v| {
            if result.is_err() {
                return;
            }
            if !first {
                result = write!(f, ", ");
            }
            first = false;
            if result.is_ok() {
                result = write!(f, "({k:?}, {v:?})");
            }
        });
        result?;
        write!(f, "]")
    }
}

impl<K, V, G> iter::Extend<(K, V)> for SkipList<K, V, G>
where
    K: Ord + Clone,
    V: Clone,
    G: LevelGenerator,
{
    #[inline]
    fn extend<I: iter::IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        let levels = self.inner.get_mut();
        for (key, value) in iterable {
            levels.insert(key, value);
        }
    }
}

impl<K, V> iter::FromIterator<(K, V)> for SkipList<K, V, Uniform>
where
    K: Ord + Clone,
    V: Clone,
{
    #[inline]
    fn from_iter<I>(iter: I) -> Self
    where
        I: iter::IntoIterator<Item = (K, V)>,
    {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}
