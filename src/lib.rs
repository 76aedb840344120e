//! A skiplist is a way of storing elements in such a way that elements can be
//! efficiently accessed, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, a skiplist resembles something like:
//!
//! ```text
//! -oo ------------> 2 ------------------------> 9 --> +oo
//!  |                |                           |      |
//! -oo ------------> 2 -------> 5 --> 7 -------> 9 --> +oo
//!  |                |          |     |          |      |
//! -oo --> 1 ------> 2 --> 4 -> 5 --> 7 --> 8 -> 9 --> +oo
//! ```
//!
//! where each key is stored as a vertical *tower* of nodes, and each level is
//! a doubly linked chain bounded by two sentinels.  The upper levels allow a
//! search to skip ahead before descending to level 0.
//!
//! [`SkipList`] is an ordered key-value map built this way.  Its lookups use
//! *floor* semantics: [`SkipList::search`] returns the entry with the largest
//! key less than or equal to the query, or [`Floor::Sentinel`] if there is
//! none.  The list can be shared between threads: mutations are serialised by
//! a single lock, and searches share it.
//!
//! Levels are added on demand, whenever an insert draws a tower taller than
//! the current height, and they are never removed.
//!
//! ```
//! use kv_skiplist::{Floor, SkipList};
//!
//! let list = SkipList::new();
//! list.insert(1, 12);
//! list.insert(4, 13);
//! list.insert(5, 53);
//! list.insert(-2, 2);
//!
//! assert_eq!(list.search(&0), Floor::Entry(-2, 2));
//! assert_eq!(list.search(&6), Floor::Entry(5, 53));
//! assert!(list.remove(&5));
//! assert_eq!(list.search(&5), Floor::Entry(4, 13));
//! ```

mod arena;
mod error;
mod level_generator;
mod levels;
mod options;
mod skiplist;
mod skipnode;
#[cfg(test)]
mod test_utils;

pub use error::{Error, Result};
pub use level_generator::{LevelGenerator, Sequence, Uniform};
pub use options::{DEFAULT_MAX_HEIGHT, SkipListOptions};
pub use skiplist::{Floor, SkipList};
