//! The unsynchronised skip-list engine.
//!
//! Conceptually the structure looks like:
//!
//! ```text
//! -oo ------------> 2 ------------------------> 9 --> +oo
//!  |                |                           |      |
//! -oo ------------> 2 -------> 5 --> 7 -------> 9 --> +oo
//!  |                |          |     |          |      |
//! -oo --> 1 ------> 2 --> 4 -> 5 --> 7 --> 8 -> 9 --> +oo
//! ```
//!
//! Every level is a doubly linked chain bounded by a pair of sentinels, and
//! every key is a tower of nodes linked vertically through `above` and
//! `below`.  All nodes are owned by a single [`NodeArena`]; the engine only
//! keeps the id of the head sentinel of the top level.
//!
//! [`Levels`] provides no synchronisation of its own, [`SkipList`] wraps it in
//! a lock.
//!
//! [`SkipList`]: crate::SkipList

use tracing::{debug, trace};

use crate::{
    arena::{NodeArena, NodeId},
    level_generator::LevelGenerator,
    skipnode::SkipNode,
};

/// The expected number of levels for a list holding `len` keys, namely
/// `floor(log2(len)) + 2`.
#[expect(
    clippy::as_conversions,
    reason = "ilog2 of a usize always fits in a usize"
)]
pub(crate) fn expected_height(len: usize) -> usize {
    if len == 0 {
        1
    } else {
        len.ilog2() as usize + 2
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Levels
// ////////////////////////////////////////////////////////////////////////////

pub(crate) struct Levels<K, V, G> {
    arena: NodeArena<SkipNode<K, V>>,
    // Head sentinel of the top-most level.
    head: NodeId,
    // Number of levels.
    height: usize,
    // Number of distinct keys.
    len: usize,
    // Upper bound on the drawn tower heights.
    max_height: usize,
    // Whether inserts raise `max_height` to `expected_height(len)`.
    grow_max_height: bool,
    generator: G,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K, V, G> Levels<K, V, G> {
    /// Create an empty list made of a single level holding only its two
    /// sentinels.
    ///
    /// `max_height` is expected to have been validated by the caller.
    pub fn new(max_height: usize, grow_max_height: bool, generator: G) -> Self {
        let mut arena = NodeArena::new();
        let head = arena.alloc(SkipNode::sentinel());
        let tail = arena.alloc(SkipNode::sentinel());
        arena.get_mut(head).next = Some(tail);
        arena.get_mut(tail).prev = Some(head);
        Levels {
            arena,
            head,
            height: 1,
            len: 0,
            max_height,
            grow_max_height,
            generator,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }

    pub fn set_max_height(&mut self, max_height: usize) {
        self.max_height = max_height;
    }

    pub fn node(&self, id: NodeId) -> &SkipNode<K, V> {
        self.arena.get(id)
    }

    /// Head sentinel of the bottom level.
    fn bottom_head(&self) -> NodeId {
        let mut current = self.head;
        while let Some(below) = self.arena.get(current).below {
            current = below;
        }
        current
    }

    /// Stack a new, empty level on top of the current top level.
    ///
    /// The new head sits above the current head, and the new tail above the
    /// current top level's tail, which is found by walking the top level to
    /// its end.
    fn build_extra_layer(&mut self) {
        let old_head = self.head;
        let mut old_tail = old_head;
        while let Some(next) = self.arena.get(old_tail).next {
            old_tail = next;
        }

        let new_head = self.arena.alloc(SkipNode::sentinel());
        let new_tail = self.arena.alloc(SkipNode::sentinel());
        {
            let node = self.arena.get_mut(new_head);
            node.next = Some(new_tail);
            node.below = Some(old_head);
        }
        {
            let node = self.arena.get_mut(new_tail);
            node.prev = Some(new_head);
            node.below = Some(old_tail);
        }
        self.arena.get_mut(old_head).above = Some(new_head);
        self.arena.get_mut(old_tail).above = Some(new_tail);

        self.head = new_head;
        self.height += 1;
        debug!(height = self.height, "added level");
    }
}

impl<K, V, G> Levels<K, V, G>
where
    K: Ord,
{
    /// Finds the node with the largest key less than or equal to `target`.
    ///
    /// Returns the bottom-level node reached together with the descent path:
    /// the last node visited on each level, ordered from the top level down
    /// to level 0.  If no key is at or before `target`, the returned node is
    /// the head sentinel of level 0.
    pub fn floor_search(&self, target: &K) -> (NodeId, Vec<NodeId>) {
        let mut path = Vec::with_capacity(self.height);
        let mut current = self.head;
        loop {
            while let Some(next) = self.arena.get(current).next {
                if !self.arena.get(next).is_at_or_before(target) {
                    break;
                }
                current = next;
            }
            path.push(current);
            match self.arena.get(current).below {
                Some(below) => current = below,
                None => return (current, path),
            }
        }
    }

    /// Returns the floor node of `target` if it holds exactly `target`.
    fn find_exact(&self, target: &K) -> Option<NodeId> {
        let (floor, _) = self.floor_search(target);
        (self.arena.get(floor).key() == Some(target)).then_some(floor)
    }

    /// Removes `key`'s tower, returning whether the key was present.
    ///
    /// Levels emptied by the removal are kept: the height of the list never
    /// decreases.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(bottom) = self.find_exact(key) else {
            return false;
        };

        let mut current = Some(bottom);
        while let Some(id) = current {
            let node = self.arena.free(id);
            if let Some(prev) = node.prev {
                self.arena.get_mut(prev).next = node.next;
            }
            if let Some(next) = node.next {
                self.arena.get_mut(next).prev = node.prev;
            }
            current = node.above;
        }
        self.len -= 1;
        trace!(len = self.len, "removed key");
        true
    }
}

impl<K, V, G> Levels<K, V, G>
where
    K: Ord + Clone,
    V: Clone,
    G: LevelGenerator,
{
    /// Inserts the pair, returning `true` if the key is new.
    ///
    /// If the key is already present, its value is overwritten on every node
    /// of its tower and no structural change takes place.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let (floor, mut path) = self.floor_search(&key);

        if self.arena.get(floor).key() == Some(&key) {
            let mut current = Some(floor);
            while let Some(id) = current {
                let node = self.arena.get_mut(id);
                node.set_value(value.clone());
                current = node.above;
            }
            trace!("overwrote existing key");
            return false;
        }

        let max_height = self.max_height.max(1);
        let tower = self.generator.height(max_height).clamp(1, max_height);
        if tower > self.height {
            while self.height < tower {
                self.build_extra_layer();
            }
            // The path no longer starts at the top level.
            path = self.floor_search(&key).1;
        }

        let mut below: Option<NodeId> = None;
        for &prev in path.iter().rev().take(tower) {
            let next = self.arena.get(prev).next;
            let id = self.arena.alloc(SkipNode::new(key.clone(), value.clone()));
            {
                let node = self.arena.get_mut(id);
                node.prev = Some(prev);
                node.next = next;
                node.below = below;
            }
            self.arena.get_mut(prev).next = Some(id);
            if let Some(next) = next {
                self.arena.get_mut(next).prev = Some(id);
            }
            if let Some(below) = below {
                self.arena.get_mut(below).above = Some(id);
            }
            below = Some(id);
        }

        self.len += 1;
        trace!(len = self.len, tower, "inserted key");

        if self.grow_max_height {
            let expected = expected_height(self.len);
            if expected > self.max_height {
                debug!(
                    from = self.max_height,
                    to = expected,
                    "raised max height"
                );
                self.max_height = expected;
            }
        }
        true
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

impl<K, V, G> Levels<K, V, G> {
    /// Visits every entry of level 0 in ascending key order.
    pub fn for_each_entry(&self, mut f: impl FnMut(&K, &V)) {
        let mut current = self.arena.get(self.bottom_head()).next;
        while let Some(id) = current {
            let node = self.arena.get(id);
            if let Some((k, v)) = node.entry.as_ref() {
                f(k, v);
            }
            current = node.next;
        }
    }
}

#[cfg(test)]
impl<K, V, G> Levels<K, V, G>
where
    K: Ord + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Returns the value stored on every level of `key`'s tower, bottom first.
    pub fn tower_values(&self, key: &K) -> Vec<V> {
        let mut values = Vec::new();
        let (floor, _) = self.floor_search(key);
        if self.arena.get(floor).key() != Some(key) {
            return values;
        }
        let mut current = Some(floor);
        while let Some(id) = current {
            let node = self.arena.get(id);
            values.extend(node.value().cloned());
            current = node.above;
        }
        values
    }

    /// Checks the integrity of the skiplist.
    ///
    /// # Panics
    ///
    /// Panics if any structural invariant is broken.
    pub fn check(&self) {
        let mut level_head = Some(self.head);
        let mut levels = 0;
        let mut live = 0;
        while let Some(head) = level_head {
            levels += 1;
            let head_node = self.arena.get(head);
            assert!(head_node.is_head(), "level {levels} starts with {head:?}");

            let mut current = head;
            let mut last_key: Option<&K> = None;
            loop {
                live += 1;
                let node = self.arena.get(current);

                // Horizontal links are symmetric.
                if let Some(next) = node.next {
                    assert_eq!(self.arena.get(next).prev, Some(current));
                }
                // Vertical links are symmetric and stay on the same key.
                if let Some(below) = node.below {
                    let below_node = self.arena.get(below);
                    assert_eq!(below_node.above, Some(current));
                    assert_eq!(below_node.key(), node.key());
                } else {
                    assert!(head_node.below.is_none(), "tower gap at {current:?}");
                }
                if let Some(above) = node.above {
                    assert_eq!(self.arena.get(above).below, Some(current));
                }

                if let Some(key) = node.key() {
                    if let Some(last) = last_key {
                        assert!(last < key, "{last:?} is not before {key:?}");
                    }
                    last_key = Some(key);
                }

                match node.next {
                    Some(next) => current = next,
                    None => break,
                }
            }
            let tail = self.arena.get(current);
            assert!(tail.is_tail(), "level {levels} ends with {current:?}");
            if let Some(below) = head_node.below {
                assert_eq!(
                    tail.below.map(|id| self.arena.get(id).is_tail()),
                    Some(true)
                );
                assert!(self.arena.get(below).is_head());
            }

            level_head = head_node.below;
        }
        assert_eq!(levels, self.height);
        assert_eq!(live, self.arena.live());

        let mut bottom = 0;
        self.for_each_entry(|_, _| bottom += 1);
        assert_eq!(bottom, self.len);
    }

    /// Renders all levels, top first, with every tower in its own column.
    ///
    /// ```text
    /// -oo---2--+oo
    /// -oo--1--2--+oo
    /// ```
    pub fn structure(&self) -> String {
        // One column per level-0 node, including both sentinels.
        let mut columns: Vec<(String, usize)> = Vec::new();
        let mut current = Some(self.bottom_head());
        while let Some(id) = current {
            let node = self.arena.get(id);
            let label = match node.key() {
                Some(key) => format!("{key:?}"),
                None if node.prev.is_none() => "-oo".to_owned(),
                None => "+oo".to_owned(),
            };
            let mut tower = 1;
            let mut above = node.above;
            while let Some(up) = above {
                tower += 1;
                above = self.arena.get(up).above;
            }
            columns.push((label, tower));
            current = node.next;
        }

        (0..self.height)
            .rev()
            .map(|level| {
                columns
                    .iter()
                    .map(|(label, tower)| {
                        if level < *tower {
                            label.clone()
                        } else {
                            "-".repeat(label.len())
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("--")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Levels, expected_height};
    use crate::{level_generator::Sequence, test_utils::init_tracing};

    fn levels(heights: impl IntoIterator<Item = usize>) -> Levels<i32, i32, Sequence> {
        init_tracing();
        Levels::new(10, false, Sequence::new(heights))
    }

    /// Builds
    ///
    /// ```text
    /// -oo--2-----------9--+oo
    /// -oo--2-----5--7--9--+oo
    /// -oo--2--4--5--7--9--+oo
    /// ```
    fn fixture() -> Levels<i32, i32, Sequence> {
        let mut list = levels([3, 1, 2, 2, 3]);
        for key in [2, 4, 5, 7, 9] {
            assert!(list.insert(key, key * 10));
        }
        list.check();
        list
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 2)]
    #[case(2, 3)]
    #[case(3, 3)]
    #[case(4, 4)]
    #[case(1023, 11)]
    #[case(1024, 12)]
    fn expected_heights(#[case] len: usize, #[case] height: usize) {
        assert_eq!(expected_height(len), height);
    }

    #[test]
    fn empty() {
        let list = levels([1]);
        list.check();
        assert_eq!(list.len(), 0);
        assert_eq!(list.height(), 1);
        let (floor, path) = list.floor_search(&0);
        assert!(list.node(floor).is_head());
        assert_eq!(path, [floor]);
        assert_snapshot!(list.structure(), @"-oo--+oo");
    }

    #[test]
    fn fixture_structure() {
        let list = fixture();
        assert_eq!(list.height(), 3);
        assert_snapshot!(list.structure(), @r"
        -oo--2-----------9--+oo
        -oo--2-----5--7--9--+oo
        -oo--2--4--5--7--9--+oo
        ");
    }

    #[rstest]
    #[case(6, Some(5))]
    #[case(5, Some(5))]
    #[case(10, Some(9))]
    #[case(3, Some(2))]
    #[case(8, Some(7))]
    #[case(1, None)]
    #[case(i32::MIN, None)]
    fn floor_search(#[case] target: i32, #[case] expected: Option<i32>) {
        let list = fixture();
        let (floor, path) = list.floor_search(&target);
        assert_eq!(list.node(floor).key().copied(), expected);
        assert_eq!(list.node(floor).is_sentinel(), expected.is_none());
        assert_eq!(path.len(), list.height());
        assert_eq!(path.last(), Some(&floor));
    }

    #[test]
    fn floor_search_path() {
        let list = fixture();
        let (_, path) = list.floor_search(&6);
        let keys: Vec<_> = path.iter().map(|&id| list.node(id).key().copied()).collect();
        assert_eq!(keys, [Some(2), Some(5), Some(5)]);

        let (_, path) = list.floor_search(&1);
        assert!(path.iter().all(|&id| list.node(id).is_head()));
    }

    #[test]
    fn insert_grows_levels() {
        let mut list = levels([1, 4, 2]);
        assert!(list.insert(1, 1));
        assert_eq!(list.height(), 1);
        assert!(list.insert(2, 2));
        assert_eq!(list.height(), 4);
        assert!(list.insert(3, 3));
        assert_eq!(list.height(), 4);
        list.check();
        assert_snapshot!(list.structure(), @r"
        -oo-----2-----+oo
        -oo-----2-----+oo
        -oo-----2--3--+oo
        -oo--1--2--3--+oo
        ");
    }

    #[test]
    fn insert_overwrites_whole_tower() {
        let mut list = fixture();
        assert_eq!(list.tower_values(&2), [20, 20, 20]);

        assert!(!list.insert(2, -1));
        assert!(!list.insert(2, -2));
        assert_eq!(list.len(), 5);
        assert_eq!(list.tower_values(&2), [-2, -2, -2]);
        list.check();
    }

    #[test]
    fn remove() {
        let mut list = fixture();
        assert!(list.remove(&5));
        assert!(!list.remove(&5));
        assert!(!list.remove(&6));
        assert_eq!(list.len(), 4);
        list.check();
        assert_snapshot!(list.structure(), @r"
        -oo--2--------9--+oo
        -oo--2-----7--9--+oo
        -oo--2--4--7--9--+oo
        ");

        let (floor, _) = list.floor_search(&5);
        assert_eq!(list.node(floor).key(), Some(&4));
    }

    #[test]
    fn remove_keeps_levels() {
        let mut list = fixture();
        for key in [2, 4, 5, 7, 9] {
            assert!(list.remove(&key));
        }
        list.check();
        assert_eq!(list.len(), 0);
        assert_eq!(list.height(), 3);
        assert_snapshot!(list.structure(), @r"
        -oo--+oo
        -oo--+oo
        -oo--+oo
        ");
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut list = fixture();
        let live = list.arena.live();
        assert!(list.remove(&9));
        assert_eq!(list.arena.live(), live - 3);
        // Next draw from the fixture sequence is 3 again.
        assert!(list.insert(9, 90));
        assert_eq!(list.arena.live(), live);
        list.check();
    }

    #[test]
    fn tower_clamped_to_max_height() {
        let mut list = Levels::new(2, false, Sequence::new([0, 7]));
        assert!(list.insert(1, 1));
        assert_eq!(list.height(), 1);
        assert_eq!(list.tower_values(&1).len(), 1);
        assert!(list.insert(2, 2));
        assert_eq!(list.height(), 2);
        assert_eq!(list.tower_values(&2).len(), 2);
        list.check();
    }

    #[test]
    fn max_height_grows_with_len() {
        init_tracing();
        let mut list = Levels::new(2, true, Sequence::new([1]));
        for (key, expected) in [(0, 2), (1, 3), (2, 3), (3, 4)] {
            assert!(list.insert(key, key));
            assert_eq!(list.max_height(), expected);
        }
        for key in 0..4 {
            assert!(list.remove(&key));
        }
        assert_eq!(list.max_height(), 4);
    }

    #[test]
    fn max_height_fixed() {
        let mut list = levels([1]);
        for key in 0..1000 {
            list.insert(key, key);
        }
        assert_eq!(list.max_height(), 10);
    }

    #[test]
    fn for_each_entry_in_order() {
        let mut list = levels([2, 1, 3]);
        for key in [5, -3, 8, 0, 2] {
            list.insert(key, key * 2);
        }
        let mut entries = Vec::new();
        list.for_each_entry(|&k, &v| entries.push((k, v)));
        assert_eq!(entries, [(-3, -6), (0, 0), (2, 4), (5, 10), (8, 16)]);
    }
}
