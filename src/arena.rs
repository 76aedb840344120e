//! Index arena backing the node graph.
//!
//! Every node of every level lives in a single growable vector and refers to
//! its neighbours by [`NodeId`] rather than by address. A released slot is
//! pushed onto a free list and handed out again by the next allocation, so
//! ids stay stable for as long as the node they name is linked.

use std::fmt;

/// Stable handle to a slot in a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Contiguous storage for nodes with slot recycling.
#[derive(Debug)]
pub(crate) struct NodeArena<T> {
    /// `None` marks a released slot that sits on the free list.
    slots: Vec<Option<T>>,
    free_list: Vec<NodeId>,
}

impl<T> NodeArena<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `node`, reusing a released slot when one is available.
    pub(crate) fn alloc(&mut self, node: T) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.slots[id.0] = Some(node);
            id
        } else {
            let id = NodeId(self.slots.len());
            self.slots.push(Some(node));
            id
        }
    }

    /// Release the slot behind `id`, returning the node it held.
    ///
    /// # Panics
    ///
    /// Panics if `id` was already released.
    pub(crate) fn free(&mut self, id: NodeId) -> T {
        let Some(node) = self.slots[id.0].take() else {
            panic!("double free of arena slot {id:?}");
        };
        self.free_list.push(id);
        node
    }

    /// # Panics
    ///
    /// Panics if `id` names a released slot.
    pub(crate) fn get(&self, id: NodeId) -> &T {
        match &self.slots[id.0] {
            Some(node) => node,
            None => panic!("use of released arena slot {id:?}"),
        }
    }

    /// # Panics
    ///
    /// Panics if `id` names a released slot.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        match &mut self.slots[id.0] {
            Some(node) => node,
            None => panic!("use of released arena slot {id:?}"),
        }
    }

    /// Number of live nodes.
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }
}
