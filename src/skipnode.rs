use crate::arena::NodeId;

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// SkipNodes make up the levels of the skiplist.  Each node sits on exactly one
/// level and is linked four ways:
///
/// - `prev` / `next` point to its horizontal neighbours on the same level;
/// - `above` / `below` point to the node for the same key on the adjacent
///   levels, forming the key's *tower*.
///
/// A node without an entry is a sentinel.  Every level starts with a head
/// sentinel (negative infinity) and ends with a tail sentinel (positive
/// infinity), and the sentinels of consecutive levels are stacked on top of
/// each other just like the towers of real keys.
#[derive(Clone, Debug)]
pub(crate) struct SkipNode<K, V> {
    // The key-value pair, which is only `None` for sentinels.
    pub entry: Option<(K, V)>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    pub above: Option<NodeId>,
    pub below: Option<NodeId>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K, V> SkipNode<K, V> {
    /// Create a new, unlinked sentinel.
    pub fn sentinel() -> Self {
        SkipNode {
            entry: None,
            prev: None,
            next: None,
            above: None,
            below: None,
        }
    }

    /// Create a new, unlinked node holding the given pair.
    pub fn new(key: K, value: V) -> Self {
        SkipNode {
            entry: Some((key, value)),
            ..SkipNode::sentinel()
        }
    }

    pub fn key(&self) -> Option<&K> {
        self.entry.as_ref().map(|(k, _)| k)
    }

    /// Replaces the value carried by the node, if it is not a sentinel.
    pub fn set_value(&mut self, value: V) {
        if let Some((_, v)) = self.entry.as_mut() {
            *v = value;
        }
    }
}

// Inspection helpers for the integrity checks.
#[cfg(test)]
impl<K, V> SkipNode<K, V> {
    /// Returns `true` if the node is a head or tail sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.entry.is_none()
    }

    /// Returns `true` if the node is the head sentinel of its level.
    pub fn is_head(&self) -> bool {
        self.is_sentinel() && self.prev.is_none()
    }

    /// Returns `true` if the node is the tail sentinel of its level.
    pub fn is_tail(&self) -> bool {
        self.is_sentinel() && self.next.is_none()
    }

    pub fn value(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, v)| v)
    }
}

impl<K, V> SkipNode<K, V>
where
    K: Ord,
{
    /// Whether a floor search for `target` may step onto this node.
    ///
    /// Sentinels never qualify: the head is only ever the starting point and
    /// the tail is an upper bound for every key.
    pub fn is_at_or_before(&self, target: &K) -> bool {
        self.key().is_some_and(|key| key <= target)
    }
}
