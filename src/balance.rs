//! Balancing strategies plugged into [`TreeMap`].

use tracing::trace;

use crate::map::TreeMap;
use crate::node::{Link, NodeId};

/// Largest height difference tolerated between the two subtrees of a node.
const ALLOWED_IMBALANCE: isize = 1;

mod sealed {
    pub trait Sealed {}
}

/// Hook deciding how a [`TreeMap`] keeps its shape across mutations.
///
/// Implemented by [`Unbalanced`] and [`Avl`] only. Node handles used by the
/// hook methods stay private to this crate:
///
/// ```compile_fail
/// use bstmap::NodeId;
/// ```
pub trait Balance: sealed::Sealed + Sized {
    /// Whether cached node heights are kept up to date.
    #[doc(hidden)]
    const TRACKS_HEIGHT: bool;

    /// Called once a new leaf has been linked into the tree.
    #[doc(hidden)]
    fn after_insert<K, V>(map: &mut TreeMap<K, V, Self>, node: NodeId);

    /// Takes the entry stored at `node` out of the tree structure.
    /// Returns the detached node that now holds that entry.
    #[doc(hidden)]
    fn detach<K, V>(map: &mut TreeMap<K, V, Self>, node: NodeId) -> NodeId;
}

/// Plain binary search tree: no height bookkeeping, no rotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unbalanced;

/// AVL tree: heights are tracked and rotations keep the subtrees of every
/// node within one level of each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Avl;

impl sealed::Sealed for Unbalanced {}
impl sealed::Sealed for Avl {}

impl Balance for Unbalanced {
    const TRACKS_HEIGHT: bool = false;

    fn after_insert<K, V>(_map: &mut TreeMap<K, V, Self>, _node: NodeId) {}

    fn detach<K, V>(map: &mut TreeMap<K, V, Self>, node: NodeId) -> NodeId {
        map.unlink_by_transplant(node)
    }
}

impl Balance for Avl {
    const TRACKS_HEIGHT: bool = true;

    fn after_insert<K, V>(map: &mut TreeMap<K, V, Self>, node: NodeId) {
        let parent = map.nodes[node].parent;
        map.rebalance_once(parent);
    }

    fn detach<K, V>(map: &mut TreeMap<K, V, Self>, node: NodeId) -> NodeId {
        let (detached, parent) = map.unlink_by_successor_swap(node);
        map.rebalance(parent);
        detached
    }
}

impl<K, V> TreeMap<K, V, Avl> {
    /// Unlinks the entry at `node`. With two children the in-order successor's
    /// entry is swapped into `node` first and the successor, which has no left
    /// child, is unlinked instead.
    /// Returns the detached node and its former parent.
    fn unlink_by_successor_swap(&mut self, node: NodeId) -> (NodeId, Link) {
        let victim = match (self.nodes[node].left, self.nodes[node].right) {
            (Some(_), Some(right)) => {
                let successor = self.minimum(right);
                self.nodes.swap_entries(node, successor);
                successor
            }
            _ => node,
        };

        let parent = self.nodes[victim].parent;
        let child = self.nodes[victim].left.or(self.nodes[victim].right);
        self.transplant(victim, child);
        self.isolate(victim);
        (victim, parent)
    }

    /// Left child of `k2` becomes the subtree root, `k2` its right child.
    fn rotate_with_left_child(&mut self, k2: NodeId) -> NodeId {
        let Some(k1) = self.nodes[k2].left else {
            return k2;
        };
        trace!("rotate with left child");

        let inner = self.nodes[k1].right;
        self.nodes[k2].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(k2);
        }

        self.transplant(k2, Some(k1));
        self.nodes[k1].right = Some(k2);
        self.nodes[k2].parent = Some(k1);

        self.adjust_height(k2);
        self.adjust_height(k1);
        k1
    }

    /// Right child of `k1` becomes the subtree root, `k1` its left child.
    fn rotate_with_right_child(&mut self, k1: NodeId) -> NodeId {
        let Some(k2) = self.nodes[k1].right else {
            return k1;
        };
        trace!("rotate with right child");

        let inner = self.nodes[k2].left;
        self.nodes[k1].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(k1);
        }

        self.transplant(k1, Some(k2));
        self.nodes[k2].left = Some(k1);
        self.nodes[k1].parent = Some(k2);

        self.adjust_height(k1);
        self.adjust_height(k2);
        k2
    }

    // Left-right case
    fn double_with_left_child(&mut self, k3: NodeId) -> NodeId {
        if let Some(left) = self.nodes[k3].left {
            self.rotate_with_right_child(left);
        }
        self.rotate_with_left_child(k3)
    }

    // Right-left case
    fn double_with_right_child(&mut self, k3: NodeId) -> NodeId {
        if let Some(right) = self.nodes[k3].right {
            self.rotate_with_left_child(right);
        }
        self.rotate_with_right_child(k3)
    }

    /// Rebalances nodes starting from given position up to the root node.
    fn rebalance(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(node) = current {
            let parent = self.nodes[node].parent;
            self.rebalance_node(node);
            current = parent;
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    /// Stops after first rebalance operation.
    /// This is enough to restore balance after a single insert operation.
    fn rebalance_once(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(node) = current {
            let parent = self.nodes[node].parent;
            if self.rebalance_node(node) {
                break;
            }
            current = parent;
        }
    }

    /// Restores AVL condition (balance) at given node if necessary and adjusts height.
    /// Resulting balance will be +1, 0 or -1 height difference between left and right subtree.
    /// Initial balance must not exceed +2 or -2, which always holds after a single update.
    /// Returns whether rebalancing had been necessary.
    fn rebalance_node(&mut self, node: NodeId) -> bool {
        let (left, right) = (self.nodes[node].left, self.nodes[node].right);
        let left_height = self.height_of(left);
        let right_height = self.height_of(right);
        debug_assert!(left_height <= right_height + ALLOWED_IMBALANCE + 1);
        debug_assert!(right_height <= left_height + ALLOWED_IMBALANCE + 1);

        match (left, right) {
            (Some(left), _) if left_height - right_height > ALLOWED_IMBALANCE => {
                let outer = self.height_of(self.nodes[left].left);
                let inner = self.height_of(self.nodes[left].right);
                if outer >= inner {
                    self.rotate_with_left_child(node);
                } else {
                    self.double_with_left_child(node);
                }
                true
            }
            (_, Some(right)) if right_height - left_height > ALLOWED_IMBALANCE => {
                let outer = self.height_of(self.nodes[right].right);
                let inner = self.height_of(self.nodes[right].left);
                if outer >= inner {
                    self.rotate_with_right_child(node);
                } else {
                    self.double_with_right_child(node);
                }
                true
            }
            _ => {
                self.adjust_height(node);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::map::{AvlTreeMap, BstMap};

    #[test]
    fn test_single_rotation_on_ascending_insert() {
        // 1 ->    2
        //  \     / \
        //   2   1   3
        //    \
        //     3
        let mut map = AvlTreeMap::new();
        for key in [1, 2, 3] {
            map.put(key, key);
        }
        map.check_consistency();
        assert_eq!(map.preorder(), "[2=2, 1=1, 3=3]");
        assert_eq!(map.height(), 1);
    }

    #[test]
    fn test_rotation_of_root_updates_root_link() {
        let mut map = AvlTreeMap::new();
        for key in [3, 2, 1] {
            map.put(key, ());
        }
        let root = map.root.unwrap();
        assert_eq!(map.nodes[root].key, 2);
        assert!(map.nodes[root].parent.is_none());
    }

    #[test]
    fn test_rebalance_after_bulk_build() {
        // Bulk construction must leave correct heights behind, otherwise the
        // rotation below would pick the wrong case.
        let mut map = AvlTreeMap::from_sorted((1..=3).map(|k| (k, k))).unwrap();
        map.check_consistency();
        map.put(4, 4);
        map.put(5, 5);
        map.check_consistency();
        assert_eq!(map.preorder(), "[2=2, 1=1, 4=4, 3=3, 5=5]");
    }

    #[test]
    fn test_removal_swaps_successor_entry() {
        let mut map: AvlTreeMap<i32, i32> = [5, 3, 8, 1, 4, 7, 9].into_iter().map(|k| (k, k * 10)).collect();
        let root = map.root.unwrap();
        assert_eq!(map.remove(&5), Some(50));
        map.check_consistency();
        // Root node keeps its position and now carries the successor.
        assert_eq!(map.root, Some(root));
        assert_eq!(map.nodes[root].key, 7);
        assert_eq!(map.nodes[root].value, 70);
    }

    #[test]
    fn test_unbalanced_degenerates() {
        let map: BstMap<i32, ()> = (0..100).map(|k| (k, ())).collect();
        map.check_consistency();
        assert_eq!(map.height(), 99);
    }
}
