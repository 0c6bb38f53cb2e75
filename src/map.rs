use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::mem;

use tracing::{debug, trace};

use crate::balance::{Avl, Balance, Unbalanced};
use crate::error::{Error, Result};
use crate::node::{Arena, Link, NodeId, Side};
use crate::traverse::Order;

/// An ordered map implemented with a binary search tree.
///
/// The balancing strategy `B` decides what happens after a structural change:
/// [`Unbalanced`] leaves the tree shape as it is, [`Avl`] restores the AVL
/// condition with rotations. Search, traversal and metrics are shared.
///
/// ```
/// use bstmap::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// assert_eq!(map.put(1, "one"), None);
/// assert_eq!(map.put(1, "uno"), Some("one"));
/// assert_eq!(map.get(&1), Some(&"uno"));
/// assert_eq!(map.remove(&1), Some("uno"));
/// assert!(map.is_empty());
/// ```
#[derive(Clone)]
pub struct TreeMap<K, V, B = Unbalanced> {
    pub(crate) nodes: Arena<K, V>,
    pub(crate) root: Link,
    balance: PhantomData<B>,
}

/// An ordered map on a plain binary search tree without rebalancing.
pub type BstMap<K, V> = TreeMap<K, V, Unbalanced>;

/// An ordered map on a self-balancing AVL tree.
pub type AvlTreeMap<K, V> = TreeMap<K, V, Avl>;

enum InsertPos {
    Occupied(NodeId),
    Vacant { parent: Link, side: Side },
}

impl<K, V, B> TreeMap<K, V, B> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            balance: PhantomData,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        debug!(len = self.len(), "clearing map");
        self.nodes.clear();
        self.root = None;
    }

    /// Replaces the subtree rooted at `u` in its parent's child slot (or the
    /// root link) by the subtree rooted at `v`. Links of `u` are left as is.
    pub(crate) fn transplant(&mut self, u: NodeId, v: Link) {
        let parent = self.nodes[u].parent;
        match parent {
            None => self.root = v,
            Some(parent) => {
                let parent_node = &mut self.nodes[parent];
                if parent_node.left == Some(u) {
                    parent_node.left = v;
                } else {
                    parent_node.right = v;
                }
            }
        }
        if let Some(v) = v {
            self.nodes[v].parent = parent;
        }
    }

    pub(crate) fn minimum(&self, mut node: NodeId) -> NodeId {
        while let Some(left) = self.nodes[node].left {
            node = left;
        }
        node
    }

    /// Drops all links of a node that is no longer reachable from the root.
    pub(crate) fn isolate(&mut self, node: NodeId) {
        let node = &mut self.nodes[node];
        node.left = None;
        node.right = None;
        node.parent = None;
    }

    pub(crate) fn height_of(&self, link: Link) -> isize {
        link.map_or(-1, |node| self.nodes[node].height)
    }

    pub(crate) fn adjust_height(&mut self, node: NodeId) {
        let left = self.height_of(self.nodes[node].left);
        let right = self.height_of(self.nodes[node].right);
        self.nodes[node].height = 1 + cmp::max(left, right);
    }

    /// Unlinks `z` by splicing in its only child, or, with two children, by
    /// moving its in-order successor into its position.
    /// Returns `z`, now detached.
    pub(crate) fn unlink_by_transplant(&mut self, z: NodeId) -> NodeId {
        let (left, right) = (self.nodes[z].left, self.nodes[z].right);
        match (left, right) {
            (None, _) => self.transplant(z, right),
            (_, None) => self.transplant(z, left),
            (Some(left), Some(right)) => {
                let y = self.minimum(right);
                if self.nodes[y].parent != Some(z) {
                    let y_right = self.nodes[y].right;
                    self.transplant(y, y_right);
                    self.nodes[y].right = Some(right);
                    self.nodes[right].parent = Some(y);
                }
                self.transplant(z, Some(y));
                self.nodes[y].left = Some(left);
                self.nodes[left].parent = Some(y);
            }
        }
        self.isolate(z);
        z
    }
}

impl<K: Ord, V, B: Balance> TreeMap<K, V, B> {
    /// Builds a map of minimal height from entries sorted by key.
    ///
    /// The middle entry becomes the root, the middle entries of both halves
    /// become its children, and so on. Fails if the keys are not strictly
    /// ascending.
    ///
    /// ```
    /// use bstmap::BstMap;
    /// let map = BstMap::from_sorted((1..=5).map(|k| (k, k))).unwrap();
    /// assert_eq!(map.height(), 2);
    /// assert_eq!(map.preorder(), "[3=3, 1=1, 2=2, 4=4, 5=5]");
    /// ```
    pub fn from_sorted<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = entries.into_iter().collect();
        if let Some(index) = entries
            .windows(2)
            .position(|pair| pair[0].0 >= pair[1].0)
        {
            return Err(Error::Unsorted { index: index + 1 });
        }

        let len = entries.len();
        let mut map = Self {
            nodes: Arena::with_capacity(len),
            root: None,
            balance: PhantomData,
        };
        for (key, value) in entries {
            map.nodes.create(None, key, value);
        }
        map.root = map.link_sorted(0, len);
        debug!(len, "built map from sorted entries");
        Ok(map)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|node| &self.nodes[node].value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|node| {
            let node = &self.nodes[node];
            (&node.key, &node.value)
        })
    }

    /// Returns true if the key is in the map.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Associates the value with the key.
    /// Returns the previous value if the key was already in the map; in that
    /// case the tree shape does not change.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.find_insert_pos(&key) {
            InsertPos::Occupied(node) => Some(mem::replace(&mut self.nodes[node].value, value)),
            InsertPos::Vacant { parent, side } => {
                let node = self.nodes.create(parent, key, value);
                match parent {
                    None => self.root = Some(node),
                    Some(parent) => *self.nodes[parent].child_mut(side) = Some(node),
                }
                B::after_insert(self, node);
                None
            }
        }
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find(key)?;
        let detached = B::detach(self, node);
        let removed = self.nodes.release(detached, &mut self.root);
        trace!(len = self.len(), "removed node");
        debug_assert!(self.find(key).is_none());
        Some((removed.key, removed.value))
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        assert_eq!(self.is_empty(), self.len() == 0);

        // Check root link
        if let Some(root) = self.root {
            assert!(self.nodes[root].parent.is_none());
        }

        // Check tree nodes
        let mut num_nodes = 0;
        self.traverse(
            |id| {
                let node = &self.nodes[id];
                let mut left_height = -1;
                let mut right_height = -1;

                // Check link for left child node
                if let Some(left) = node.left {
                    assert_eq!(self.nodes[left].parent, Some(id));
                    assert!(self.nodes[left].key < node.key);
                    left_height = self.nodes[left].height;
                }

                // Check link for right child node
                if let Some(right) = node.right {
                    assert_eq!(self.nodes[right].parent, Some(id));
                    assert!(self.nodes[right].key > node.key);
                    right_height = self.nodes[right].height;
                }

                if B::TRACKS_HEIGHT {
                    // Check height
                    assert_eq!(node.height, 1 + cmp::max(left_height, right_height));

                    // Check AVL condition (nearly balance)
                    assert!(left_height <= right_height + 1);
                    assert!(right_height <= left_height + 1);
                }

                num_nodes += 1;
            },
            |_| {},
            |_| {},
        );

        // Check number of nodes
        assert_eq!(num_nodes, self.len());

        // Check ordering across whole subtrees
        let entries = self.entries(Order::Inorder);
        assert!(entries.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root;
        while let Some(node) = current {
            let node = &self.nodes[node];
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        current
    }

    fn find_insert_pos(&self, key: &K) -> InsertPos {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;
        while let Some(node) = current {
            side = match key.cmp(&self.nodes[node].key) {
                Ordering::Equal => return InsertPos::Occupied(node),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            parent = Some(node);
            current = self.nodes[node].child(side);
        }
        InsertPos::Vacant { parent, side }
    }

    // Links the nodes created from sorted entries `low..high` into a subtree of
    // minimal height and returns its root. Recursion depth is logarithmic.
    fn link_sorted(&mut self, low: usize, high: usize) -> Link {
        if low >= high {
            return None;
        }
        let mid = low + (high - 1 - low) / 2;
        let node = self.nodes.id_at(mid);
        let left = self.link_sorted(low, mid);
        let right = self.link_sorted(mid + 1, high);
        for child in [left, right].into_iter().flatten() {
            self.nodes[child].parent = Some(node);
        }
        self.nodes[node].left = left;
        self.nodes[node].right = right;
        if B::TRACKS_HEIGHT {
            self.adjust_height(node);
        }
        Some(node)
    }
}

impl<K, V, B> Default for TreeMap<K, V, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V, B: Balance> FromIterator<(K, V)> for TreeMap<K, V, B> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V, B: Balance> Extend<(K, V)> for TreeMap<K, V, B> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, B> fmt::Debug for TreeMap<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries(Order::Inorder)).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, B> fmt::Display for TreeMap<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.traversal(Order::Inorder), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transplant_two_children_deep_successor() {
        //     5              6
        //    / \            / \
        //   3   8    ->    3   8
        //      /              /
        //     6              7
        //      \
        //       7
        let mut map: BstMap<i32, i32> = [5, 3, 8, 6, 7].into_iter().map(|k| (k, k)).collect();
        assert_eq!(map.remove(&5), Some(5));
        map.check_consistency();
        assert_eq!(map.preorder(), "[6=6, 3=3, 8=8, 7=7]");
    }

    #[test]
    fn test_transplant_two_children_direct_successor() {
        let mut map: BstMap<i32, i32> = [5, 3, 8, 9].into_iter().map(|k| (k, k)).collect();
        assert_eq!(map.remove(&5), Some(5));
        map.check_consistency();
        assert_eq!(map.preorder(), "[8=8, 3=3, 9=9]");
    }

    #[test]
    fn test_from_sorted_rejects_unsorted() {
        let result = BstMap::from_sorted(vec![(1, ()), (3, ()), (2, ())]);
        assert_eq!(result.err(), Some(Error::Unsorted { index: 2 }));

        let result = AvlTreeMap::from_sorted(vec![(1, ()), (1, ())]);
        assert_eq!(result.err(), Some(Error::Unsorted { index: 1 }));
    }

    #[test]
    fn test_from_sorted_empty() {
        let map = AvlTreeMap::<i32, i32>::from_sorted(Vec::new()).unwrap();
        assert!(map.is_empty());
        map.check_consistency();
    }

    #[test]
    fn test_put_keeps_shape_on_update() {
        let mut map: AvlTreeMap<i32, &str> = AvlTreeMap::new();
        map.put(2, "b");
        map.put(1, "a");
        map.put(3, "c");
        let before = map.preorder();
        assert_eq!(map.put(1, "z"), Some("a"));
        assert_eq!(map.len(), 3);
        assert_eq!(map.preorder(), before.replace("1=a", "1=z"));
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut map = BstMap::new();
        map.put(String::from("pear"), 1);
        map.put(String::from("apple"), 2);
        assert_eq!(map.get("apple"), Some(&2));
        assert!(map.contains_key("pear"));
        assert_eq!(map.remove_entry("pear"), Some((String::from("pear"), 1)));
        assert!(!map.contains_key("pear"));
    }

    #[test]
    fn test_debug_and_display() {
        let map: BstMap<i32, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
        assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
        assert_eq!(format!("{}", map), "[1=a, 2=b]");
    }
}
