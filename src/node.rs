use std::mem;
use std::ops::{Index, IndexMut};

/// Stable handle of a node inside a map's arena.
///
/// Handles stay valid across rotations and transplants. Only releasing a node
/// moves another node into the freed slot, see [`Arena::release`].
///
/// The type is `pub` because it appears in the hidden hook methods of the
/// public `Balance` trait. It is not re-exported and has no public
/// constructor, so other crates can neither name nor create one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

pub(crate) type Link = Option<NodeId>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link,
    pub(crate) right: Link,
    // Back reference for upward navigation only, never ownership.
    pub(crate) parent: Link,
    // Leaf is 0, absent subtree counts as -1. Only kept up to date by
    // variants that track heights.
    pub(crate) height: isize,
}

impl<K, V> Node<K, V> {
    pub(crate) fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Contiguous node storage owned by a map.
/// Live nodes always occupy the slots `0..len`.
#[derive(Clone, Debug)]
pub(crate) struct Arena<K, V> {
    nodes: Vec<Node<K, V>>,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Appends an unlinked leaf below `parent`. The caller attaches it.
    pub(crate) fn create(&mut self, parent: Link, key: K, value: V) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            key,
            value,
            left: None,
            right: None,
            parent,
            height: 0,
        });
        id
    }

    /// Handle of the node created `index`-th since the arena was last empty,
    /// provided nothing has been released in between.
    pub(crate) fn id_at(&self, index: usize) -> NodeId {
        debug_assert!(index < self.nodes.len());
        NodeId(index)
    }

    /// Takes a detached node out of the arena.
    ///
    /// The last node is moved into the freed slot and every link that referred
    /// to it (its parent's child slot or `root`, and its children's parent
    /// links) is redirected. Handles to the moved node held elsewhere become
    /// stale, so this must be the final step of a mutation.
    pub(crate) fn release(&mut self, id: NodeId, root: &mut Link) -> Node<K, V> {
        let last = NodeId(self.nodes.len() - 1);
        let node = self.nodes.swap_remove(id.0);
        debug_assert!(node.is_leaf() && node.parent.is_none());

        if id != last {
            let moved = &self.nodes[id.0];
            let (parent, left, right) = (moved.parent, moved.left, moved.right);
            match parent {
                None => {
                    debug_assert_eq!(*root, Some(last));
                    *root = Some(id);
                }
                Some(parent) => {
                    let parent_node = &mut self.nodes[parent.0];
                    if parent_node.left == Some(last) {
                        parent_node.left = Some(id);
                    } else {
                        debug_assert_eq!(parent_node.right, Some(last));
                        parent_node.right = Some(id);
                    }
                }
            }
            for child in [left, right].into_iter().flatten() {
                self.nodes[child.0].parent = Some(id);
            }
        }
        node
    }

    /// Exchanges key and value of two nodes, leaving the links untouched.
    pub(crate) fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (low, high) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.nodes.split_at_mut(high);
        let (first, second) = (&mut head[low], &mut tail[0]);
        mem::swap(&mut first.key, &mut second.key);
        mem::swap(&mut first.value, &mut second.value);
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Node<K, V> {
        &self.nodes[id.0]
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_last() {
        let mut arena = Arena::new();
        let root = arena.create(None, 2, "two");
        let leaf = arena.create(Some(root), 3, "three");
        arena[root].right = Some(leaf);

        arena[root].right = None;
        arena[leaf].parent = None;
        let mut root_link = Some(root);
        let node = arena.release(leaf, &mut root_link);

        assert_eq!(node.key, 3);
        assert_eq!(arena.len(), 1);
        assert_eq!(root_link, Some(root));
    }

    #[test]
    fn test_release_moves_last_node() {
        //     2          2
        //    / \   ->     \
        //   1   3          3 (now in slot of 1)
        let mut arena = Arena::new();
        let root = arena.create(None, 2, ());
        let left = arena.create(Some(root), 1, ());
        let right = arena.create(Some(root), 3, ());
        arena[root].left = Some(left);
        arena[root].right = Some(right);

        arena[root].left = None;
        arena[left].parent = None;
        let mut root_link = Some(root);
        let node = arena.release(left, &mut root_link);

        assert_eq!(node.key, 1);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[root].right, Some(left));
        assert_eq!(arena[left].key, 3);
        assert_eq!(arena[left].parent, Some(root));
    }

    #[test]
    fn test_release_moves_root() {
        //   3 (slot 2)        3 (slot 0)
        //  /            ->   /
        // 1 (slot 1)        1
        let mut arena = Arena::new();
        let stale = arena.create(None, 0, ());
        let left = arena.create(None, 1, ());
        let root = arena.create(None, 3, ());
        arena[root].left = Some(left);
        arena[left].parent = Some(root);

        let mut root_link = Some(root);
        let node = arena.release(stale, &mut root_link);

        assert_eq!(node.key, 0);
        assert_eq!(root_link, Some(stale));
        assert_eq!(arena[stale].key, 3);
        assert_eq!(arena[left].parent, Some(stale));
    }

    #[test]
    fn test_swap_entries() {
        let mut arena = Arena::new();
        let a = arena.create(None, 1, "one");
        let b = arena.create(Some(a), 2, "two");
        arena[a].right = Some(b);

        arena.swap_entries(b, a);
        assert_eq!((arena[a].key, arena[a].value), (2, "two"));
        assert_eq!((arena[b].key, arena[b].value), (1, "one"));
        assert_eq!(arena[a].right, Some(b));

        arena.swap_entries(a, a);
        assert_eq!(arena[a].key, 2);
    }
}
