use std::fmt;

use crate::map::TreeMap;
use crate::node::NodeId;

/// Visiting order of a depth-first traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    Preorder,
    /// Left subtree, then node, then right subtree; ascending key order.
    Inorder,
    /// Left subtree, then right subtree, then node.
    Postorder,
}

impl Order {
    pub const ALL: [Order; 3] = [Order::Preorder, Order::Inorder, Order::Postorder];
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Order::Preorder => "Preorder",
            Order::Inorder => "Inorder",
            Order::Postorder => "Postorder",
        })
    }
}

/// Renders the entries of a map as `[k=v, k=v]` in a given order.
///
/// This `struct` is created by the [`traversal`] method on [`TreeMap`].
///
/// [`traversal`]: TreeMap::traversal
pub struct Traversal<'a, K, V, B> {
    map: &'a TreeMap<K, V, B>,
    order: Order,
}

impl<K: fmt::Display, V: fmt::Display, B> fmt::Display for Traversal<'_, K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, (key, value)) in self.map.entries(self.order).into_iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("]")
    }
}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl<K, V, B> TreeMap<K, V, B> {
    /// Returns all entries in the given order.
    pub fn entries(&self, order: Order) -> Vec<(&K, &V)> {
        self.node_ids(order)
            .into_iter()
            .map(|id| {
                let node = &self.nodes[id];
                (&node.key, &node.value)
            })
            .collect()
    }

    /// Returns a displayable rendering of the entries in the given order.
    pub fn traversal(&self, order: Order) -> Traversal<'_, K, V, B> {
        Traversal { map: self, order }
    }

    /// Renders the entries in preorder, e.g. `[2=2, 1=1, 3=3]`.
    pub fn preorder(&self) -> String
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        self.traversal(Order::Preorder).to_string()
    }

    /// Renders the entries in ascending key order, e.g. `[1=1, 2=2, 3=3]`.
    pub fn inorder(&self) -> String
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        self.traversal(Order::Inorder).to_string()
    }

    /// Renders the entries in postorder, e.g. `[1=1, 3=3, 2=2]`.
    pub fn postorder(&self) -> String
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        self.traversal(Order::Postorder).to_string()
    }

    fn node_ids(&self, order: Order) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.len());
        let mut visit = |id: NodeId| ids.push(id);
        match order {
            Order::Preorder => self.traverse(&mut visit, |_| {}, |_| {}),
            Order::Inorder => self.traverse(|_| {}, &mut visit, |_| {}),
            Order::Postorder => self.traverse(|_| {}, |_| {}, &mut visit),
        }
        ids
    }

    /// Walks the tree along child and parent links without recursion,
    /// calling each callback when a node is reached in the matching order.
    pub(crate) fn traverse<Pre, In, Post>(&self, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(NodeId),
        In: FnMut(NodeId),
        Post: FnMut(NodeId),
    {
        if let Some(mut node) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node);
                        if let Some(left) = self.nodes[node].left {
                            node = left;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        inorder(node);
                        if let Some(right) = self.nodes[node].right {
                            node = right;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        postorder(node);
                        if let Some(parent) = self.nodes[node].parent {
                            if self.nodes[parent].left == Some(node) {
                                dir = Direction::FromLeft;
                            } else {
                                dir = Direction::FromRight;
                            }
                            node = parent;
                        } else {
                            break;
                        }
                    }
                }
            }
        }
    }
}
