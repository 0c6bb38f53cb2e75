use std::fmt;

use crate::map::TreeMap;
use crate::node::{Link, NodeId};

impl<K: fmt::Display, V, B> TreeMap<K, V, B> {
    /// Returns an ASCII drawing of the tree shape, one key per line.
    ///
    /// ```
    /// use bstmap::AvlTreeMap;
    /// let map: AvlTreeMap<_, _> = [(2, ()), (1, ()), (3, ()), (4, ())].into_iter().collect();
    /// assert_eq!(map.to_ascii_drawing(), "2\n|-- 1\n`-- 3\n    |-- *\n    `-- 4\n");
    /// ```
    pub fn to_ascii_drawing(&self) -> String {
        let mut out = String::new();
        let Some(root) = self.root else {
            return out;
        };
        out.push_str(&format!("{}\n", self.nodes[root].key));

        // (child, prefix of its line, is right child)
        let mut pending: Vec<(Link, String, bool)> = Vec::new();
        self.push_children(&mut pending, root, "");
        while let Some((link, prefix, is_right)) = pending.pop() {
            let connector = if is_right { "`-- " } else { "|-- " };
            match link {
                None => out.push_str(&format!("{prefix}{connector}*\n")),
                Some(node) => {
                    out.push_str(&format!("{prefix}{connector}{}\n", self.nodes[node].key));
                    let indent = if is_right { "    " } else { "|   " };
                    self.push_children(&mut pending, node, &format!("{prefix}{indent}"));
                }
            }
        }
        out
    }

    fn push_children(&self, pending: &mut Vec<(Link, String, bool)>, node: NodeId, prefix: &str) {
        let node = &self.nodes[node];
        if node.is_leaf() {
            return;
        }
        pending.push((node.right, prefix.to_owned(), true));
        pending.push((node.left, prefix.to_owned(), false));
    }
}
