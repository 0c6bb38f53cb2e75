//! Structural metrics of the tree behind a map.
//!
//! All figures are measured on the actual child links, not on cached heights,
//! so they describe the unbalanced variant just as well.

use crate::map::TreeMap;

/// Depth statistics of a tree, gathered in one pass.
///
/// An absent child position (a "null" link) at depth `d` is where an
/// unsuccessful search for a key would end after `d` comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelStats {
    /// Largest depth of any node, -1 for an empty tree.
    pub height: isize,
    /// Number of nodes.
    pub nodes: usize,
    /// Sum of the depths of all nodes, the root being at depth 0.
    pub sum_levels: usize,
    /// Number of absent child positions, 1 for an empty tree.
    pub null_count: usize,
    /// Sum of the depths of all absent child positions.
    pub sum_null_levels: usize,
}

impl LevelStats {
    /// Average number of comparisons of a search for a present key.
    pub fn successful_search_cost(&self) -> f64 {
        if self.nodes == 0 {
            0.0
        } else {
            1.0 + self.sum_levels as f64 / self.nodes as f64
        }
    }

    /// Average number of comparisons before a search for an absent key fails.
    pub fn unsuccessful_search_cost(&self) -> f64 {
        self.sum_null_levels as f64 / self.null_count as f64
    }
}

impl<K, V, B> TreeMap<K, V, B> {
    /// Measures the tree. Runs in linear time with an explicit stack.
    pub fn level_stats(&self) -> LevelStats {
        let mut stats = LevelStats {
            height: -1,
            nodes: 0,
            sum_levels: 0,
            null_count: 0,
            sum_null_levels: 0,
        };

        let mut pending = vec![(self.root, 0usize)];
        while let Some((link, level)) = pending.pop() {
            match link {
                None => {
                    stats.null_count += 1;
                    stats.sum_null_levels += level;
                }
                Some(node) => {
                    let node = &self.nodes[node];
                    stats.nodes += 1;
                    stats.sum_levels += level;
                    stats.height = stats.height.max(level as isize);
                    pending.push((node.right, level + 1));
                    pending.push((node.left, level + 1));
                }
            }
        }
        debug_assert_eq!(stats.nodes, self.len());
        debug_assert_eq!(stats.null_count, stats.nodes + 1);
        stats
    }

    /// Returns the number of edges on the longest root-to-leaf path,
    /// -1 for an empty map.
    pub fn height(&self) -> isize {
        self.level_stats().height
    }

    /// Returns the number of absent child positions.
    pub fn null_count(&self) -> usize {
        self.level_stats().null_count
    }

    /// Returns the sum of the depths of all nodes.
    pub fn sum_levels(&self) -> usize {
        self.level_stats().sum_levels
    }

    /// Returns the sum of the depths of all absent child positions.
    pub fn sum_null_levels(&self) -> usize {
        self.level_stats().sum_null_levels
    }

    /// Returns the average number of comparisons for a present key, 0 for an
    /// empty map.
    pub fn successful_search_cost(&self) -> f64 {
        self.level_stats().successful_search_cost()
    }

    /// Returns the average number of comparisons before a search for an
    /// absent key fails, 0 for an empty map.
    pub fn unsuccessful_search_cost(&self) -> f64 {
        self.level_stats().unsuccessful_search_cost()
    }
}
