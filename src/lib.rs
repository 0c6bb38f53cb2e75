//! Ordered maps implemented with binary search trees.
//!
//! [`BstMap`] is a plain binary search tree, [`AvlTreeMap`] keeps itself
//! balanced with AVL rotations. Both share search, traversal and the
//! structural metrics (height, level sums, search cost estimates), and both
//! can be built in one step from sorted entries with [`TreeMap::from_sorted`].
//!
//! Nodes live in an arena owned by the map and refer to each other by index,
//! so parent back-links need neither reference counting nor raw pointers.
//!
//! ```
//! use bstmap::{AvlTreeMap, BstMap};
//!
//! let mut avl = AvlTreeMap::new();
//! for key in 1..=7 {
//!     avl.put(key, key);
//! }
//! assert_eq!(avl.height(), 2);
//! assert_eq!(avl.inorder(), "[1=1, 2=2, 3=3, 4=4, 5=5, 6=6, 7=7]");
//!
//! let mut bst = BstMap::new();
//! for key in 1..=7 {
//!     bst.put(key, key);
//! }
//! assert_eq!(bst.height(), 6);
//! ```

mod balance;
mod draw;
mod error;
mod map;
mod metrics;
mod node;
mod traverse;

pub use balance::{Avl, Balance, Unbalanced};
pub use error::{Error, Result};
pub use map::{AvlTreeMap, BstMap, TreeMap};
pub use metrics::LevelStats;
pub use traverse::{Order, Traversal};
