//! Arena-based ordered container engine: a red-black tree and a doubly
//! linked list threaded through the same nodes, so that list order always
//! equals sorted order.
//!
//! [`ChainTree`] keeps every element in two structures at once:
//!
//! - **Tree links** (`p` / `l` / `r`): ordered by the comparator,
//!   supporting O(log n) `find`, `insert` and `remove`.
//! - **List links** (`nx` / `pv`): the in-order sequence as a doubly
//!   linked list, supporting O(1) neighbor steps and O(1) access to the
//!   first and last element, without re-deriving the order from the tree.
//!
//! Instead of raw pointers, all links are `u32` indices into a tree-owned
//! arena. Index 0 is reserved for the tree's private sentinel slot, which
//! stands in for every absent relation so the rebalancing code never
//! branches on absence. Callers address nodes through [`NodeRef`] handles
//! that stop resolving once a node is removed.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`tree`] | [`ChainTree`]: search, insertion, deletion, accessors |
//! | [`node`] | arena slot layout, sentinel index, [`NodeRef`] |
//! | [`error`] | [`ChainError`] contract faults |
//! | `balance` | rotation / transplant primitives and both fixups |
//! | `util` | in-order walks by tree links, for cross-checking |
//! | `verify` | invariant checker and debug printer |
//!
//! # Example
//!
//! ```
//! use chain_forest::ChainTree;
//!
//! let mut tree = ChainTree::new();
//! for v in [30, 10, 20] {
//!     let node = tree.alloc(v);
//!     tree.insert(node).unwrap();
//! }
//!
//! let order: Vec<i32> = tree.iter().map(|(_, v)| *v).collect();
//! assert_eq!(order, vec![10, 20, 30]);
//!
//! let head = tree.head().unwrap();
//! assert_eq!(tree.value(head), Some(&10));
//! ```

mod balance;
pub mod error;
pub mod node;
pub mod tree;
mod util;
mod verify;

pub use error::ChainError;
pub use node::NodeRef;
pub use tree::ChainTree;
