//! B-tree index implementation.
//!
//! A classic B-tree of minimum degree `t` mapping `i64` keys to
//! [`RecordId`](crate::RecordId)s. Values live at every level of the tree,
//! not only in leaves: an internal node's separators are real entries, and a
//! search can stop at the first node holding the key.
//!
//! # Components
//! - [`BTree`] - The tree: search, insert, delete, enumerate
//! - [`Iter`] - In-order iterator over `(key, RecordId)` pairs
//! - [`TreeStats`] - Restructuring counters
//! - [`InvariantViolation`] - Reported by [`BTree::validate`]
//!
//! # Fill bounds
//! ```text
//!            ┌──────────────────────────────┐
//!   root     │ 0 ..= 2t-1 entries           │
//!            └──────────────────────────────┘
//!   other    │ t-1 ..= 2t-1 entries         │
//!            │ internal: entries + 1 kids   │
//! ```

mod iter;
mod node;
mod stats;
mod tree;
mod validate;

pub use iter::Iter;
pub use node::Entry;
pub use stats::TreeStats;
pub use tree::{BTree, LoadReport};
pub use validate::InvariantViolation;
