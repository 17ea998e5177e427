//! Index structures.
//!
//! - [`btree`] - The B-tree engine (single-threaded, no I/O)
//! - [`SharedBTree`] - Lock wrapper for callers sharing a tree across threads

pub mod btree;
mod shared;

pub use btree::{BTree, Entry, InvariantViolation, Iter, LoadReport, TreeStats};
pub use shared::SharedBTree;
