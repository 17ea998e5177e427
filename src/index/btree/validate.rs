//! Structural invariant checking.
//!
//! A violation here means a bug in the tree code, never bad input. Tests
//! call [`BTree::validate`] after every mutation; nothing in the mutation
//! paths returns these.

use crate::common::config::{max_entries, min_entries};
use crate::index::btree::node::Node;
use crate::index::btree::BTree;

/// The first broken invariant found by [`BTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("keys not strictly increasing at depth {depth}: {prev} then {next}")]
    UnsortedKeys { depth: usize, prev: i64, next: i64 },

    #[error("key {key} at depth {depth} lies outside its parent's separators")]
    KeyOutOfRange { depth: usize, key: i64 },

    #[error("node at depth {depth} holds {len} entries, minimum is {min}")]
    Underflow { depth: usize, len: usize, min: usize },

    #[error("node at depth {depth} holds {len} entries, maximum is {max}")]
    Overflow { depth: usize, len: usize, max: usize },

    #[error("internal node at depth {depth} has {entries} entries but {children} children")]
    ChildCount {
        depth: usize,
        entries: usize,
        children: usize,
    },

    #[error("leaf at depth {depth} has {children} children")]
    LeafWithChildren { depth: usize, children: usize },

    #[error("leaf at depth {found}, expected all leaves at depth {expected}")]
    UnevenLeafDepth { expected: usize, found: usize },

    #[error("root is present but empty")]
    EmptyRoot,

    #[error("tree records {recorded} entries but holds {counted}")]
    LengthMismatch { recorded: usize, counted: usize },
}

struct Walk {
    t: usize,
    leaf_depth: Option<usize>,
    counted: usize,
}

impl BTree {
    /// Check every structural invariant.
    ///
    /// # Errors
    /// Returns the first [`InvariantViolation`] found, in depth-first order.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root() else {
            return match self.len() {
                0 => Ok(()),
                recorded => Err(InvariantViolation::LengthMismatch {
                    recorded,
                    counted: 0,
                }),
            };
        };

        if root.entries.is_empty() {
            return Err(InvariantViolation::EmptyRoot);
        }

        let mut walk = Walk {
            t: self.degree(),
            leaf_depth: None,
            counted: 0,
        };
        walk.check(root, 0, None, None)?;

        if walk.counted != self.len() {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.len(),
                counted: walk.counted,
            });
        }
        Ok(())
    }
}

impl Walk {
    fn check(
        &mut self,
        node: &Node,
        depth: usize,
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Result<(), InvariantViolation> {
        let len = node.entries.len();
        self.counted += len;

        if depth > 0 && len < min_entries(self.t) {
            return Err(InvariantViolation::Underflow {
                depth,
                len,
                min: min_entries(self.t),
            });
        }
        if len > max_entries(self.t) {
            return Err(InvariantViolation::Overflow {
                depth,
                len,
                max: max_entries(self.t),
            });
        }

        for pair in node.entries.windows(2) {
            if pair[0].key >= pair[1].key {
                return Err(InvariantViolation::UnsortedKeys {
                    depth,
                    prev: pair[0].key,
                    next: pair[1].key,
                });
            }
        }

        for entry in &node.entries {
            let above = lower.map_or(true, |lo| entry.key > lo);
            let below = upper.map_or(true, |hi| entry.key < hi);
            if !above || !below {
                return Err(InvariantViolation::KeyOutOfRange {
                    depth,
                    key: entry.key,
                });
            }
        }

        if node.leaf {
            if !node.children.is_empty() {
                return Err(InvariantViolation::LeafWithChildren {
                    depth,
                    children: node.children.len(),
                });
            }
            return match self.leaf_depth {
                None => {
                    self.leaf_depth = Some(depth);
                    Ok(())
                }
                Some(expected) if expected == depth => Ok(()),
                Some(expected) => Err(InvariantViolation::UnevenLeafDepth {
                    expected,
                    found: depth,
                }),
            };
        }

        if node.children.len() != len + 1 {
            return Err(InvariantViolation::ChildCount {
                depth,
                entries: len,
                children: node.children.len(),
            });
        }

        for (i, child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(node.entries[i - 1].key) };
            let child_upper = if i == len { upper } else { Some(node.entries[i].key) };
            self.check(child, depth + 1, child_lower, child_upper)?;
        }
        Ok(())
    }
}
