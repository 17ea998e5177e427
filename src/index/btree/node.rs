//! B-tree node layout and the per-node restructuring steps.
//!
//! Every operation here works on one node and its direct children. The tree
//! level ([`super::tree`]) only handles the root: creating it, growing a new
//! one on a root split, and collapsing it after a merge.

use std::cmp::Ordering;

use crate::common::config::{max_entries, min_entries};
use crate::common::RecordId;
use crate::index::btree::TreeStats;

/// A key paired with the record it locates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub key: i64,
    pub value: RecordId,
}

impl Entry {
    #[inline]
    pub fn new(key: i64, value: RecordId) -> Self {
        Self { key, value }
    }
}

/// A node of the tree.
///
/// # Layout
/// ```text
///            entries:   [ e0 | e1 | e2 ]
///            children: [ c0 | c1 | c2 | c3 ]
///
///   keys(c0) < e0.key < keys(c1) < e1.key < keys(c2) < e2.key < keys(c3)
/// ```
///
/// A leaf has no children. An internal node has `entries.len() + 1`
/// children, each exclusively owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Node {
    pub(super) entries: Vec<Entry>,
    pub(super) children: Vec<Box<Node>>,
    pub(super) leaf: bool,
}

impl Node {
    pub(super) fn new_leaf() -> Self {
        Self {
            entries: Vec::new(),
            children: Vec::new(),
            leaf: true,
        }
    }

    pub(super) fn with_entry(entry: Entry) -> Self {
        let mut node = Self::new_leaf();
        node.entries.push(entry);
        node
    }

    /// An internal node with no entries and a single child.
    ///
    /// Only valid as the transient new root of a root split.
    pub(super) fn new_root_above(child: Box<Node>) -> Self {
        Self {
            entries: Vec::new(),
            children: vec![child],
            leaf: false,
        }
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(super) fn is_full(&self, t: usize) -> bool {
        self.entries.len() >= max_entries(t)
    }

    /// `Ok(i)` if `entries[i]` holds `key`, else `Err(i)` with the child
    /// index to descend into.
    #[inline]
    pub(super) fn find(&self, key: i64) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&key, |e| e.key)
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub(super) fn get(&self, key: i64) -> Option<RecordId> {
        let mut node = self;
        loop {
            match node.find(key) {
                Ok(i) => return Some(node.entries[i].value),
                Err(_) if node.leaf => return None,
                Err(i) => node = &node.children[i],
            }
        }
    }

    /// Leftmost entry of this subtree.
    pub(super) fn first_entry(&self) -> Option<Entry> {
        let mut node = self;
        while !node.leaf {
            node = node.children.first()?;
        }
        node.entries.first().copied()
    }

    /// Rightmost entry of this subtree.
    pub(super) fn last_entry(&self) -> Option<Entry> {
        let mut node = self;
        while !node.leaf {
            node = node.children.last()?;
        }
        node.entries.last().copied()
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Split the full child at `i` around its median.
    ///
    /// The median moves up into `self.entries[i]`; the upper `t-1` entries
    /// (and upper `t` children) move into a new node at `self.children[i+1]`.
    pub(super) fn split_child(&mut self, i: usize, t: usize, stats: &mut TreeStats) {
        let child = &mut self.children[i];
        debug_assert_eq!(child.len(), max_entries(t));

        let right_entries = child.entries.split_off(t);
        let median = child.entries.remove(t - 1);
        let right_children = if child.leaf {
            Vec::new()
        } else {
            child.children.split_off(t)
        };

        let right = Node {
            entries: right_entries,
            children: right_children,
            leaf: child.leaf,
        };

        self.entries.insert(i, median);
        self.children.insert(i + 1, Box::new(right));
        stats.splits += 1;

        tracing::trace!(median = median.key, slot = i, "split child");
    }

    /// Insert into the subtree rooted here, splitting full children on the
    /// way down. `self` must not be full.
    ///
    /// Returns `false` (without inserting) if the key is already present.
    pub(super) fn insert_non_full(&mut self, entry: Entry, t: usize, stats: &mut TreeStats) -> bool {
        let mut node = self;
        loop {
            let mut i = match node.find(entry.key) {
                Ok(_) => return false,
                Err(i) => i,
            };

            if node.leaf {
                node.entries.insert(i, entry);
                return true;
            }

            if node.children[i].is_full(t) {
                node.split_child(i, t, stats);
                match entry.key.cmp(&node.entries[i].key) {
                    Ordering::Greater => i += 1,
                    Ordering::Equal => return false,
                    Ordering::Less => {}
                }
            }

            node = &mut node.children[i];
        }
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Remove `key` from the subtree rooted here.
    ///
    /// `self` must hold at least `t` entries unless it is the root; every
    /// child is topped up to `t` before the descent reaches it, so no node
    /// is ever left below `t-1`.
    pub(super) fn remove(&mut self, key: i64, t: usize, stats: &mut TreeStats) -> Option<Entry> {
        match self.find(key) {
            Ok(i) if self.leaf => Some(self.entries.remove(i)),
            Ok(i) => self.remove_from_internal(i, t, stats),
            Err(_) if self.leaf => None,
            Err(i) => {
                let i = if self.children[i].len() < t {
                    self.fill_child(i, t, stats)
                } else {
                    i
                };
                self.children[i].remove(key, t, stats)
            }
        }
    }

    fn remove_from_internal(&mut self, i: usize, t: usize, stats: &mut TreeStats) -> Option<Entry> {
        let key = self.entries[i].key;

        let predecessor = if self.children[i].len() >= t {
            self.children[i].last_entry()
        } else {
            None
        };
        if let Some(pred) = predecessor {
            let removed = std::mem::replace(&mut self.entries[i], pred);
            let moved = self.children[i].remove(pred.key, t, stats);
            debug_assert!(moved.is_some(), "predecessor {} missing from left subtree", pred.key);
            return Some(removed);
        }

        let successor = if self.children[i + 1].len() >= t {
            self.children[i + 1].first_entry()
        } else {
            None
        };
        if let Some(succ) = successor {
            let removed = std::mem::replace(&mut self.entries[i], succ);
            let moved = self.children[i + 1].remove(succ.key, t, stats);
            debug_assert!(moved.is_some(), "successor {} missing from right subtree", succ.key);
            return Some(removed);
        }

        // Both flanking children are at t-1: fold them together with the
        // key and remove it from the merged node.
        self.merge_children(i, stats);
        self.children[i].remove(key, t, stats)
    }

    /// Bring `children[i]` up to at least `t` entries.
    ///
    /// Returns the index the caller should descend into, which moves left by
    /// one when the last child is merged into its left sibling.
    fn fill_child(&mut self, i: usize, t: usize, stats: &mut TreeStats) -> usize {
        let last = self.children.len() - 1;

        if i > 0 && self.children[i - 1].len() > min_entries(t) {
            self.borrow_from_left(i, stats);
            i
        } else if i < last && self.children[i + 1].len() > min_entries(t) {
            self.borrow_from_right(i, stats);
            i
        } else if i < last {
            self.merge_children(i, stats);
            i
        } else {
            self.merge_children(i - 1, stats);
            i - 1
        }
    }

    /// Rotate the left sibling's last entry up, and the separator down into
    /// the front of `children[i]`.
    fn borrow_from_left(&mut self, i: usize, stats: &mut TreeStats) {
        let (before, after) = self.children.split_at_mut(i);
        let left = &mut before[i - 1];
        let child = &mut after[0];

        let Some(donated) = left.entries.pop() else {
            return;
        };
        let separator = std::mem::replace(&mut self.entries[i - 1], donated);
        child.entries.insert(0, separator);

        if !left.leaf {
            if let Some(grandchild) = left.children.pop() {
                child.children.insert(0, grandchild);
            }
        }

        stats.borrows += 1;
        tracing::trace!(slot = i, separator = donated.key, "borrowed from left sibling");
    }

    /// Rotate the right sibling's first entry up, and the separator down onto
    /// the end of `children[i]`.
    fn borrow_from_right(&mut self, i: usize, stats: &mut TreeStats) {
        let (before, after) = self.children.split_at_mut(i + 1);
        let child = &mut before[i];
        let right = &mut after[0];

        if right.entries.is_empty() {
            return;
        }
        let donated = right.entries.remove(0);
        let separator = std::mem::replace(&mut self.entries[i], donated);
        child.entries.push(separator);

        if !right.leaf && !right.children.is_empty() {
            child.children.push(right.children.remove(0));
        }

        stats.borrows += 1;
        tracing::trace!(slot = i, separator = donated.key, "borrowed from right sibling");
    }

    /// Fold `children[i+1]` and the separator `entries[i]` into `children[i]`.
    pub(super) fn merge_children(&mut self, i: usize, stats: &mut TreeStats) {
        let right = self.children.remove(i + 1);
        let separator = self.entries.remove(i);

        let left = &mut self.children[i];
        left.entries.push(separator);

        let Node {
            entries, children, ..
        } = *right;
        left.entries.extend(entries);
        left.children.extend(children);

        stats.merges += 1;
        tracing::trace!(slot = i, separator = separator.key, "merged children");
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Append every value of this subtree in key order.
    pub(super) fn collect_values(&self, out: &mut Vec<RecordId>) {
        if self.leaf {
            out.extend(self.entries.iter().map(|e| e.value));
            return;
        }

        for (child, entry) in self.children.iter().zip(&self.entries) {
            child.collect_values(out);
            out.push(entry.value);
        }
        if let Some(last) = self.children.last() {
            last.collect_values(out);
        }
    }
}
