//! The B-tree itself: root management and the public operation set.

use crate::common::config::{MAX_DEGREE, MIN_DEGREE};
use crate::common::{Error, RecordId, Result};
use crate::index::btree::node::{Entry, Node};
use crate::index::btree::{Iter, TreeStats};

/// An ordered index from `i64` keys to [`RecordId`]s.
///
/// # Structure
/// ```text
///                        ┌──────────┐
///                        │ 10 │ 20  │            root (may be underfull)
///                        └──────────┘
///               ┌──────────┼───────────┐
///          ┌────────┐  ┌────────┐  ┌────────┐
///          │ 5 │ 7  │  │ 12│ 17 │  │ 30     │    leaves, all at one depth
///          └────────┘  └────────┘  └────────┘
/// ```
///
/// Every key carries its value wherever it sits, so internal separators are
/// real entries. Full nodes are split on the way down during insert, and
/// minimal nodes are topped up (borrow or merge) on the way down during
/// delete, so neither operation ever has to walk back up.
///
/// # Example
/// ```
/// use indexdb::{BTree, RecordId};
///
/// let mut tree = BTree::new(2).unwrap();
/// tree.insert(10, RecordId::new(100)).unwrap();
/// tree.insert(5, RecordId::new(50)).unwrap();
///
/// assert_eq!(tree.search(5), Some(RecordId::new(50)));
/// assert_eq!(tree.search(99), None);
/// assert_eq!(tree.enumerate(), vec![RecordId::new(50), RecordId::new(100)]);
///
/// assert!(tree.delete(10));
/// assert!(!tree.delete(10));
/// ```
#[derive(Debug, Clone)]
pub struct BTree {
    /// `None` when the tree holds no entries.
    pub(super) root: Option<Box<Node>>,

    /// Minimum degree `t` (immutable after construction).
    degree: usize,

    /// Number of entries currently stored.
    pub(super) len: usize,

    /// Restructuring counters.
    stats: TreeStats,
}

/// Outcome of [`BTree::bulk_load`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Pairs inserted.
    pub inserted: usize,

    /// Pairs skipped because their key was already present.
    pub duplicates: usize,
}

impl BTree {
    /// Create an empty tree of minimum degree `t`.
    ///
    /// # Errors
    /// Returns `Error::InvalidDegree` if `t < 2` or `t > MAX_DEGREE`.
    pub fn new(t: usize) -> Result<Self> {
        if !(MIN_DEGREE..=MAX_DEGREE).contains(&t) {
            return Err(Error::InvalidDegree(t));
        }

        Ok(Self {
            root: None,
            degree: t,
            len: 0,
            stats: TreeStats::new(),
        })
    }

    /// The minimum degree `t`.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of entries stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels, 0 for an empty tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            height += 1;
            node = n.children.first().map(|c| c.as_ref());
        }
        height
    }

    /// Restructuring counters since construction or the last reset.
    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    pub(super) fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    // ========================================================================
    // Public API: Lookup
    // ========================================================================

    /// Look up the record stored under `key`.
    ///
    /// Stops at the first node holding the key, internal or leaf.
    pub fn search(&self, key: i64) -> Option<RecordId> {
        self.root.as_ref().and_then(|root| root.get(key))
    }

    pub fn contains(&self, key: i64) -> bool {
        self.search(key).is_some()
    }

    /// Entry with the smallest key.
    pub fn min(&self) -> Option<(i64, RecordId)> {
        self.root
            .as_ref()
            .and_then(|root| root.first_entry())
            .map(|e| (e.key, e.value))
    }

    /// Entry with the largest key.
    pub fn max(&self) -> Option<(i64, RecordId)> {
        self.root
            .as_ref()
            .and_then(|root| root.last_entry())
            .map(|e| (e.key, e.value))
    }

    // ========================================================================
    // Public API: Mutation
    // ========================================================================

    /// Insert `key → value`.
    ///
    /// # Errors
    /// Returns `Error::DuplicateKey` if `key` is already present. The tree is
    /// not modified in that case.
    pub fn insert(&mut self, key: i64, value: RecordId) -> Result<()> {
        if self.contains(key) {
            return Err(Error::DuplicateKey(key));
        }

        let t = self.degree;
        let entry = Entry::new(key, value);

        let mut root = match self.root.take() {
            None => {
                self.root = Some(Box::new(Node::with_entry(entry)));
                self.len += 1;
                return Ok(());
            }
            Some(root) => root,
        };

        if root.is_full(t) {
            let mut new_root = Box::new(Node::new_root_above(root));
            new_root.split_child(0, t, &mut self.stats);
            self.stats.height_grows += 1;
            tracing::trace!("root split");
            root = new_root;
        }

        let inserted = root.insert_non_full(entry, t, &mut self.stats);
        self.root = Some(root);

        if inserted {
            self.len += 1;
            Ok(())
        } else {
            Err(Error::DuplicateKey(key))
        }
    }

    /// Remove `key`, returning whether it was present.
    ///
    /// A missing key leaves the tree exactly as it was: no borrow or merge
    /// happens unless the key is known to be present.
    pub fn delete(&mut self, key: i64) -> bool {
        if !self.contains(key) {
            return false;
        }

        let t = self.degree;
        let removed = match self.root.as_mut() {
            Some(root) => root.remove(key, t, &mut self.stats).is_some(),
            None => false,
        };
        self.collapse_root();

        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Insert every pair, skipping (and counting) keys already present.
    pub fn bulk_load<I>(&mut self, pairs: I) -> LoadReport
    where
        I: IntoIterator<Item = (i64, RecordId)>,
    {
        let mut report = LoadReport::default();
        for (key, value) in pairs {
            match self.insert(key, value) {
                Ok(()) => report.inserted += 1,
                Err(_) => {
                    tracing::warn!(key, "skipping duplicate key during bulk load");
                    report.duplicates += 1;
                }
            }
        }
        tracing::debug!(
            inserted = report.inserted,
            duplicates = report.duplicates,
            "bulk load complete"
        );
        report
    }

    /// Drop an emptied root: an empty leaf empties the tree, an empty
    /// internal node hands the root over to its only child.
    fn collapse_root(&mut self) {
        let Some(mut root) = self.root.take() else {
            return;
        };

        if !root.entries.is_empty() {
            self.root = Some(root);
            return;
        }

        if root.leaf {
            self.root = None;
        } else {
            self.root = root.children.pop();
            self.stats.height_shrinks += 1;
            tracing::trace!("root collapsed");
        }
    }

    // ========================================================================
    // Public API: Traversal
    // ========================================================================

    /// Every value in ascending key order.
    pub fn enumerate(&self) -> Vec<RecordId> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = &self.root {
            root.collect_values(&mut out);
        }
        out
    }

    /// Lazy in-order iterator over `(key, value)` pairs.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Every key in ascending order.
    pub fn keys(&self) -> Vec<i64> {
        self.iter().map(|(k, _)| k).collect()
    }
}

impl PartialEq for BTree {
    /// Structural equality: same degree, same node shapes, same entries.
    /// Statistics are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.degree == other.degree && self.len == other.len && self.root == other.root
    }
}

impl Eq for BTree {}

impl<'a> IntoIterator for &'a BTree {
    type Item = (i64, RecordId);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
