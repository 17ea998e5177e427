//! Restructuring statistics.

use std::fmt;

/// Counters for the structural work a [`BTree`](super::BTree) has done.
///
/// Plain integers rather than atomics: the tree is mutated through
/// `&mut self`, so there is never more than one writer.
///
/// # Example
/// ```
/// use indexdb::{BTree, RecordId};
///
/// let mut tree = BTree::new(2).unwrap();
/// for k in 0..4 {
///     tree.insert(k, RecordId::new(k)).unwrap();
/// }
/// // The fourth insert found a full root (3 keys) and split it.
/// assert_eq!(tree.stats().splits, 1);
/// assert_eq!(tree.stats().height_grows, 1);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Full nodes split in two (root splits included).
    pub splits: u64,

    /// Sibling pairs folded into one node.
    pub merges: u64,

    /// Entries rotated in from a sibling through the parent.
    pub borrows: u64,

    /// Times the root split and the tree gained a level.
    pub height_grows: u64,

    /// Times the root emptied and the tree lost a level.
    pub height_shrinks: u64,
}

impl TreeStats {
    /// Create a stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of restructuring steps of any kind.
    pub fn restructures(&self) -> u64 {
        self.splits + self.merges + self.borrows
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ splits: {}, merges: {}, borrows: {}, height: +{}/-{} }}",
            self.splits, self.merges, self.borrows, self.height_grows, self.height_shrinks
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = TreeStats::new();
        assert_eq!(stats.splits, 0);
        assert_eq!(stats.merges, 0);
        assert_eq!(stats.restructures(), 0);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = TreeStats::new();
        stats.splits = 4;
        stats.borrows = 2;
        assert_eq!(stats.restructures(), 6);

        stats.reset();
        assert_eq!(stats, TreeStats::default());
    }

    #[test]
    fn test_stats_display() {
        let stats = TreeStats {
            splits: 8,
            merges: 3,
            borrows: 5,
            height_grows: 2,
            height_shrinks: 1,
        };
        let display = format!("{}", stats);

        assert!(display.contains("splits: 8"));
        assert!(display.contains("merges: 3"));
        assert!(display.contains("borrows: 5"));
        assert!(display.contains("height: +2/-1"));
    }
}
