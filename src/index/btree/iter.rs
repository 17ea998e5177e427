//! In-order iteration.

use std::iter::FusedIterator;

use crate::common::RecordId;
use crate::index::btree::node::Node;

/// In-order iterator over a [`BTree`](super::BTree).
///
/// Holds the path from the root to the next entry as a stack of
/// `(node, next entry index)` frames, so no recursion and no allocation
/// beyond one frame per level.
pub struct Iter<'a> {
    stack: Vec<(&'a Node, usize)>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(super) fn new(root: Option<&'a Node>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        if let Some(root) = root {
            iter.push_leftmost(root);
        }
        iter
    }

    fn push_leftmost(&mut self, mut node: &'a Node) {
        loop {
            self.stack.push((node, 0));
            match node.children.first() {
                Some(child) if !node.leaf => node = child,
                _ => break,
            }
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (i64, RecordId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let (node, idx) = *top;

            if idx < node.entries.len() {
                top.1 += 1;
                let entry = node.entries[idx];
                if !node.leaf {
                    self.push_leftmost(&node.children[idx + 1]);
                }
                self.remaining = self.remaining.saturating_sub(1);
                return Some((entry.key, entry.value));
            }

            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use crate::{BTree, RecordId};

    #[test]
    fn test_iter_empty() {
        let tree = BTree::new(2).unwrap();
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().len(), 0);
    }

    #[test]
    fn test_iter_matches_enumerate() {
        let mut tree = BTree::new(2).unwrap();
        for k in [50, 20, 80, 10, 30, 70, 90, 60, 40, 25, 35] {
            tree.insert(k, RecordId(-k)).unwrap();
        }

        let pairs: Vec<(i64, RecordId)> = tree.iter().collect();
        let keys: Vec<i64> = pairs.iter().map(|(k, _)| *k).collect();
        let values: Vec<RecordId> = pairs.iter().map(|(_, v)| *v).collect();

        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
        assert_eq!(values, tree.enumerate());
    }

    #[test]
    fn test_iter_exact_size() {
        let mut tree = BTree::new(3).unwrap();
        for k in 0..25 {
            tree.insert(k, RecordId(k)).unwrap();
        }

        let mut iter = tree.iter();
        assert_eq!(iter.len(), 25);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 23);
        assert_eq!(iter.count(), 23);
    }

    #[test]
    fn test_iter_for_loop() {
        let mut tree = BTree::new(2).unwrap();
        tree.insert(2, RecordId(20)).unwrap();
        tree.insert(1, RecordId(10)).unwrap();

        let mut seen = Vec::new();
        for (key, value) in &tree {
            seen.push((key, value.0));
        }
        assert_eq!(seen, vec![(1, 10), (2, 20)]);
    }
}
