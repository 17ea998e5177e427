//! Shared access to a tree across threads.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::{RecordId, Result};
use crate::index::btree::{BTree, TreeStats};

/// A [`BTree`] behind a reader-writer lock.
///
/// The tree itself is single-threaded. This wrapper serializes mutation
/// externally:
/// - `search`, `enumerate`, `len`: shared lock, many readers at once
/// - `insert`, `delete`: exclusive lock, one writer, no readers
///
/// Readers never observe a half-finished split or merge because a writer
/// holds the lock for the whole operation.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use indexdb::{BTree, RecordId, SharedBTree};
///
/// let shared = Arc::new(SharedBTree::new(BTree::new(3).unwrap()));
/// shared.insert(1, RecordId::new(10)).unwrap();
///
/// let reader = Arc::clone(&shared);
/// let found = std::thread::spawn(move || reader.search(1)).join().unwrap();
/// assert_eq!(found, Some(RecordId::new(10)));
/// ```
pub struct SharedBTree {
    tree: RwLock<BTree>,
}

impl SharedBTree {
    pub fn new(tree: BTree) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }

    // ========================================================================
    // Shared (read) access
    // ========================================================================

    pub fn search(&self, key: i64) -> Option<RecordId> {
        self.tree.read().search(key)
    }

    pub fn enumerate(&self) -> Vec<RecordId> {
        self.tree.read().enumerate()
    }

    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    pub fn stats(&self) -> TreeStats {
        self.tree.read().stats()
    }

    /// Hold the read lock for a multi-step inspection.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, BTree> {
        self.tree.read()
    }

    // ========================================================================
    // Exclusive (write) access
    // ========================================================================

    /// See [`BTree::insert`].
    pub fn insert(&self, key: i64, value: RecordId) -> Result<()> {
        self.tree.write().insert(key, value)
    }

    /// See [`BTree::delete`].
    pub fn delete(&self, key: i64) -> bool {
        self.tree.write().delete(key)
    }

    /// Hold the write lock for a multi-step mutation.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, BTree> {
        self.tree.write()
    }

    /// Unwrap the inner tree.
    pub fn into_inner(self) -> BTree {
        self.tree.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_shared_basic() {
        let shared = SharedBTree::new(BTree::new(2).unwrap());
        assert!(shared.is_empty());

        shared.insert(5, RecordId(50)).unwrap();
        shared.insert(3, RecordId(30)).unwrap();
        assert_eq!(shared.len(), 2);
        assert_eq!(shared.search(3), Some(RecordId(30)));
        assert_eq!(shared.enumerate(), vec![RecordId(30), RecordId(50)]);

        assert!(shared.delete(5));
        assert!(!shared.delete(5));
        assert_eq!(shared.into_inner().len(), 1);
    }

    #[test]
    fn test_concurrent_writers_disjoint_keys() {
        let shared = Arc::new(SharedBTree::new(BTree::new(3).unwrap()));
        let mut handles = vec![];

        for w in 0..4i64 {
            let shared = Arc::clone(&shared);
            handles.push(thread::spawn(move || {
                for k in 0..250 {
                    shared.insert(w * 1000 + k, RecordId(k)).unwrap();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(shared.len(), 1000);
        shared.read().validate().unwrap();
    }

    #[test]
    fn test_readers_during_writes() {
        let shared = Arc::new(SharedBTree::new(BTree::new(2).unwrap()));
        for k in 0..100 {
            shared.insert(k, RecordId(k)).unwrap();
        }

        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for k in 0..50 {
                    assert!(shared.delete(k * 2));
                }
            })
        };

        let reader = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for _ in 0..50 {
                    let tree = shared.read();
                    tree.validate().unwrap();
                    // Odd keys are never deleted.
                    assert_eq!(tree.search(51), Some(RecordId(51)));
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();

        assert_eq!(shared.len(), 50);
    }
}
