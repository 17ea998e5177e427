//! indexdb - An ordered record index backed by a degree-parameterized B-tree.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            indexdb                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Command Layer (command/)                    │   │
//! │  │        Script → Command → Session → Outcome              │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                  ↓                            ↓                 │
//! │  ┌───────────────────────────┐  ┌──────────────────────────┐   │
//! │  │     Index (index/)        │  │   Storage (storage/)     │   │
//! │  │  BTree + SharedBTree      │  │  Record + RecordFile     │   │
//! │  │  no I/O, single-threaded  │  │  bulk load + mirror      │   │
//! │  └───────────────────────────┘  └──────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (RecordId, Error, config)
//! - [`index`] - The B-tree engine
//! - [`storage`] - Record file format and persistence mirror
//! - [`command`] - Command parsing and execution
//!
//! # Quick Start
//! ```
//! use indexdb::{BTree, RecordId};
//!
//! let mut tree = BTree::new(2).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key, RecordId::new(key * 100)).unwrap();
//! }
//!
//! assert_eq!(tree.search(6), Some(RecordId::new(600)));
//! assert!(tree.delete(6));
//! assert_eq!(tree.keys(), vec![5, 7, 10, 12, 17, 20, 30]);
//! ```

pub mod command;
pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::{Error, RandomRecordIds, RecordId, RecordIdSource, Result, SequentialRecordIds};

pub use index::{BTree, InvariantViolation, LoadReport, SharedBTree, TreeStats};
pub use storage::{Record, RecordFile};
