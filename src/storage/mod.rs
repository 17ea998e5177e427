//! Record storage outside the index.
//!
//! The tree never touches files. These types sit next to it:
//! - [`Record`] - One record and its line format
//! - [`RecordFile`] - Bulk-load source and persistence mirror
//! - [`RecordSink`] - What the command layer mirrors mutations into

mod record;
mod record_file;

pub use record::{Record, RECORD_FIELDS};
pub use record_file::RecordFile;

use crate::common::Result;

/// Receives the record-level effect of every successful index mutation.
pub trait RecordSink {
    /// A record was inserted into the index.
    fn append(&mut self, record: &Record) -> Result<()>;

    /// A key was deleted from the index. Returns how many stored records
    /// were dropped.
    fn remove(&mut self, key: i64) -> Result<usize>;
}

/// A sink that keeps records in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Vec<Record>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &Record) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn remove(&mut self, key: i64) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|r| r.key != key);
        Ok(before - self.records.len())
    }
}
