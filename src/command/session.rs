//! Command execution against an index and its record mirror.

use std::fmt;

use crate::command::{Command, Script};
use crate::common::{Error, RecordId, RecordIdSource, Result};
use crate::index::{BTree, LoadReport};
use crate::storage::{Record, RecordSink};

/// Result of one command, rendered for the console by `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Inserted { key: i64, record_id: RecordId },
    DuplicateKey(i64),
    Deleted(i64),
    DeleteFailed(i64),
    Found(RecordId),
    NotFound(i64),
    Listing(Vec<RecordId>),
    /// A script line that could not be parsed; the script carries on.
    Rejected { line: usize, message: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted { key, record_id } => {
                write!(f, "Student {} inserted at {}", key, record_id)
            }
            Outcome::DuplicateKey(key) => write!(f, "Student {} already exists.", key),
            Outcome::Deleted(_) => write!(f, "Student deleted successfully."),
            Outcome::DeleteFailed(_) => write!(f, "Student deletion failed."),
            Outcome::Found(record_id) => {
                write!(f, "Student exists in the database at {}", record_id)
            }
            Outcome::NotFound(_) => write!(f, "Student does not exist."),
            Outcome::Listing(ids) => {
                write!(f, "List of recordIDs in B-Tree [")?;
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", id)?;
                }
                write!(f, "]")
            }
            Outcome::Rejected { line, message } => {
                write!(f, "Wrong operation on line {}: {}", line, message)
            }
        }
    }
}

/// An index plus the collaborators the command layer drives.
///
/// # Mirroring
/// The tree is mutated first. Only a mutation that took effect is passed on
/// to the [`RecordSink`]: a rejected duplicate or a delete of an absent key
/// never touches it.
///
/// # Usage
/// ```
/// use indexdb::command::{Command, Outcome, Session};
/// use indexdb::storage::MemorySink;
/// use indexdb::{BTree, RecordId, SequentialRecordIds};
///
/// let tree = BTree::new(2).unwrap();
/// let mut session = Session::new(tree, MemorySink::new(), SequentialRecordIds::starting_at(1));
///
/// session.run_line("insert 7 Grace Hopper Navy Senior 85").unwrap();
/// let outcome = session.execute(Command::Search(7)).unwrap();
/// assert_eq!(outcome, Outcome::Found(RecordId::new(1)));
/// assert_eq!(session.sink().records().len(), 1);
/// ```
pub struct Session<S: RecordSink, R: RecordIdSource> {
    tree: BTree,
    sink: S,
    ids: R,
}

impl<S: RecordSink, R: RecordIdSource> Session<S, R> {
    pub fn new(tree: BTree, sink: S, ids: R) -> Self {
        Self { tree, sink, ids }
    }

    pub fn tree(&self) -> &BTree {
        &self.tree
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (BTree, S, R) {
        (self.tree, self.sink, self.ids)
    }

    /// Index records that are already stored. Nothing is mirrored.
    pub fn load(&mut self, records: &[Record]) -> LoadReport {
        let report = self.tree.bulk_load(records.iter().map(Record::index_entry));
        tracing::info!(
            inserted = report.inserted,
            duplicates = report.duplicates,
            "indexed stored records"
        );
        report
    }

    /// Run one command.
    ///
    /// # Errors
    /// Only sink failures are errors. Duplicates and missing keys are
    /// ordinary outcomes.
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        tracing::debug!(?command, "executing");

        let outcome = match command {
            Command::Insert { key, record_id, .. } => {
                if self.tree.contains(key) {
                    return Ok(Outcome::DuplicateKey(key));
                }
                let record_id = record_id.unwrap_or_else(|| self.ids.next_record_id());
                match self.tree.insert(key, record_id) {
                    Ok(()) => {
                        if let Some(record) = command.to_record(record_id) {
                            self.sink.append(&record)?;
                        }
                        Outcome::Inserted { key, record_id }
                    }
                    Err(Error::DuplicateKey(key)) => Outcome::DuplicateKey(key),
                    Err(e) => return Err(e),
                }
            }
            Command::Delete(key) => {
                if self.tree.delete(key) {
                    self.sink.remove(key)?;
                    Outcome::Deleted(key)
                } else {
                    Outcome::DeleteFailed(key)
                }
            }
            Command::Search(key) => match self.tree.search(key) {
                Some(record_id) => Outcome::Found(record_id),
                None => Outcome::NotFound(key),
            },
            Command::Print => Outcome::Listing(self.tree.enumerate()),
        };
        Ok(outcome)
    }

    /// Parse and run one command line. Blank lines yield `None`.
    ///
    /// # Errors
    /// Returns `Error::InvalidCommand` for a bad line, or a sink error.
    pub fn run_line(&mut self, line: &str) -> Result<Option<Outcome>> {
        match Command::parse(line)? {
            Some(command) => self.execute(command).map(Some),
            None => Ok(None),
        }
    }

    /// Run every line of a script, in order.
    ///
    /// Bad lines become [`Outcome::Rejected`] and the script continues;
    /// a sink error stops it.
    pub fn run_script(&mut self, script: &Script) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::with_capacity(script.lines.len());

        for line in &script.lines {
            match self.run_line(&line.text) {
                Ok(Some(outcome)) => outcomes.push(outcome),
                Ok(None) => {}
                Err(Error::InvalidCommand(message)) => {
                    tracing::warn!(line = line.number, %message, "skipping bad command");
                    outcomes.push(Outcome::Rejected {
                        line: line.number,
                        message,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(outcomes)
    }
}
