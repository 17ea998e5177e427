//! Record File - the flat delimited file behind the index.
//!
//! The [`RecordFile`] handles every file operation on records:
//! - Reading all records for the startup bulk load
//! - Appending a newly inserted record
//! - Rewriting the file without a deleted key

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::common::Result;
use crate::storage::{Record, RecordSink};

/// A record file on disk.
///
/// # File Layout
/// One record per line, in insertion order, no header:
/// ```text
/// ┌───────────────────────────────────────────┐
/// │ 1001,Ada Lovelace,Math,Senior,36,9001     │
/// │ 1002,Alan Turing,CS,Graduate,41,9002      │
/// │ ...                                       │
/// └───────────────────────────────────────────┘
/// ```
///
/// Blank lines are ignored on load.
///
/// # Rewrites
/// `remove` writes the surviving lines to a sibling `*.tmp` file and renames
/// it over the original, so a crash mid-rewrite leaves either the old or the
/// new file, never a truncated one.
#[derive(Debug)]
pub struct RecordFile {
    path: PathBuf,
}

impl RecordFile {
    /// Open an existing record file.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        File::open(path.as_ref())?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Open a record file, or create an empty one if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in file order.
    ///
    /// # Errors
    /// Returns `Error::MalformedRecord` for the first line that does not
    /// parse, or an I/O error.
    pub fn load(&self) -> Result<Vec<Record>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(Record::parse_line(&line, i + 1)?);
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded records");
        Ok(records)
    }

    /// Append one record as a new line.
    pub fn append(&mut self, record: &Record) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{}", record)?;
        file.flush()?;
        Ok(())
    }

    /// Rewrite the file without any line whose key is `key`.
    ///
    /// Returns how many lines were dropped. Lines whose key field does not
    /// parse are kept as they are.
    pub fn remove(&mut self, key: i64) -> Result<usize> {
        let tmp_path = self.tmp_path();
        let reader = BufReader::new(File::open(&self.path)?);
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        let mut removed = 0;

        for line in reader.lines() {
            let line = line?;
            if line_key(&line) == Some(key) {
                removed += 1;
                continue;
            }
            writeln!(writer, "{}", line)?;
        }

        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(key, removed, "rewrote record file");
        Ok(removed)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordSink for RecordFile {
    fn append(&mut self, record: &Record) -> Result<()> {
        RecordFile::append(self, record)
    }

    fn remove(&mut self, key: i64) -> Result<usize> {
        RecordFile::remove(self, key)
    }
}

/// Key field of a record line, if it parses.
fn line_key(line: &str) -> Option<i64> {
    line.split(',').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Error, RecordId};
    use tempfile::tempdir;

    fn record(key: i64, rid: i64) -> Record {
        Record {
            key,
            name: format!("Student {}", key),
            major: "CS".to_string(),
            level: "Junior".to_string(),
            age: 20,
            record_id: RecordId(rid),
        }
    }

    #[test]
    fn test_open_or_create_creates_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.csv");

        let file = RecordFile::open_or_create(&path).unwrap();
        assert!(path.exists());
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempdir().unwrap();
        let result = RecordFile::open(dir.path().join("missing.csv"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_append_and_load() {
        let dir = tempdir().unwrap();
        let mut file = RecordFile::open_or_create(dir.path().join("records.csv")).unwrap();

        file.append(&record(2, 20)).unwrap();
        file.append(&record(1, 10)).unwrap();

        let loaded = file.load().unwrap();
        assert_eq!(loaded, vec![record(2, 20), record(1, 10)]);
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "1,A B,CS,Junior,20,5\n\n   \n2,C D,EE,Senior,21,6\n").unwrap();

        let loaded = RecordFile::open(&path).unwrap().load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].key, 2);
    }

    #[test]
    fn test_load_reports_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "1,A B,CS,Junior,20,5\n2,broken\n").unwrap();

        let err = RecordFile::open(&path).unwrap().load().unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn test_remove_rewrites_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let mut file = RecordFile::open_or_create(&path).unwrap();
        for k in 1..=4 {
            file.append(&record(k, k * 10)).unwrap();
        }

        assert_eq!(file.remove(3).unwrap(), 1);
        assert_eq!(file.remove(42).unwrap(), 0);

        let keys: Vec<i64> = file.load().unwrap().iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![1, 2, 4]);
        assert!(!dir.path().join("records.csv.tmp").exists());
    }

    #[test]
    fn test_line_key() {
        assert_eq!(line_key("17,x,y,z,1,2"), Some(17));
        assert_eq!(line_key(" -4 ,x"), Some(-4));
        assert_eq!(line_key("abc,x"), None);
        assert_eq!(line_key(""), None);
    }
}
