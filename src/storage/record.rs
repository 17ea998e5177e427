//! Record layout for the delimited record file.

use std::fmt;
use std::str::FromStr;

use crate::common::{Error, RecordId, Result};

/// Number of comma-separated fields in one record line.
pub const RECORD_FIELDS: usize = 6;

/// One stored student record.
///
/// # Line format
/// ```text
/// key,name,major,level,age,record_id
/// 7734,Jane Doe,Physics,Senior,22,1042
/// ```
///
/// Only `key` and `record_id` reach the index; the rest is carried along
/// for the record file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: i64,
    pub name: String,
    pub major: String,
    pub level: String,
    pub age: u32,
    pub record_id: RecordId,
}

impl Record {
    /// Parse one line of the record file.
    ///
    /// `line_no` is 1-based and only used in error messages.
    ///
    /// # Errors
    /// Returns `Error::MalformedRecord` if the field count is wrong, a text
    /// field is empty, or a numeric field does not parse.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedRecord {
            line: line_no,
            reason,
        };

        let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        if fields.len() != RECORD_FIELDS {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                RECORD_FIELDS,
                fields.len()
            )));
        }

        let key = fields[0]
            .parse::<i64>()
            .map_err(|e| malformed(format!("bad key {:?}: {}", fields[0], e)))?;
        let age = fields[4]
            .parse::<u32>()
            .map_err(|e| malformed(format!("bad age {:?}: {}", fields[4], e)))?;
        let record_id = fields[5]
            .parse::<i64>()
            .map_err(|e| malformed(format!("bad record id {:?}: {}", fields[5], e)))?;

        for (name, value) in [("name", fields[1]), ("major", fields[2]), ("level", fields[3])] {
            if value.is_empty() {
                return Err(malformed(format!("empty {}", name)));
            }
        }

        Ok(Self {
            key,
            name: fields[1].to_string(),
            major: fields[2].to_string(),
            level: fields[3].to_string(),
            age,
            record_id: RecordId(record_id),
        })
    }

    /// The `(key, value)` pair indexed for this record.
    #[inline]
    pub fn index_entry(&self) -> (i64, RecordId) {
        (self.key, self.record_id)
    }
}

impl fmt::Display for Record {
    /// Writes the record as one line of the record file (no newline).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.key, self.name, self.major, self.level, self.age, self.record_id
        )
    }
}

impl FromStr for Record {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_line(s, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            key: 7734,
            name: "Jane Doe".to_string(),
            major: "Physics".to_string(),
            level: "Senior".to_string(),
            age: 22,
            record_id: RecordId(1042),
        }
    }

    #[test]
    fn test_parse_line() {
        let record = Record::parse_line("7734,Jane Doe,Physics,Senior,22,1042", 1).unwrap();
        assert_eq!(record, sample());
        assert_eq!(record.index_entry(), (7734, RecordId(1042)));
    }

    #[test]
    fn test_display_is_line_format() {
        assert_eq!(sample().to_string(), "7734,Jane Doe,Physics,Senior,22,1042");
        let parsed: Record = sample().to_string().parse().unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let record = Record::parse_line("  7734, Jane Doe ,Physics,Senior, 22 ,1042\r", 1).unwrap();
        assert_eq!(record, sample());
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let err = Record::parse_line("1,Jane,Physics", 4).unwrap_err();
        match err {
            Error::MalformedRecord { line, reason } => {
                assert_eq!(line, 4);
                assert!(reason.contains("expected 6 fields"));
            }
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bad_numbers() {
        assert!(Record::parse_line("x,Jane Doe,Physics,Senior,22,1", 1).is_err());
        assert!(Record::parse_line("1,Jane Doe,Physics,Senior,-3,1", 1).is_err());
        assert!(Record::parse_line("1,Jane Doe,Physics,Senior,22,id", 1).is_err());
    }

    #[test]
    fn test_parse_empty_text_field() {
        let err = Record::parse_line("1,,Physics,Senior,22,1", 2).unwrap_err();
        assert!(err.to_string().contains("empty name"));
    }
}
