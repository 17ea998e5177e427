//! Command and script parsing.

use crate::common::config::{DEFAULT_DEGREE, MAX_DEGREE, MIN_DEGREE};
use crate::common::{Error, RecordId, Result};
use crate::storage::Record;

/// One line-oriented command.
///
/// # Syntax
/// ```text
/// insert <id> <first> <last> <major> <level> <age> [record_id]
/// delete <id>
/// search <id>
/// print
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert {
        key: i64,
        name: String,
        major: String,
        level: String,
        age: u32,
        /// Drawn from the session's id source when absent.
        record_id: Option<RecordId>,
    },
    Delete(i64),
    Search(i64),
    Print,
}

impl Command {
    /// Parse one command line.
    ///
    /// Returns `Ok(None)` for a blank line.
    ///
    /// # Errors
    /// Returns `Error::InvalidCommand` for an unknown verb, a wrong number
    /// of arguments, or an argument that does not parse.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match verb {
            "insert" => Self::parse_insert(args)?,
            "delete" => Command::Delete(parse_key(expect_one(verb, args)?)?),
            "search" => Command::Search(parse_key(expect_one(verb, args)?)?),
            "print" => {
                if !args.is_empty() {
                    return Err(invalid(format!("print takes no arguments, got {}", args.len())));
                }
                Command::Print
            }
            other => return Err(invalid(format!("unknown operation {:?}", other))),
        };
        Ok(Some(command))
    }

    fn parse_insert(args: &[&str]) -> Result<Self> {
        if args.len() != 6 && args.len() != 7 {
            return Err(invalid(format!(
                "insert expects <id> <first> <last> <major> <level> <age> [record_id], got {} arguments",
                args.len()
            )));
        }

        let key = parse_key(args[0])?;
        for field in &args[1..5] {
            if field.contains(',') {
                return Err(invalid(format!("field {:?} must not contain ','", field)));
            }
        }
        let age = args[5]
            .parse::<u32>()
            .map_err(|e| invalid(format!("bad age {:?}: {}", args[5], e)))?;
        let record_id = match args.get(6) {
            Some(raw) => Some(RecordId(
                raw.parse::<i64>()
                    .map_err(|e| invalid(format!("bad record id {:?}: {}", raw, e)))?,
            )),
            None => None,
        };

        Ok(Command::Insert {
            key,
            name: format!("{} {}", args[1], args[2]),
            major: args[3].to_string(),
            level: args[4].to_string(),
            age,
            record_id,
        })
    }

    /// Build the record an insert command describes.
    ///
    /// Returns `None` for any other command.
    pub fn to_record(&self, record_id: RecordId) -> Option<Record> {
        match self {
            Command::Insert {
                key,
                name,
                major,
                level,
                age,
                ..
            } => Some(Record {
                key: *key,
                name: name.clone(),
                major: major.clone(),
                level: level.clone(),
                age: *age,
                record_id,
            }),
            _ => None,
        }
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidCommand(message)
}

fn expect_one<'a>(verb: &str, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(invalid(format!("{} expects exactly one <id>, got {} arguments", verb, args.len()))),
    }
}

fn parse_key(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|e| invalid(format!("bad id {:?}: {}", raw, e)))
}

/// A line of a command script, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub number: usize,
    pub text: String,
}

/// A command script: the tree degree followed by command lines.
///
/// # Format
/// ```text
/// 3                                  <- degree (optional)
/// insert 1001 Ada Lovelace Math Senior 36
/// search 1001
/// print
/// ```
///
/// If the first non-blank line is not a number, the script uses
/// [`DEFAULT_DEGREE`] and that line is treated as a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub degree: usize,
    pub lines: Vec<ScriptLine>,
}

impl Script {
    /// Split script text into its degree and command lines.
    ///
    /// Blank lines are dropped; command lines are kept unparsed so each can
    /// be reported on its own when it runs.
    ///
    /// # Errors
    /// Returns `Error::InvalidDegree` if the degree line is a number outside
    /// `MIN_DEGREE..=MAX_DEGREE`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| ScriptLine {
                number: i + 1,
                text: line.trim().to_string(),
            })
            .filter(|line| !line.text.is_empty())
            .peekable();

        let mut degree = DEFAULT_DEGREE;
        if let Some(first) = lines.peek() {
            if let Ok(t) = first.text.parse::<usize>() {
                if !(MIN_DEGREE..=MAX_DEGREE).contains(&t) {
                    return Err(Error::InvalidDegree(t));
                }
                degree = t;
                lines.next();
            }
        }

        Ok(Self {
            degree,
            lines: lines.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   \t ").unwrap(), None);
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("delete 42").unwrap(), Some(Command::Delete(42)));
        assert_eq!(Command::parse("  search   -7 ").unwrap(), Some(Command::Search(-7)));
        assert_eq!(Command::parse("print").unwrap(), Some(Command::Print));
    }

    #[test]
    fn test_parse_insert_without_record_id() {
        let cmd = Command::parse("insert 1001 Ada Lovelace Math Senior 36").unwrap();
        assert_eq!(
            cmd,
            Some(Command::Insert {
                key: 1001,
                name: "Ada Lovelace".to_string(),
                major: "Math".to_string(),
                level: "Senior".to_string(),
                age: 36,
                record_id: None,
            })
        );
    }

    #[test]
    fn test_parse_insert_with_record_id() {
        let cmd = Command::parse("insert 5 Alan Turing CS Graduate 41 900")
            .unwrap()
            .unwrap();
        let record = cmd.to_record(RecordId(900)).unwrap();
        assert_eq!(record.key, 5);
        assert_eq!(record.name, "Alan Turing");
        assert_eq!(record.record_id, RecordId(900));
        assert!(matches!(cmd, Command::Insert { record_id: Some(RecordId(900)), .. }));
    }

    #[test]
    fn test_parse_errors() {
        for line in [
            "frobnicate 1",
            "delete",
            "delete 1 2",
            "search abc",
            "print now",
            "insert 1 Ada Lovelace Math Senior",
            "insert 1 Ada Lovelace Math Senior old",
            "insert 1 Ada Lovelace Math Senior 36 rid",
            "insert 1 Ada Lovelace Math Senior 36 7 extra",
            "insert 1 Ada Love,lace Math Senior 36",
            "insert 1 Ada, Lovelace Math Senior 36",
            "insert 1 Ada Lovelace Math,CS Senior 36",
            "insert 1 Ada Lovelace Math Senior, 36",
        ] {
            let err = Command::parse(line).unwrap_err();
            assert!(matches!(err, Error::InvalidCommand(_)), "line {:?}", line);
        }
    }

    #[test]
    fn test_to_record_only_for_insert() {
        assert_eq!(Command::Print.to_record(RecordId(1)), None);
        assert_eq!(Command::Delete(3).to_record(RecordId(1)), None);
    }

    #[test]
    fn test_script_with_degree() {
        let script = Script::parse("\n2\n\ninsert 1 A B C D 20\nprint\n").unwrap();
        assert_eq!(script.degree, 2);
        assert_eq!(script.lines.len(), 2);
        assert_eq!(script.lines[0].number, 4);
        assert_eq!(script.lines[0].text, "insert 1 A B C D 20");
        assert_eq!(script.lines[1].text, "print");
    }

    #[test]
    fn test_script_without_degree() {
        let script = Script::parse("search 1\nprint").unwrap();
        assert_eq!(script.degree, DEFAULT_DEGREE);
        assert_eq!(script.lines.len(), 2);
    }

    #[test]
    fn test_script_rejects_small_degree() {
        assert!(matches!(Script::parse("1\nprint"), Err(Error::InvalidDegree(1))));
    }

    #[test]
    fn test_script_rejects_overflowing_degree() {
        let text = format!("{}\ninsert 1 A B C D 20\ninsert 2 E F G H 21", MAX_DEGREE + 1);
        assert!(matches!(Script::parse(&text), Err(Error::InvalidDegree(t)) if t == MAX_DEGREE + 1));

        let text = format!("{}\nprint", MAX_DEGREE);
        assert_eq!(Script::parse(&text).unwrap().degree, MAX_DEGREE);
    }

    #[test]
    fn test_empty_script() {
        let script = Script::parse("").unwrap();
        assert_eq!(script.degree, DEFAULT_DEGREE);
        assert!(script.lines.is_empty());
    }
}
