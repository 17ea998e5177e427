//! Configuration for indexdb.
//!
//! # Environment Variables
//! - `INDEXDB_COMMAND_FILE`: command script to run (default: `input.txt`)
//! - `INDEXDB_DATA_FILE`: delimited record file to load and mirror (default: `Student.csv`)
//! - `INDEXDB_RECORD_ID_SEED`: seed for generated record ids (default: seeded from the OS)

use std::path::PathBuf;

use crate::common::{Error, Result};

/// Smallest legal minimum degree.
///
/// With `t = 2` every node holds 1 to 3 keys (a 2-3-4 tree).
pub const MIN_DEGREE: usize = 2;

/// Largest legal minimum degree.
///
/// Node capacity `2t - 1` must fit in a `usize`.
pub const MAX_DEGREE: usize = usize::MAX / 2;

/// Degree used when a script does not start with one.
pub const DEFAULT_DEGREE: usize = 3;

/// Default command script path.
pub const DEFAULT_COMMAND_FILE: &str = "input.txt";

/// Default record file path.
pub const DEFAULT_DATA_FILE: &str = "Student.csv";

/// Maximum number of pairs a node of degree `t` may hold (`2t - 1`).
#[inline]
pub const fn max_entries(t: usize) -> usize {
    2 * t - 1
}

/// Minimum number of pairs a non-root node of degree `t` must hold (`t - 1`).
#[inline]
pub const fn min_entries(t: usize) -> usize {
    t - 1
}

/// Runtime configuration for the `indexdb` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Script of `insert`/`delete`/`search`/`print` commands.
    pub command_file: PathBuf,
    /// Record file used for the bulk load and as the persistence mirror.
    pub data_file: PathBuf,
    /// Fixed seed for generated record ids; `None` draws from the OS.
    pub record_id_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_file: PathBuf::from(DEFAULT_COMMAND_FILE),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            record_id_seed: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Returns `Error::Config` if `INDEXDB_RECORD_ID_SEED` is set but is not
    /// an unsigned integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("INDEXDB_COMMAND_FILE").filter(|v| !v.is_empty()) {
            config.command_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("INDEXDB_DATA_FILE").filter(|v| !v.is_empty()) {
            config.data_file = PathBuf::from(path);
        }
        if let Some(seed) = lookup("INDEXDB_RECORD_ID_SEED") {
            let seed = seed.trim().parse::<u64>().map_err(|e| Error::Config {
                name: "INDEXDB_RECORD_ID_SEED".to_string(),
                message: e.to_string(),
            })?;
            config.record_id_seed = Some(seed);
        }

        Ok(config)
    }

    /// Apply positional arguments: `[COMMAND_FILE] [DATA_FILE]`.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        if let Some(command_file) = args.next() {
            self.command_file = PathBuf::from(command_file);
        }
        if let Some(data_file) = args.next() {
            self.data_file = PathBuf::from(data_file);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_entry_bounds() {
        assert_eq!(max_entries(2), 3);
        assert_eq!(min_entries(2), 1);
        assert_eq!(max_entries(3), 5);
        assert_eq!(min_entries(3), 2);
        assert!(DEFAULT_DEGREE >= MIN_DEGREE);
        assert!(DEFAULT_DEGREE <= MAX_DEGREE);
        assert_eq!(max_entries(MAX_DEGREE), usize::MAX - 2);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.command_file, PathBuf::from("input.txt"));
        assert_eq!(config.data_file, PathBuf::from("Student.csv"));
        assert_eq!(config.record_id_seed, None);
    }

    #[test]
    fn test_config_from_vars() {
        let config = Config::from_lookup(lookup_from(&[
            ("INDEXDB_COMMAND_FILE", "cmds.txt"),
            ("INDEXDB_DATA_FILE", "data.csv"),
            ("INDEXDB_RECORD_ID_SEED", "17"),
        ]))
        .unwrap();

        assert_eq!(config.command_file, PathBuf::from("cmds.txt"));
        assert_eq!(config.data_file, PathBuf::from("data.csv"));
        assert_eq!(config.record_id_seed, Some(17));
    }

    #[test]
    fn test_config_bad_seed() {
        let err = Config::from_lookup(lookup_from(&[("INDEXDB_RECORD_ID_SEED", "abc")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config { ref name, .. } if name == "INDEXDB_RECORD_ID_SEED"));
    }

    #[test]
    fn test_config_args_override() {
        let config = Config::default().with_args(vec!["a.txt".to_string(), "b.csv".to_string()]);
        assert_eq!(config.command_file, PathBuf::from("a.txt"));
        assert_eq!(config.data_file, PathBuf::from("b.csv"));

        let config = Config::default().with_args(vec!["only.txt".to_string()]);
        assert_eq!(config.command_file, PathBuf::from("only.txt"));
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
    }
}
