//! Error types for indexdb.

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All recoverable errors in indexdb.
///
/// Key-not-found is not an error: `search` returns `None` and `delete`
/// returns `false`. Structural corruption is not represented here either;
/// see [`InvariantViolation`](crate::index::btree::InvariantViolation).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from the record file.
    ///
    /// The tree itself performs no I/O; this only comes from collaborators.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A tree was constructed with a minimum degree below 2, or one so
    /// large that the node capacity `2t - 1` overflows.
    #[error("Invalid degree {0}: minimum degree must be at least 2 and at most usize::MAX / 2")]
    InvalidDegree(usize),

    /// Insert of a key that is already indexed.
    #[error("Key {0} already exists")]
    DuplicateKey(i64),

    /// A line of the record file could not be parsed.
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A command line could not be parsed.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// An environment variable holds an unusable value.
    #[error("Invalid value for {name}: {message}")]
    Config { name: String, message: String },
}
