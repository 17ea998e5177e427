//! Record identifier type and identifier sources.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Opaque identifier of a stored record.
///
/// The index never interprets the value; it only hands it back from
/// `search` and `enumerate`.
///
/// # Example
/// ```
/// use indexdb::RecordId;
///
/// let rid = RecordId::new(42);
/// assert_eq!(rid.0, 42);
/// assert_eq!(rid.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Create a new RecordId.
    #[inline]
    pub fn new(id: i64) -> Self {
        RecordId(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId(id)
    }
}

/// Hands out identifiers for records inserted without one.
pub trait RecordIdSource {
    fn next_record_id(&mut self) -> RecordId;
}

/// Random non-negative identifiers.
pub struct RandomRecordIds {
    rng: StdRng,
}

impl RandomRecordIds {
    /// Seed from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomRecordIds {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordIdSource for RandomRecordIds {
    fn next_record_id(&mut self) -> RecordId {
        RecordId(self.rng.random_range(0..i64::MAX))
    }
}

/// Counts upward from a starting identifier.
#[derive(Debug, Clone)]
pub struct SequentialRecordIds {
    next: i64,
}

impl SequentialRecordIds {
    pub fn starting_at(first: i64) -> Self {
        Self { next: first }
    }
}

impl RecordIdSource for SequentialRecordIds {
    fn next_record_id(&mut self) -> RecordId {
        let id = RecordId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
