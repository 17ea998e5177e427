//! Common types and utilities shared across indexdb.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and environment loading
//! - Error types
//! - Record identifiers and identifier sources

pub mod config;
pub mod error;
mod record_id;

pub use error::{Error, Result};
pub use record_id::{RandomRecordIds, RecordId, RecordIdSource, SequentialRecordIds};
