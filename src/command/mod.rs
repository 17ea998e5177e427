//! Command processing.
//!
//! Turns textual commands into index operations and renders the results.
//!
//! # Components
//! - [`Command`] / [`Script`] - Parsing of single lines and whole scripts
//! - [`Session`] - Executes commands against a tree, a record sink, and an id source
//! - [`Outcome`] - Per-command result with console rendering

mod parser;
mod session;

pub use parser::{Command, Script, ScriptLine};
pub use session::{Outcome, Session};
