//! Command definitions
//!
//! Represents one parsed input line.

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write `text` as the record at 1-based `position`
    Write { position: usize, text: String },

    /// Show all records
    List,

    /// Show the record count
    Count,

    /// Initialize the store (the session asks for confirmation first)
    Init,

    /// Show command help
    Help,

    /// Empty line: no-op
    Empty,

    /// Anything unrecognized
    Invalid,
}
