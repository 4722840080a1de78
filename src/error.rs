//! Error types for the dictionary engines.
//!
//! Missing keys and a full [`StaticSortedList`](crate::StaticSortedList) are
//! not errors; they are reported through return values or ignored.

use thiserror::Error;

/// Result type for fallible dictionary operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No engine is registered under the given name.
    #[error("unknown dictionary engine \"{0}\"")]
    UnknownEngine(String),

    /// Positional access past the end of a sorted list.
    #[error("index {index} out of range for dictionary of length {len}")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of stored keys at the time of the access.
        len: usize,
    },
}
