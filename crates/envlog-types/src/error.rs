//! Error types for payload parsing in envlog-types.

use thiserror::Error;

/// Errors that can occur when parsing a submitted reading.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The payload could not be parsed into a reading (missing or mistyped fields).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias using envlog-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
