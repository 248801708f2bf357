//! Error types for template parsing.

use thiserror::Error;

/// Errors that can occur while scanning or assembling a template.
///
/// Parsing is atomic: either the whole template compiles into a
/// [`Document`](crate::Document) or one of these errors is returned.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A closing tag does not match the block that is currently open.
    #[error("end tag '{found}' does not match open tag '{expected}'")]
    MismatchedEndTag { expected: String, found: String },

    /// A closing tag appeared while no block was open.
    #[error("end tag '{key}' has no matching open tag")]
    UnexpectedEndTag { key: String },

    /// The input ended while one or more blocks were still open.
    #[error("blocks '{}' are not closed", keys.join(", "))]
    UnterminatedBlocks { keys: Vec<String> },

    /// An open delimiter was found without a matching close delimiter.
    #[error("tag opened at byte {offset} is never closed")]
    UnclosedTag { offset: usize },

    /// Two inline partial definitions use the same name.
    #[error("partial '{key}' is defined more than once")]
    DuplicatePartial { key: String },

    /// A delimiter pair could not be compiled into a matcher.
    #[error("invalid delimiter pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;
