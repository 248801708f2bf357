//! Error types for compiling and rendering templates.

use stache_parser::ParseError;
use thiserror::Error;

/// Errors that can occur when compiling or rendering a template.
///
/// Lookups never fail: a key that resolves nowhere renders as empty output.
/// Rendering only fails when text that has to be compiled on the fly (a
/// caller-supplied partial or the text returned by a lambda) is malformed.
#[derive(Debug, Error)]
pub enum Error {
    /// Template text could not be parsed.
    #[error("template error: {0}")]
    Parse(#[from] ParseError),

    /// Data passed to [`Template::render_data`](crate::Template::render_data)
    /// could not be converted into a [`Value`](crate::Value).
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, Error>;
