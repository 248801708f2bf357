//! Scanner and tree builder for mustache-style templates.
//!
//! This crate turns template text into a [`Document`]: a tree of text runs,
//! interpolations, sections and partial references, plus a flat registry of
//! the inline partials the template defines. Rendering lives in the `stache`
//! crate; this one only knows about syntax.
//!
//! # Example
//!
//! ```rust
//! use stache_parser::{parse, Node};
//!
//! let doc = parse("Hello {{#people}}{{name}} {{/people}}!").unwrap();
//! assert_eq!(doc.root.children.len(), 3);
//! assert!(matches!(doc.root.children[1], Node::Section(_)));
//! ```
//!
//! # Tag Syntax
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{{name}}` | escaped interpolation |
//! | `{{{name}}}` | unescaped interpolation (default delimiters only) |
//! | `{{&name}}` | unescaped interpolation |
//! | `{{#name}}...{{/name}}` | section |
//! | `{{^name}}...{{/name}}` | inverted section |
//! | `{{<name}}...{{/name}}` | inline partial definition |
//! | `{{>name}}` | partial reference |
//! | `{{! text }}` | comment |
//! | `{{=<% %>=}}` | delimiter change |
//!
//! Delimiter changes last until the next change or until the close of the
//! enclosing inline partial definition, after which `{{`/`}}` apply again.

mod builder;
mod delimiters;
mod element;
mod error;
mod scanner;

pub use builder::build;
pub use delimiters::{Delimiters, DEFAULT_CLOSE, DEFAULT_OPEN};
pub use element::{Block, Document, Node, Partial, Section, Variable};
pub use error::{ParseError, Result};
pub use scanner::{Scanner, Tag};

/// Parses a template using the default delimiters.
pub fn parse(source: &str) -> Result<Document> {
    build(source, Scanner::new(source))
}

/// Parses a template that starts out with `delimiters` active.
///
/// Used to re-parse lambda output inside a section that was opened under
/// custom delimiters.
pub fn parse_with_delimiters(source: &str, delimiters: Delimiters) -> Result<Document> {
    build(source, Scanner::with_delimiters(source, delimiters)?)
}
