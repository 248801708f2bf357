//! The compiled template tree.
//!
//! A [`Document`] is produced once by [`parse`](crate::parse) and never
//! mutated afterwards, so a single document can be rendered any number of
//! times (and from several threads) without coordination.
//!
//! Closing tags and delimiter changes only exist in the scanner's tag stream
//! (see [`Tag`](crate::Tag)); they never appear in the tree.

use std::collections::HashMap;

use crate::delimiters::Delimiters;

/// A node of the compiled tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal output text.
    Text(String),
    /// `{{name}}`, `{{{name}}}` or `{{&name}}`.
    Variable(Variable),
    /// `{{#name}}...{{/name}}`.
    Section(Section),
    /// `{{^name}}...{{/name}}`.
    InvertedSection(Section),
    /// `{{>name}}`.
    Partial(Partial),
}

/// An interpolation tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub key: String,
    /// `false` for the triple-mustache and ampersand forms.
    pub escape: bool,
}

/// A section or inverted section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: String,
    pub children: Vec<Node>,
    /// The exact source between the opening tag and the closing tag.
    ///
    /// Handed to lambdas, which receive the unrendered block.
    pub raw_text: String,
    /// The delimiters that were active at the opening tag.
    pub delimiters: Delimiters,
}

/// A reference to a named partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    pub key: String,
    /// Leading whitespace of a standalone reference, applied to every line
    /// of the partial. Empty for inline references.
    pub indent: String,
}

/// A keyed list of nodes: the template root (empty key) or an inline
/// partial definition (`{{<name}}...{{/name}}`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub key: String,
    pub children: Vec<Node>,
}

/// A fully parsed template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level nodes in document order.
    pub root: Block,
    /// Every inline partial definition, whatever its nesting depth.
    pub partials: HashMap<String, Block>,
}

impl Document {
    /// Looks up an inline partial definition by name.
    pub fn partial(&self, key: &str) -> Option<&Block> {
        self.partials.get(key)
    }
}
