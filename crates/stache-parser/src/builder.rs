//! Assembles the scanner's flat tag stream into a [`Document`].
//!
//! Open blocks are kept on an explicit stack; each closing tag must match the
//! innermost open block. Children are collected on the stack frame and the
//! finished block is attached to its parent when it closes.

use std::collections::HashMap;

use crate::delimiters::Delimiters;
use crate::element::{Block, Document, Node, Partial, Section, Variable};
use crate::error::{ParseError, Result};
use crate::scanner::Tag;

#[derive(Debug)]
enum OpenBlock {
    Section {
        inverted: bool,
        content_start: usize,
        delimiters: Delimiters,
    },
    PartialDefinition,
}

enum Closed {
    Node(Node),
    Definition(Block),
}

#[derive(Debug)]
struct Frame {
    key: String,
    kind: OpenBlock,
    children: Vec<Node>,
}

/// Builds a [`Document`] from `tags`, scanned from `source`.
///
/// `source` must be the text the tags were scanned from; section raw text is
/// sliced out of it.
pub fn build<'a, I>(source: &'a str, tags: I) -> Result<Document>
where
    I: IntoIterator<Item = Result<Tag<'a>>>,
{
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut partials: HashMap<String, Block> = HashMap::new();

    for tag in tags {
        let node = match tag? {
            Tag::Text(text) => Node::Text(text.to_string()),
            Tag::Variable { key, escape } => Node::Variable(Variable {
                key: key.to_string(),
                escape,
            }),
            Tag::Partial { key, indent } => Node::Partial(Partial {
                key: key.to_string(),
                indent: indent.to_string(),
            }),
            Tag::Section {
                key,
                content_start,
                delimiters,
            } => {
                stack.push(Frame::open(key, false, content_start, delimiters));
                continue;
            }
            Tag::InvertedSection {
                key,
                content_start,
                delimiters,
            } => {
                stack.push(Frame::open(key, true, content_start, delimiters));
                continue;
            }
            Tag::PartialDefinition { key } => {
                stack.push(Frame {
                    key: key.to_string(),
                    kind: OpenBlock::PartialDefinition,
                    children: Vec::new(),
                });
                continue;
            }
            Tag::DelimiterChange(delimiters) => {
                tracing::trace!(?delimiters, "delimiters changed");
                continue;
            }
            Tag::EndBlock { key, tag_start } => {
                let Some(frame) = stack.pop() else {
                    return Err(ParseError::UnexpectedEndTag {
                        key: key.to_string(),
                    });
                };
                if frame.key != key {
                    return Err(ParseError::MismatchedEndTag {
                        expected: frame.key,
                        found: key.to_string(),
                    });
                }
                match frame.close(source, tag_start) {
                    Closed::Node(node) => node,
                    Closed::Definition(block) => {
                        if partials.contains_key(&block.key) {
                            return Err(ParseError::DuplicatePartial { key: block.key });
                        }
                        partials.insert(block.key.clone(), block);
                        continue;
                    }
                }
            }
        };

        match stack.last_mut() {
            Some(frame) => frame.children.push(node),
            None => root.push(node),
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::UnterminatedBlocks {
            keys: stack.into_iter().map(|frame| frame.key).collect(),
        });
    }

    tracing::debug!(
        nodes = root.len(),
        partials = partials.len(),
        "built template tree"
    );

    Ok(Document {
        root: Block {
            key: String::new(),
            children: root,
        },
        partials,
    })
}

impl Frame {
    fn open(key: &str, inverted: bool, content_start: usize, delimiters: Delimiters) -> Self {
        Self {
            key: key.to_string(),
            kind: OpenBlock::Section {
                inverted,
                content_start,
                delimiters,
            },
            children: Vec::new(),
        }
    }

    fn close(self, source: &str, tag_start: usize) -> Closed {
        let Frame {
            key,
            kind,
            children,
        } = self;
        let OpenBlock::Section {
            inverted,
            content_start,
            delimiters,
        } = kind
        else {
            return Closed::Definition(Block { key, children });
        };

        let section = Section {
            key,
            children,
            raw_text: source
                .get(content_start..tag_start)
                .unwrap_or_default()
                .to_string(),
            delimiters,
        };
        Closed::Node(if inverted {
            Node::InvertedSection(section)
        } else {
            Node::Section(section)
        })
    }
}
