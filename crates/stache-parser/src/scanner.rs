//! Lazy tag scanner.
//!
//! The [`Scanner`] walks the template once, front to back, yielding text runs
//! and classified tags. It owns the only mutable parse state there is: the
//! active delimiter pair and the kinds of the blocks currently open (needed to
//! reset delimiters when an inline partial definition closes).
//!
//! # Standalone tags
//!
//! A tag is standalone when it sits alone on its line: it is preceded by a
//! newline, the start of input, the close of a partial definition, or
//! directly by the previous tag, with only horizontal whitespace in between,
//! and is followed by horizontal whitespace and a newline or end of input.
//! The whole line of a standalone tag, terminator included, is dropped.
//! Interpolation tags are never standalone.

use crate::delimiters::{Delimiters, Patterns};
use crate::error::{ParseError, Result};

/// A scanned tag or text run.
///
/// Offsets are byte positions into the scanned source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag<'a> {
    /// Literal text between tags.
    Text(&'a str),
    /// Interpolation.
    Variable { key: &'a str, escape: bool },
    /// `{{#key}}`; `content_start` is the offset right after the tag.
    Section {
        key: &'a str,
        content_start: usize,
        delimiters: Delimiters,
    },
    /// `{{^key}}`; `content_start` is the offset right after the tag.
    InvertedSection {
        key: &'a str,
        content_start: usize,
        delimiters: Delimiters,
    },
    /// `{{<key}}`.
    PartialDefinition { key: &'a str },
    /// `{{>key}}`.
    Partial { key: &'a str, indent: &'a str },
    /// `{{/key}}`; `tag_start` is the offset of its open delimiter.
    EndBlock { key: &'a str, tag_start: usize },
    /// `{{=open close=}}`, already applied to the rest of the scan.
    DelimiterChange(Delimiters),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenKind {
    Section,
    PartialDefinition,
}

/// Iterator over the tags of a template.
///
/// # Example
///
/// ```rust
/// use stache_parser::{Scanner, Tag};
///
/// let tags: Vec<_> = Scanner::new("Hi {{name}}!")
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(
///     tags,
///     vec![
///         Tag::Text("Hi "),
///         Tag::Variable { key: "name", escape: true },
///         Tag::Text("!"),
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    patterns: Patterns,
    open_blocks: Vec<OpenKind>,
    after_partial_definition: bool,
    pending: Option<Tag<'a>>,
    failed: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner using the default `{{`/`}}` delimiters.
    pub fn new(source: &'a str) -> Self {
        Self::with_patterns(source, Patterns::default_pair())
    }

    /// Creates a scanner that starts with the given delimiters.
    pub fn with_delimiters(source: &'a str, delimiters: Delimiters) -> Result<Self> {
        Ok(Self::with_patterns(
            source,
            Patterns::for_delimiters(delimiters)?,
        ))
    }

    fn with_patterns(source: &'a str, patterns: Patterns) -> Self {
        Self {
            source,
            pos: 0,
            patterns,
            open_blocks: Vec::new(),
            after_partial_definition: false,
            pending: None,
            failed: false,
        }
    }

    /// The delimiters in effect at the current scan position.
    pub fn delimiters(&self) -> &Delimiters {
        &self.patterns.delimiters
    }

    /// Classifies a tag body by its sigil. Returns `None` for tags that
    /// produce nothing (comments, delimiter changes that fail to parse).
    fn classify(&mut self, body: &'a str, indent: &'a str, span: TagSpan) -> Option<Tag<'a>> {
        let Some(sigil) = body.chars().next() else {
            return Some(Tag::Variable {
                key: "",
                escape: true,
            });
        };
        let rest = body[sigil.len_utf8()..].trim();

        match sigil {
            '!' => None,
            '#' => Some(Tag::Section {
                key: rest,
                content_start: span.end,
                delimiters: self.patterns.delimiters.clone(),
            }),
            '^' => Some(Tag::InvertedSection {
                key: rest,
                content_start: span.end,
                delimiters: self.patterns.delimiters.clone(),
            }),
            '<' => Some(Tag::PartialDefinition { key: rest }),
            '>' => Some(Tag::Partial {
                key: rest,
                indent: if span.standalone { indent } else { "" },
            }),
            '/' => Some(Tag::EndBlock {
                key: rest,
                tag_start: span.start,
            }),
            '=' => self.change_delimiters(body),
            '&' => Some(Tag::Variable {
                key: rest,
                escape: false,
            }),
            _ => {
                let braced = self.patterns.delimiters.is_default()
                    && body.len() >= 2
                    && body.starts_with('{')
                    && body.ends_with('}')
                    && !body.contains('\n');
                if braced {
                    Some(Tag::Variable {
                        key: body[1..body.len() - 1].trim(),
                        escape: false,
                    })
                } else {
                    Some(Tag::Variable {
                        key: body.trim(),
                        escape: true,
                    })
                }
            }
        }
    }

    fn change_delimiters(&mut self, body: &str) -> Option<Tag<'a>> {
        let delimiters = Delimiters::from_change_tag(body)?;
        match Patterns::for_delimiters(delimiters.clone()) {
            Ok(patterns) => {
                self.patterns = patterns;
                Some(Tag::DelimiterChange(delimiters))
            }
            Err(err) => {
                tracing::warn!(?delimiters, %err, "ignoring unusable delimiter change");
                None
            }
        }
    }

    /// Tracks block nesting; returns `true` when `tag` closes a partial
    /// definition, in which case the default delimiters are restored.
    fn track_blocks(&mut self, tag: Option<&Tag<'a>>) -> bool {
        match tag {
            Some(Tag::Section { .. }) | Some(Tag::InvertedSection { .. }) => {
                self.open_blocks.push(OpenKind::Section);
            }
            Some(Tag::PartialDefinition { .. }) => {
                self.open_blocks.push(OpenKind::PartialDefinition);
            }
            Some(Tag::EndBlock { .. }) => {
                if self.open_blocks.pop() == Some(OpenKind::PartialDefinition) {
                    self.patterns = Patterns::default_pair();
                    return true;
                }
            }
            _ => {}
        }
        false
    }
}

/// Offsets of one tag: `start` is its open delimiter, `end` is just past
/// its close delimiter.
#[derive(Debug, Clone, Copy)]
struct TagSpan {
    start: usize,
    end: usize,
    standalone: bool,
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Tag<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(tag) = self.pending.take() {
            return Some(Ok(tag));
        }

        loop {
            if self.failed || self.pos >= self.source.len() {
                return None;
            }

            let text_start = self.pos;
            let Some(open) = self.patterns.open.captures_at(self.source, self.pos) else {
                self.pos = self.source.len();
                return Some(Ok(Tag::Text(&self.source[text_start..])));
            };

            // Groups 0, 2 and 3 always participate in a match.
            let (Some(whole), Some(indent), Some(open_delimiter)) =
                (open.get(0), open.get(2), open.get(3))
            else {
                return None;
            };
            let line_break = open.get(1);

            let Some(close) = self
                .patterns
                .close
                .captures_at(self.source, open_delimiter.end())
            else {
                self.failed = true;
                return Some(Err(ParseError::UnclosedTag {
                    offset: open_delimiter.start(),
                }));
            };
            let (Some(close_whole), Some(close_delimiter)) = (close.get(0), close.get(1)) else {
                return None;
            };
            let line_end = close.get(3);

            let body = &self.source[open_delimiter.end()..close_delimiter.start()];
            let at_line_start = self.after_partial_definition || line_break.is_some();
            let directly_after_previous = open_delimiter.start() == text_start;
            let mut standalone = (at_line_start || directly_after_previous) && line_end.is_some();

            let span = TagSpan {
                start: open_delimiter.start(),
                end: close_delimiter.end(),
                standalone,
            };
            let tag = self.classify(body, indent.as_str(), span);
            if matches!(tag, Some(Tag::Variable { .. })) {
                standalone = false;
            }

            let closed_definition = self.track_blocks(tag.as_ref());
            self.after_partial_definition = closed_definition;

            let text_end = if standalone {
                line_break.map_or(whole.start(), |m| m.end())
            } else {
                indent.end()
            };
            self.pos = if standalone || closed_definition {
                close_whole.end()
            } else {
                close_delimiter.end()
            };

            tracing::trace!(?tag, standalone, offset = span.start, "scanned tag");

            let text = &self.source[text_start..text_end];
            match (text.is_empty(), tag) {
                (false, Some(tag)) => {
                    self.pending = Some(tag);
                    return Some(Ok(Tag::Text(text)));
                }
                (false, None) => return Some(Ok(Tag::Text(text))),
                (true, Some(tag)) => return Some(Ok(tag)),
                (true, None) => continue,
            }
        }
    }
}
