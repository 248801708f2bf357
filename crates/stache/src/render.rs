//! The render walker.
//!
//! A [`Walker`] visits the compiled tree depth-first, writing into one output
//! buffer. Per-render state lives here and nowhere else: the context stack,
//! the current partial indentation, the effective partial registry and the
//! cache of templates compiled from lambda output.
//!
//! Inside an indented partial, every text run gets the indent after each
//! inner line break and in front of the run itself (unless the run opens with
//! a line break). Every interpolated value gets the indent in front of it.
//! Text returned by a section lambda is written as it is.

use std::collections::HashMap;
use std::rc::Rc;

use stache_parser::{
    parse_with_delimiters, Delimiters, Document, Node, Partial, Section, Variable,
};

use crate::context::{ContextStack, Passes, Resolved};
use crate::error::Result;
use crate::options::RenderOptions;
use crate::value::Value;

/// Partial name to the nodes it renders.
pub(crate) type Partials<'t> = HashMap<&'t str, &'t [Node]>;

/// Templates compiled from lambda output during one render call.
type LambdaCache = HashMap<(String, Delimiters), Rc<Document>>;

/// Renders `nodes` against `data`.
pub(crate) fn render(
    nodes: &[Node],
    partials: &Partials<'_>,
    options: &RenderOptions,
    data: Value,
) -> Result<String> {
    let mut cache = LambdaCache::new();
    let mut walker = Walker::new(partials, &mut cache, options, ContextStack::new(data));
    walker.walk(nodes)?;
    Ok(walker.out)
}

struct Walker<'r, 't> {
    partials: &'r Partials<'t>,
    cache: &'r mut LambdaCache,
    options: &'r RenderOptions,
    stack: ContextStack,
    /// Prefix applied while inside indented partials.
    indent: String,
    out: String,
}

impl<'r, 't> Walker<'r, 't> {
    fn new(
        partials: &'r Partials<'t>,
        cache: &'r mut LambdaCache,
        options: &'r RenderOptions,
        stack: ContextStack,
    ) -> Self {
        Self {
            partials,
            cache,
            options,
            stack,
            indent: String::new(),
            out: String::new(),
        }
    }

    fn walk(&mut self, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            self.visit(node)?;
        }
        Ok(())
    }

    fn visit(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Text(text) => {
                self.write_text(text);
                Ok(())
            }
            Node::Variable(variable) => self.variable(variable),
            Node::Section(section) => self.section(section),
            Node::InvertedSection(section) => self.inverted(section),
            Node::Partial(partial) => self.partial(partial),
        }
    }

    fn variable(&mut self, variable: &Variable) -> Result<()> {
        let text = match self.stack.resolve(&variable.key, "") {
            None | Some(Resolved::Value(Value::Null)) => return Ok(()),
            Some(Resolved::Value(value)) => value.to_text(),
            Some(Resolved::Template { text, scope }) => {
                self.expand(&text, &Delimiters::default(), scope)?
            }
        };

        if variable.escape {
            let escaped = self.options.escape.apply(&text);
            self.write_value(&escaped);
        } else {
            self.write_value(&text);
        }
        Ok(())
    }

    fn section(&mut self, section: &Section) -> Result<()> {
        let value = match self.stack.resolve(&section.key, &section.raw_text) {
            None => return Ok(()),
            Some(Resolved::Value(value)) => value,
            Some(Resolved::Template { text, scope }) => {
                let rendered = self.expand(&text, &section.delimiters, scope)?;
                self.out.push_str(&rendered);
                return Ok(());
            }
        };

        match Passes::of(value) {
            Passes::Skip => Ok(()),
            Passes::Once => self.walk(&section.children),
            Passes::Each(items) => {
                for item in items {
                    self.stack.push(item);
                    let result = self.walk(&section.children);
                    self.stack.pop();
                    result?;
                }
                Ok(())
            }
        }
    }

    fn inverted(&mut self, section: &Section) -> Result<()> {
        let empty = match self.stack.resolve(&section.key, &section.raw_text) {
            None => true,
            Some(Resolved::Value(value)) => Passes::of(value).is_skip(),
            Some(Resolved::Template { .. }) => false,
        };
        if empty {
            self.walk(&section.children)?;
        }
        Ok(())
    }

    fn partial(&mut self, partial: &Partial) -> Result<()> {
        let partials = self.partials;
        let Some(nodes) = partials.get(partial.key.as_str()).copied() else {
            tracing::trace!(key = %partial.key, "partial not found");
            return Ok(());
        };

        let depth = self.indent.len();
        self.indent.push_str(&partial.indent);
        let result = self.walk(nodes);
        self.indent.truncate(depth);
        result
    }

    /// Compiles `text` under `delimiters` and renders it against the current
    /// stack extended with `scope`.
    fn expand(
        &mut self,
        text: &str,
        delimiters: &Delimiters,
        scope: Vec<Value>,
    ) -> Result<String> {
        let document = self.compile_lambda(text, delimiters)?;
        let stack = self.stack.extended(scope);
        let mut nested = Walker::new(self.partials, &mut *self.cache, self.options, stack);
        nested.walk(&document.root.children)?;
        Ok(nested.out)
    }

    fn compile_lambda(&mut self, text: &str, delimiters: &Delimiters) -> Result<Rc<Document>> {
        let key = (text.to_string(), delimiters.clone());
        if let Some(document) = self.cache.get(&key) {
            tracing::trace!(len = text.len(), "lambda template cache hit");
            return Ok(Rc::clone(document));
        }

        tracing::debug!(len = text.len(), ?delimiters, "compiling lambda output");
        let document = Rc::new(parse_with_delimiters(text, delimiters.clone())?);
        self.cache.insert(key, Rc::clone(&document));
        Ok(document)
    }

    /// Writes template text with the partial indent applied.
    fn write_text(&mut self, text: &str) {
        if self.indent.is_empty() {
            self.out.push_str(text);
            return;
        }
        if !starts_with_line_break(text) {
            self.out.push_str(&self.indent);
        }
        for (at, ch) in text.char_indices() {
            self.out.push(ch);
            if ch == '\n' && !at_text_end(text, at + 1) {
                self.out.push_str(&self.indent);
            }
        }
    }

    /// Writes an interpolated value behind the partial indent. Line breaks
    /// inside the value are kept as they are.
    fn write_value(&mut self, text: &str) {
        self.out.push_str(&self.indent);
        self.out.push_str(text);
    }
}

fn starts_with_line_break(text: &str) -> bool {
    text.starts_with('\n') || text.starts_with("\r\n")
}

/// Whether `at` is the end of `text`, or sits just before a final `\n`.
/// No indent is added after a line break at either position.
fn at_text_end(text: &str, at: usize) -> bool {
    at == text.len() || (at + 1 == text.len() && text.ends_with('\n'))
}
