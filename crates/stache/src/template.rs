//! Compiled templates.

use std::collections::HashMap;

use serde::Serialize;
use stache_parser::{parse, parse_with_delimiters, Delimiters, Document};

use crate::error::Result;
use crate::options::RenderOptions;
use crate::render::{render, Partials};
use crate::value::Value;

/// A compiled template.
///
/// Compiling is done once; the template is then rendered any number of
/// times. Rendering never mutates the template, so partials passed to one
/// render call are not seen by the next.
///
/// # Example
///
/// ```rust
/// use stache::{Template, Value};
///
/// let template = Template::compile("Hello {{name}}!").unwrap();
/// let data = Value::default().with("name", "World");
/// assert_eq!(template.render(&data).unwrap(), "Hello World!");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    document: Document,
    options: RenderOptions,
}

impl Template {
    /// Compiles template text using the default `{{`/`}}` delimiters.
    pub fn compile(source: &str) -> Result<Self> {
        Ok(Self::from_document(parse(source)?))
    }

    /// Compiles template text that starts out with `delimiters` active.
    pub fn compile_with_delimiters(source: &str, delimiters: Delimiters) -> Result<Self> {
        Ok(Self::from_document(parse_with_delimiters(source, delimiters)?))
    }

    fn from_document(document: Document) -> Self {
        tracing::debug!(
            nodes = document.root.children.len(),
            partials = document.partials.len(),
            "compiled template"
        );
        Self {
            document,
            options: RenderOptions::default(),
        }
    }

    /// Sets the render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// The render options in effect.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The compiled tree.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Renders the template against `data`.
    pub fn render(&self, data: &Value) -> Result<String> {
        self.render_with_partials(data, &HashMap::new())
    }

    /// Renders the template with extra partials, given as template text.
    ///
    /// Each supplied partial is compiled for this call only and shadows an
    /// inline definition with the same name.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use stache::{Template, Value};
    ///
    /// let template = Template::compile("{{<p}}inline{{/p}}[{{>p}}]").unwrap();
    /// let overrides = HashMap::from([("p".to_string(), "given".to_string())]);
    ///
    /// assert_eq!(template.render_with_partials(&Value::Null, &overrides).unwrap(), "[given]");
    /// assert_eq!(template.render(&Value::Null).unwrap(), "[inline]");
    /// ```
    pub fn render_with_partials(
        &self,
        data: &Value,
        partials: &HashMap<String, String>,
    ) -> Result<String> {
        tracing::debug!(overrides = partials.len(), "rendering template");

        let supplied = partials
            .iter()
            .map(|(key, source)| Ok((key.as_str(), parse(source)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut effective: Partials<'_> = self
            .document
            .partials
            .iter()
            .map(|(key, block)| (key.as_str(), block.children.as_slice()))
            .collect();
        for (key, document) in &supplied {
            effective.insert(*key, document.root.children.as_slice());
        }

        render(
            &self.document.root.children,
            &effective,
            &self.options,
            data.clone(),
        )
    }

    /// Renders the template against any serializable data.
    pub fn render_data<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        self.render(&Value::from_serialize(data)?)
    }
}
