//! Mustache-style templates.
//!
//! A template is compiled once into a [`Template`] and rendered against a
//! [`Value`] any number of times. Values are JSON-like trees that may also
//! hold user records (via [`Resolve`]) and [`Lambda`]s.
//!
//! # Quick Start
//!
//! ```rust
//! use stache::{Template, Value};
//!
//! let template = Template::compile("{{#items}}- {{name}}\n{{/items}}").unwrap();
//! let data = Value::from(serde_json::json!({
//!     "items": [{"name": "one"}, {"name": "two"}]
//! }));
//! assert_eq!(template.render(&data).unwrap(), "- one\n- two\n");
//! ```
//!
//! # Sections
//!
//! `{{#key}}...{{/key}}` renders its content:
//!
//! - not at all for `false`, null, missing keys and empty lists
//! - once, with the context unchanged, for `true`
//! - once per element for a list, with the element as the context
//! - once, with the value as the context, for anything else
//!
//! `{{^key}}...{{/key}}` renders its content exactly when the section would
//! not.
//!
//! # Partials
//!
//! Partials come from inline definitions (`{{<name}}...{{/name}}`) or from
//! the caller via [`Template::render_with_partials`]. A partial reference
//! that stands alone on its line indents every line of the partial by the
//! reference's indentation.
//!
//! # Lambdas
//!
//! A [`Lambda`] is called with the raw text of the section it is used in.
//! If it returns text, that text is compiled and rendered in the current
//! context:
//!
//! ```rust
//! use stache::{Lambda, Template, Value};
//!
//! let data = Value::default()
//!     .with("name", "Sam")
//!     .with("greet", Lambda::new(|_| "Hi {{name}}"));
//! let out = Template::compile("{{greet}}").unwrap().render(&data).unwrap();
//! assert_eq!(out, "Hi Sam");
//! ```

mod context;
mod error;
mod options;
mod render;
mod template;
mod value;

pub use error::{Error, Result};
pub use options::{escape_html, Escape, RenderOptions};
pub use template::Template;
pub use value::{Lambda, Number, Resolve, Value};

pub use stache_parser::{Delimiters, ParseError};

/// Compiles template text. Shorthand for [`Template::compile`].
pub fn compile(source: &str) -> Result<Template> {
    Template::compile(source)
}

/// Compiles `source` and renders it once against `data`.
pub fn render(source: &str, data: &Value) -> Result<String> {
    Template::compile(source)?.render(data)
}
