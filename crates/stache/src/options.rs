//! Render configuration.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// How escaped interpolations (`{{name}}`) are treated.
///
/// Unescaped forms (`{{{name}}}`, `{{&name}}`) are never escaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Escape {
    /// Replace `& < > " '` with HTML entities.
    #[default]
    Html,
    /// Emit values verbatim.
    None,
}

impl Escape {
    /// Escapes `text` according to this mode.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            Escape::Html => escape_html(text),
            Escape::None => Cow::Borrowed(text),
        }
    }
}

/// Options applied to every render of a [`Template`](crate::Template).
///
/// Deserializes from partial input; missing fields take their defaults.
///
/// ```rust
/// use stache::{Escape, RenderOptions};
///
/// let options: RenderOptions = serde_json::from_str(r#"{"escape": "none"}"#).unwrap();
/// assert_eq!(options.escape, Escape::None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub escape: Escape,
}

impl RenderOptions {
    /// Sets the escaping mode.
    pub fn escape(mut self, escape: Escape) -> Self {
        self.escape = escape;
        self
    }
}

/// HTML-escapes `& < > " '`. Borrows when nothing needs replacing.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find(['&', '<', '>', '"', '\'']) else {
        return Cow::Borrowed(text);
    };

    let mut escaped = String::with_capacity(text.len() + 16);
    escaped.push_str(&text[..first]);
    for ch in text[first..].chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}
