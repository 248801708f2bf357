//! Delimiter pairs and the matchers derived from them.
//!
//! The active pair is an immutable value: a `{{=<% %>=}}` tag swaps in a new
//! [`Delimiters`] (and freshly compiled [`Patterns`]) instead of mutating the
//! current one. Sections record the pair that was active when they opened so
//! that lambda output can later be re-parsed under the same pair.

use once_cell::sync::Lazy;
use regex::Regex;

/// The default open delimiter.
pub const DEFAULT_OPEN: &str = "{{";

/// The default close delimiter.
pub const DEFAULT_CLOSE: &str = "}}";

static DEFAULT_PATTERNS: Lazy<Patterns> = Lazy::new(|| {
    Patterns::new(Delimiters::default()).expect("default delimiter patterns are valid")
});

/// Body of a `{{=OPEN CLOSE=}}` tag.
static DELIMITER_CHANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^=[\t ]*(\S+)[\t ]+(\S+)[\t ]*=$").expect("delimiter change pattern is valid")
});

/// An open/close delimiter pair, `{{`/`}}` by default.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiters {
    open: String,
    close: String,
}

impl Delimiters {
    /// Creates a delimiter pair.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// The open delimiter.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// The close delimiter.
    pub fn close(&self) -> &str {
        &self.close
    }

    /// Returns `true` for the `{{`/`}}` pair.
    ///
    /// Triple-mustache tags (`{{{name}}}`) are only recognized under this pair.
    pub fn is_default(&self) -> bool {
        self.open == DEFAULT_OPEN && self.close == DEFAULT_CLOSE
    }

    /// Parses the body of a delimiter change tag, e.g. `=<% %>=`.
    ///
    /// Returns `None` when either delimiter is missing.
    pub fn from_change_tag(body: &str) -> Option<Self> {
        let captures = DELIMITER_CHANGE.captures(body)?;
        Some(Self::new(captures.get(1)?.as_str(), captures.get(2)?.as_str()))
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new(DEFAULT_OPEN, DEFAULT_CLOSE)
    }
}

/// Tag matchers for one delimiter pair.
///
/// `open` captures: (1) an optional line start or newline, (2) horizontal
/// whitespace before the tag, (3) the open delimiter.
///
/// `close` captures: (1) the close delimiter, (2) trailing horizontal
/// whitespace plus line end, (3) the line end itself (newline or end of input).
#[derive(Debug, Clone)]
pub(crate) struct Patterns {
    pub(crate) delimiters: Delimiters,
    pub(crate) open: Regex,
    pub(crate) close: Regex,
}

impl Patterns {
    pub(crate) fn new(delimiters: Delimiters) -> Result<Self, regex::Error> {
        let open = Regex::new(&format!(
            r"(^|\r?\n)?([\t\x0B\x0C ]*)({})",
            regex::escape(delimiters.open())
        ))?;
        // Extra braces before the default closer belong to `{{{name}}}`.
        let close = if delimiters.close() == DEFAULT_CLOSE {
            Regex::new(r"\}*(\}\})([\t\x0B\x0C ]*(\r?\n|$))?")?
        } else {
            Regex::new(&format!(
                r"({})([\t\x0B\x0C ]*(\r?\n|$))?",
                regex::escape(delimiters.close())
            ))?
        };

        Ok(Self {
            delimiters,
            open,
            close,
        })
    }

    /// Matchers for the default pair, compiled once.
    pub(crate) fn default_pair() -> Self {
        DEFAULT_PATTERNS.clone()
    }

    pub(crate) fn for_delimiters(delimiters: Delimiters) -> Result<Self, regex::Error> {
        if delimiters.is_default() {
            Ok(Self::default_pair())
        } else {
            Self::new(delimiters)
        }
    }
}
