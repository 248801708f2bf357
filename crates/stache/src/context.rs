//! The context stack and dotted-path resolution.
//!
//! Sections push the value they iterate over; lookups start at the innermost
//! frame. Only the first segment of a dotted path falls back to enclosing
//! frames: once `a` is found in `{{a.b.c}}`, `b` and `c` must be members of
//! what was found.

use crate::value::Value;

/// Outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolved {
    /// A plain value.
    Value(Value),
    /// Text returned by a lambda, still to be rendered as a template.
    ///
    /// `scope` holds the values the path passed through before reaching the
    /// lambda (`a` for `{{a.lambda}}`); they are pushed on top of the stack
    /// while the text is rendered.
    Template { text: String, scope: Vec<Value> },
}

/// Chain of nested data scopes, outermost first.
#[derive(Debug, Clone)]
pub(crate) struct ContextStack {
    frames: Vec<Value>,
}

impl ContextStack {
    pub(crate) fn new(root: Value) -> Self {
        Self { frames: vec![root] }
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.frames.push(value);
    }

    pub(crate) fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub(crate) fn current(&self) -> &Value {
        // The root frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    /// A copy of this stack with `scope` pushed on top.
    pub(crate) fn extended(&self, scope: Vec<Value>) -> Self {
        let mut frames = self.frames.clone();
        frames.extend(scope);
        Self { frames }
    }

    /// Resolves a dotted `path`.
    ///
    /// Lambdas met along the way are called with `raw`. A void lambda counts
    /// as a missing key. Returns `None` when the path resolves nowhere.
    pub(crate) fn resolve(&self, path: &str, raw: &str) -> Option<Resolved> {
        if path == "." {
            return finish(evaluate(self.current().clone(), raw)?, Vec::new());
        }

        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut found = self
            .frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(first).and_then(|value| evaluate(value, raw)))?;

        let mut scope = Vec::new();
        for segment in segments {
            let next = found.value.get(segment).and_then(|value| evaluate(value, raw))?;
            scope.push(std::mem::replace(&mut found, next).value);
        }

        finish(found, scope)
    }
}

/// A looked-up value, with whether it came out of a lambda.
struct Found {
    value: Value,
    from_lambda: bool,
}

fn evaluate(value: Value, raw: &str) -> Option<Found> {
    match value {
        Value::Lambda(lambda) => lambda.call(raw).map(|value| Found {
            value,
            from_lambda: true,
        }),
        value => Some(Found {
            value,
            from_lambda: false,
        }),
    }
}

fn finish(found: Found, scope: Vec<Value>) -> Option<Resolved> {
    Some(match found {
        Found {
            value: Value::String(text),
            from_lambda: true,
        } => Resolved::Template { text, scope },
        Found { value, .. } => Resolved::Value(value),
    })
}

/// Number of passes a section makes over a resolved value, and the context
/// of each.
#[derive(Debug, PartialEq)]
pub(crate) enum Passes {
    /// No pass: false, null or an empty list.
    Skip,
    /// One pass with the context unchanged: `true`.
    Once,
    /// One pass per value, each pushed as the context.
    Each(Vec<Value>),
}

impl Passes {
    pub(crate) fn of(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Passes::Skip,
            Value::Bool(true) => Passes::Once,
            Value::List(items) if items.is_empty() => Passes::Skip,
            Value::List(items) => Passes::Each(items),
            value => Passes::Each(vec![value]),
        }
    }

    pub(crate) fn is_skip(&self) -> bool {
        matches!(self, Passes::Skip)
    }
}
