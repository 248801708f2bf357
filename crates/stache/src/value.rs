//! Render-time data model.
//!
//! Templates render against a [`Value`]: a JSON-like tree that can also hold
//! user-defined records (through the [`Resolve`] trait) and lambdas.
//!
//! Most callers build values from serde data:
//!
//! ```rust
//! use stache::Value;
//!
//! let value = Value::from(serde_json::json!({"name": "Sam", "tags": ["a", "b"]}));
//! assert_eq!(value.get("name"), Some(Value::from("Sam")));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

pub use serde_json::Number;

/// Member lookup for user-defined records.
///
/// Implement this for types that should be addressable from templates
/// without going through serde. The `match` order of an implementation
/// decides which member wins when several share a name.
///
/// ```rust
/// use std::rc::Rc;
/// use stache::{Resolve, Value};
///
/// struct Person {
///     first: String,
///     last: String,
/// }
///
/// impl Resolve for Person {
///     fn resolve(&self, key: &str) -> Option<Value> {
///         match key {
///             "first" => Some(self.first.as_str().into()),
///             "last" => Some(self.last.as_str().into()),
///             "full_name" => Some(format!("{} {}", self.first, self.last).into()),
///             _ => None,
///         }
///     }
/// }
///
/// let person = Value::Object(Rc::new(Person { first: "Ada".into(), last: "Lovelace".into() }));
/// assert_eq!(person.get("full_name"), Some(Value::from("Ada Lovelace")));
/// assert_eq!(person.get("age"), None);
/// ```
pub trait Resolve {
    /// Returns the member named `key`, or `None` if the record has no such
    /// member. Returning `Some(Value::Null)` means "present but empty" and
    /// stops lookup from falling back to enclosing contexts.
    fn resolve(&self, key: &str) -> Option<Value>;

    /// Text used when the record itself is interpolated.
    fn to_text(&self) -> String {
        String::new()
    }
}

type LambdaFn = dyn Fn(&str) -> Option<Value>;

/// A callable bound as a data value.
///
/// A lambda receives the raw, unrendered text of the section it is used in
/// (empty for interpolations). A text result is compiled and rendered as a
/// template; any other result is used as the value itself.
#[derive(Clone)]
pub struct Lambda(Rc<LambdaFn>);

impl Lambda {
    /// Wraps a callable that produces a value.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&str) -> R + 'static,
        R: Into<Value>,
    {
        Self(Rc::new(move |raw| Some(f(raw).into())))
    }

    /// Wraps a callable that produces nothing.
    ///
    /// Looking up a void lambda behaves like looking up a missing key, so
    /// the lookup falls back to enclosing contexts. Map entries and record
    /// members are treated alike here: a lambda that yields nothing is
    /// unresolved wherever it is bound, rather than a present null.
    pub fn void<F>(f: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        Self(Rc::new(move |raw| {
            f(raw);
            None
        }))
    }

    /// Invokes the lambda; `None` for void lambdas.
    pub fn call(&self, raw: &str) -> Option<Value> {
        (self.0)(raw)
    }
}

impl fmt::Debug for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Lambda(..)")
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// A data value addressable from a template.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// A user-defined record.
    Object(Rc<dyn Resolve>),
    Lambda(Lambda),
}

impl Value {
    /// Converts any serializable data into a value.
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(data).map(Value::from)
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Looks up a member: a map entry or a record member.
    ///
    /// Every other kind of value has no members.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Map(map) => map.get(key).cloned(),
            Value::Object(object) => object.resolve(key),
            _ => None,
        }
    }

    /// Adds an entry, turning the value into a map first if it is not one.
    ///
    /// ```rust
    /// use stache::Value;
    ///
    /// let data = Value::default().with("name", "Sam").with("count", 3);
    /// assert_eq!(data.get("count"), Some(Value::from(3)));
    /// ```
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = match self {
            Value::Map(map) => map,
            _ => BTreeMap::new(),
        };
        map.insert(key.into(), value.into());
        Value::Map(map)
    }

    /// JSON form of the value. Records become their text, lambdas become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Lambda(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Object(object) => serde_json::Value::String(object.to_text()),
        }
    }

    /// Text written for the value by an interpolation tag.
    ///
    /// Null and lambdas are empty; numbers use their shortest round-trip
    /// form; lists and maps are compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null | Value::Lambda(_) => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::List(_) | Value::Map(_) => self.to_json().to_string(),
            Value::Object(object) => object.to_text(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Object(_) => f.write_str("Object(..)"),
            Value::Lambda(lambda) => fmt::Debug::fmt(lambda, f),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Lambda(a), Value::Lambda(b)) => a == b,
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Value {
    /// Non-finite floats have no JSON number form and become [`Value::Null`].
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::from(f64::from(n))
    }
}

impl From<Lambda> for Value {
    fn from(lambda: Lambda) -> Self {
        Value::Lambda(lambda)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Self {
        map.into_iter().collect()
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
