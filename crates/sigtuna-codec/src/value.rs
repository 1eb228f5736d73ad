#![forbid(unsafe_code)]

//! The nested value model the codec operates on.

use indexmap::IndexMap;

/// Map key holding the attribute map of the current element.
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Map key holding the text value of the current element.
pub const VALUE_KEY: &str = "@value";

/// A nested, insertion-ordered value.
///
/// Scalars are `Null`, `Bool`, and `String`. `Null`, `Bool(false)`, and the
/// empty list are skip sentinels: they produce no output when encoded, so
/// they do not survive a round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    String(String),
    Map(IndexMap<String, Value>),
    List(Vec<Value>),
}

impl Value {
    /// Build a map value from `(key, value)` pairs, preserving order.
    pub fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v))
                .collect(),
        )
    }

    /// Build a list value.
    pub fn list<const N: usize>(items: [Value; N]) -> Value {
        Value::List(items.into())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Null | Value::Bool(_) | Value::String(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
