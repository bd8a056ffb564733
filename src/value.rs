use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A key/value pair attached to a record or accumulated on a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Attr {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Closed set of attribute value kinds. Everything the formatter can emit is
/// one of these variants; there is no "unsupported kind" escape hatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    /// Nested attribute group. Renders its children, never itself.
    Group(Vec<Attr>),
    /// Opaque payload resolved at construction time, see [`AnyValue`].
    Any(AnyValue),
}

/// What an "any" payload turned out to be once inspected.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    /// An error object, reduced to its message text.
    Error(String),
    /// Free-form text. Emitted as-is: well-formed JSON passes through raw
    /// and plain strings print verbatim, neither is ever re-quoted.
    Text(String),
    /// Structured data, rendered as indented JSON.
    Json(serde_json::Value),
}

impl Value {
    pub fn group(attrs: impl IntoIterator<Item = Attr>) -> Self {
        Value::Group(attrs.into_iter().collect())
    }

    /// Capture an error as an attribute value. Only the message survives.
    pub fn error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Value::Any(AnyValue::Error(err.to_string()))
    }

    /// Capture arbitrary structured data. Strings stay text, everything else
    /// becomes JSON; when serialization fails the `Debug` rendering stands in
    /// so the payload always formats to something.
    pub fn any<T>(value: &T) -> Self
    where
        T: Serialize + fmt::Debug,
    {
        match serde_json::to_value(value) {
            Ok(serde_json::Value::String(text)) => Value::Any(AnyValue::Text(text)),
            Ok(json) => Value::Any(AnyValue::Json(json)),
            Err(_) => Value::Any(AnyValue::Text(format!("{value:?}"))),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}
