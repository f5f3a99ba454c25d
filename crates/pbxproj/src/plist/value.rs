//! Loosely-typed plist values as read from disk

use std::collections::BTreeMap;

/// Dictionary of plist values keyed by their plist key
pub type Dictionary = BTreeMap<String, Value>;

/// A value read from an ASCII, XML or binary property list.
///
/// The ASCII dialect Xcode writes only ever produces strings, arrays and
/// dictionaries; integers and booleans come from XML and binary plists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
    Array(Vec<Value>),
    Dictionary(Dictionary),
}

impl Value {
    /// String content, with integers rendered as decimal text
    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Boolean(b) => Some(if *b { "YES" } else { "NO" }.to_string()),
            Value::Array(_) | Value::Dictionary(_) => None,
        }
    }

    /// Borrowed string content, strings only
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content, accepting decimal strings
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(i) => u64::try_from(*i).ok(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Boolean(b) => Some(u64::from(*b)),
            Value::Array(_) | Value::Dictionary(_) => None,
        }
    }

    /// Boolean content, accepting `0`/`1` and `YES`/`NO` strings
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            Value::String(s) => match s.trim() {
                "1" | "YES" | "true" => Some(true),
                "0" | "NO" | "false" => Some(false),
                other => other.parse::<i64>().ok().map(|i| i != 0),
            },
            Value::Array(_) | Value::Dictionary(_) => None,
        }
    }

    /// Array content
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Dictionary content
    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Dictionary> for Value {
    fn from(value: Dictionary) -> Self {
        Value::Dictionary(value)
    }
}
