//! XML and binary property lists
//!
//! Both dialects are read with the `plist` crate and converted into the
//! loosely-typed [`Value`] tree the decoder works on.

use super::value::{Dictionary, Value};
use crate::error::Result;
use std::io::Cursor;

/// Parse an XML or binary property list document
pub fn parse(bytes: &[u8]) -> Result<Value> {
    let value = ::plist::Value::from_reader(Cursor::new(bytes))?;
    Ok(convert(value))
}

fn convert(value: ::plist::Value) -> Value {
    match value {
        ::plist::Value::String(s) => Value::String(s),
        ::plist::Value::Boolean(b) => Value::Boolean(b),
        ::plist::Value::Integer(i) => match i.as_signed() {
            Some(n) => Value::Integer(n),
            None => Value::String(i.to_string()),
        },
        ::plist::Value::Real(r) => Value::String(r.to_string()),
        ::plist::Value::Array(items) => Value::Array(items.into_iter().map(convert).collect()),
        ::plist::Value::Dictionary(dict) => Value::Dictionary(
            dict.into_iter()
                .map(|(key, value)| (key, convert(value)))
                .collect::<Dictionary>(),
        ),
        ::plist::Value::Data(bytes) => {
            Value::String(bytes.iter().map(|b| format!("{b:02x}")).collect())
        }
        ::plist::Value::Date(date) => Value::String(date.to_xml_format()),
        ::plist::Value::Uid(uid) => Value::String(uid.get().to_string()),
        _ => Value::String(String::new()),
    }
}
