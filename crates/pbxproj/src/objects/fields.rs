//! Typed access to the attribute dictionary of a single object

use super::Number;
use crate::error::{ProjError, Result};
use crate::plist::{Dictionary, Value};
use crate::reference::Reference;

/// Attribute reader bound to one object's dictionary.
///
/// Missing optional attributes read as `None`; attributes that are present
/// but malformed are reported as [`ProjError::InvalidValue`].
pub(crate) struct Fields<'a> {
    isa: &'static str,
    dict: &'a Dictionary,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(isa: &'static str, dict: &'a Dictionary) -> Self {
        Self { isa, dict }
    }

    fn invalid(&self, key: &str, expected: &'static str) -> ProjError {
        ProjError::InvalidValue {
            field: format!("{}.{}", self.isa, key),
            expected,
        }
    }

    fn missing(&self, key: &'static str) -> ProjError {
        ProjError::MissingField {
            isa: self.isa.to_string(),
            field: key,
        }
    }

    pub(crate) fn string(&self, key: &str) -> Result<Option<String>> {
        match self.dict.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_string()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "a string")),
        }
    }

    pub(crate) fn required_string(&self, key: &'static str) -> Result<String> {
        self.string(key)?.ok_or_else(|| self.missing(key))
    }

    pub(crate) fn string_or_default(&self, key: &str) -> Result<String> {
        Ok(self.string(key)?.unwrap_or_default())
    }

    pub(crate) fn reference(&self, key: &str) -> Result<Option<Reference>> {
        Ok(self.string(key)?.map(Reference::from))
    }

    pub(crate) fn required_reference(&self, key: &'static str) -> Result<Reference> {
        self.reference(key)?.ok_or_else(|| self.missing(key))
    }

    pub(crate) fn strings(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.dict.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_string().ok_or_else(|| self.invalid(key, "an array of strings")))
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(_) => Err(self.invalid(key, "an array")),
        }
    }

    pub(crate) fn strings_or_empty(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.strings(key)?.unwrap_or_default())
    }

    pub(crate) fn references(&self, key: &str) -> Result<Vec<Reference>> {
        Ok(self
            .strings_or_empty(key)?
            .into_iter()
            .map(Reference::from)
            .collect())
    }

    /// Integer-like attribute, kept as written. Text that does not parse is
    /// still accepted; only arrays and dictionaries are rejected.
    pub(crate) fn number(&self, key: &str) -> Result<Option<Number>> {
        match self.dict.get(key) {
            None => Ok(None),
            Some(Value::Boolean(b)) => Ok(Some(Number::from(u32::from(*b)))),
            Some(value) => value
                .as_string()
                .map(|text| Some(Number::new(text)))
                .ok_or_else(|| self.invalid(key, "an integer")),
        }
    }

    pub(crate) fn flag(&self, key: &str) -> Result<Option<bool>> {
        match self.dict.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "0 or 1")),
        }
    }

    pub(crate) fn dictionary(&self, key: &str) -> Result<Option<Dictionary>> {
        match self.dict.get(key) {
            None => Ok(None),
            Some(Value::Dictionary(dict)) => Ok(Some(dict.clone())),
            Some(_) => Err(self.invalid(key, "a dictionary")),
        }
    }

    pub(crate) fn dictionaries(&self, key: &str) -> Result<Vec<Dictionary>> {
        match self.dict.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_dictionary()
                        .cloned()
                        .ok_or_else(|| self.invalid(key, "an array of dictionaries"))
                })
                .collect(),
            Some(_) => Err(self.invalid(key, "an array")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(entries: &[(&str, Value)]) -> Dictionary {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_numbers_are_parsed_permissively() {
        let d = dict(&[
            ("a", Value::from(" 42 ")),
            ("b", Value::Integer(7)),
            ("c", Value::from("x")),
            ("d", Value::Array(vec![])),
        ]);
        let fields = Fields::new("PBXGroup", &d);
        let a = fields.number("a").unwrap().unwrap();
        assert_eq!(a.value(), Some(42));
        assert_eq!(a.as_str(), " 42 ");
        assert_eq!(fields.number("b").unwrap(), Some(Number::from(7)));
        assert_eq!(fields.number("missing").unwrap(), None);
        assert_eq!(fields.number("c").unwrap().unwrap().value(), None);
        let err = fields.number("d").unwrap_err();
        assert!(err.to_string().contains("PBXGroup.d"));
    }

    #[test]
    fn test_missing_required_field() {
        let d = Dictionary::new();
        let fields = Fields::new("XCBuildConfiguration", &d);
        match fields.required_string("name").unwrap_err() {
            ProjError::MissingField { isa, field } => {
                assert_eq!(isa, "XCBuildConfiguration");
                assert_eq!(field, "name");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_reference_lists_default_to_empty() {
        let d = dict(&[(
            "files",
            Value::Array(vec![Value::from("A"), Value::from("B")]),
        )]);
        let fields = Fields::new("PBXSourcesBuildPhase", &d);
        assert_eq!(
            fields.references("files").unwrap(),
            vec![Reference::from("A"), Reference::from("B")]
        );
        assert!(fields.references("children").unwrap().is_empty());
    }
}
