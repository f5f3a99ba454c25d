//! Output values: strings annotated with `/* comments */`
//!
//! These are what node kinds produce when they are serialized. The encoder
//! walks them and decides quoting and layout.

use super::value::{Dictionary, Value};
use std::collections::BTreeMap;

/// Substrings that make Xcode quote an otherwise bare string
const QUOTE_TRIGGERS: [&str; 2] = ["___", "//"];

/// A string value with an optional trailing comment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommentedString {
    /// Raw (unescaped) string
    pub string: String,
    /// Comment written after the value, if any
    pub comment: Option<String>,
}

impl CommentedString {
    /// String without comment
    pub fn new(string: impl Into<String>) -> Self {
        Self {
            string: string.into(),
            comment: None,
        }
    }

    /// String followed by `/* comment */` when a comment is known
    pub fn with_comment(string: impl Into<String>, comment: Option<impl Into<String>>) -> Self {
        Self {
            string: string.into(),
            comment: comment.map(Into::into),
        }
    }

    /// The string as Xcode writes it: escaped and quoted when needed
    pub fn valid_string(&self) -> String {
        match self.string.as_str() {
            "" => return "\"\"".to_string(),
            "false" => return "NO".to_string(),
            "true" => return "YES".to_string(),
            _ => {}
        }

        let mut escaped = String::with_capacity(self.string.len());
        for c in self.string.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\t' => escaped.push_str("\\t"),
                '\n' => escaped.push_str("\\n"),
                other => escaped.push(other),
            }
        }

        let needs_quotes = escaped.chars().any(|c| !is_bare_char(c))
            || QUOTE_TRIGGERS.iter().any(|t| escaped.contains(t));
        if needs_quotes {
            format!("\"{escaped}\"")
        } else {
            escaped
        }
    }
}

/// Characters Xcode leaves unquoted: `_`, `$`, `.` through `9`, and ASCII letters
fn is_bare_char(c: char) -> bool {
    c == '_' || c == '$' || ('.'..='9').contains(&c) || c.is_ascii_alphabetic()
}

impl From<&str> for CommentedString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CommentedString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Dictionary of output values
pub type PlistDictionary = BTreeMap<CommentedString, PlistValue>;

/// Output value tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlistValue {
    String(CommentedString),
    Array(Vec<PlistValue>),
    Dictionary(PlistDictionary),
}

impl PlistValue {
    /// Plain string value without comment
    pub fn string(value: impl Into<String>) -> Self {
        PlistValue::String(CommentedString::new(value))
    }

    /// String value with an optional comment
    pub fn commented(value: impl Into<String>, comment: Option<impl Into<String>>) -> Self {
        PlistValue::String(CommentedString::with_comment(value, comment))
    }

    /// Array of plain strings
    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PlistValue::Array(values.into_iter().map(PlistValue::string).collect())
    }

    /// Dictionary content
    pub fn as_dictionary(&self) -> Option<&PlistDictionary> {
        match self {
            PlistValue::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

impl From<&Value> for PlistValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => PlistValue::string(s.clone()),
            Value::Integer(i) => PlistValue::string(i.to_string()),
            Value::Boolean(b) => PlistValue::string(if *b { "YES" } else { "NO" }),
            Value::Array(items) => PlistValue::Array(items.iter().map(PlistValue::from).collect()),
            Value::Dictionary(dict) => PlistValue::from(dict),
        }
    }
}

impl From<&Dictionary> for PlistValue {
    fn from(dict: &Dictionary) -> Self {
        PlistValue::Dictionary(
            dict.iter()
                .map(|(k, v)| (CommentedString::new(k.clone()), PlistValue::from(v)))
                .collect(),
        )
    }
}

/// Builder for the key/value fragment of a single node
#[derive(Debug, Default)]
pub(crate) struct Fragment {
    entries: PlistDictionary,
}

impl Fragment {
    pub(crate) fn new(isa: &str) -> Self {
        let mut fragment = Self::default();
        fragment.set("isa", PlistValue::string(isa));
        fragment
    }

    pub(crate) fn set(&mut self, key: &str, value: PlistValue) {
        self.entries.insert(CommentedString::new(key), value);
    }

    pub(crate) fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.set(key, PlistValue::string(value));
    }

    pub(crate) fn set_opt(&mut self, key: &str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.set(key, PlistValue::string(value.to_string()));
        }
    }

    pub(crate) fn set_flag(&mut self, key: &str, value: bool) {
        self.set_str(key, if value { "1" } else { "0" });
    }

    pub(crate) fn set_opt_flag(&mut self, key: &str, value: Option<bool>) {
        if let Some(value) = value {
            self.set_flag(key, value);
        }
    }

    pub(crate) fn into_value(self) -> PlistValue {
        PlistValue::Dictionary(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn render(s: &str) -> String {
        CommentedString::new(s).valid_string()
    }

    #[test]
    fn test_quoting_rules() {
        assert_eq!(render(""), "\"\"");
        assert_eq!(render("true"), "YES");
        assert_eq!(render("false"), "NO");
        assert_eq!(render("plain_id"), "plain_id");
        assert_eq!(render("has space"), "\"has space\"");
        assert_eq!(render("a/b"), "a/b");
        assert_eq!(render("x___y"), "\"x___y\"");
    }

    #[test]
    fn test_double_slash_forces_quotes() {
        assert_eq!(render("http://example.com"), "\"http://example.com\"");
        assert_eq!(render("$(SRCROOT)/x"), "\"$(SRCROOT)/x\"");
        assert_eq!(render("$SRCROOT/x.swift"), "$SRCROOT/x.swift");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(render("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(render("a\\b"), "\"a\\\\b\"");
        assert_eq!(render("line1\nline2"), "\"line1\\nline2\"");
        assert_eq!(render("a\tb"), "\"a\\tb\"");
    }

    #[test]
    fn test_non_ascii_is_quoted() {
        assert_eq!(render("Café.swift"), "\"Café.swift\"");
    }

    #[test]
    fn test_fragment_flags() {
        let mut fragment = Fragment::new("PBXGroup");
        fragment.set_flag("usesTabs", true);
        fragment.set_opt("tabWidth", None::<u32>);
        let value = fragment.into_value();
        let dict = value.as_dictionary().unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(
            dict.get(&CommentedString::new("usesTabs")),
            Some(&PlistValue::string("1"))
        );
    }

    proptest! {
        #[test]
        fn bare_identifiers_stay_bare(s in "[A-Za-z0-9]{1,12}") {
            prop_assume!(s != "true" && s != "false");
            prop_assert_eq!(render(&s), s);
        }

        #[test]
        fn strings_with_spaces_are_quoted(a in "[a-z]{1,6}", b in "[a-z]{1,6}") {
            let s = format!("{a} {b}");
            prop_assert_eq!(render(&s), format!("\"{s}\""));
        }
    }
}
