use std::fmt;

/// Integer-like attribute that keeps the text it was read from.
///
/// Xcode writes these as plain decimals, but hand-edited projects carry
/// leading zeros, padding or even empty strings. The text is written back
/// untouched; [`Number::value`] gives the numeric reading when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Text as read, or as formatted for values built in code
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric reading, ignoring surrounding whitespace
    pub fn value(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::from(0)
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<u32> for Number {
    fn eq(&self, other: &u32) -> bool {
        self.value() == Some(u64::from(*other))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_kept() {
        let padded = Number::new(" 2");
        assert_eq!(padded.to_string(), " 2");
        assert_eq!(padded.value(), Some(2));
        assert_eq!(Number::new("04").to_string(), "04");
        assert_eq!(Number::new("04"), 4);
    }

    #[test]
    fn test_non_numeric_text_has_no_value() {
        assert_eq!(Number::new("").value(), None);
        assert_eq!(Number::new("four").value(), None);
        assert_eq!(Number::from(46).as_str(), "46");
        assert_eq!(Number::default().as_str(), "0");
    }
}
