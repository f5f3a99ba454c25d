//! Property list values and readers
//!
//! `.pbxproj` files are OpenStep-style ASCII property lists. Projects that
//! went through `plutil` may be XML or binary plists; all three are accepted.

mod apple;
pub mod ascii;
mod commented;
mod value;

pub use commented::{CommentedString, PlistDictionary, PlistValue};
pub(crate) use commented::Fragment;
pub use value::{Dictionary, Value};

use crate::error::{ProjError, Result};

/// Serialization dialect of a property list document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ascii,
    Xml,
    Binary,
}

impl Format {
    /// Sniff the dialect from the first meaningful bytes
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"bplist") {
            return Format::Binary;
        }
        let text = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
        let head = text.trim_start_matches('\u{feff}').trim_start();
        if head.starts_with("<?xml") || head.starts_with("<!DOCTYPE") || head.starts_with("<plist") {
            Format::Xml
        } else {
            Format::Ascii
        }
    }
}

/// Read a property list document of any supported dialect
pub fn read(bytes: &[u8]) -> Result<Value> {
    match Format::detect(bytes) {
        Format::Binary | Format::Xml => apple::parse(bytes),
        Format::Ascii => ascii::parse(&decode_utf8(bytes)?),
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ProjError::UnsupportedFormat(format!("document is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(Format::detect(b"// !$*UTF8*$!\n{}"), Format::Ascii);
        assert_eq!(Format::detect(b"<?xml version=\"1.0\"?>"), Format::Xml);
        assert_eq!(Format::detect(b"  <plist version=\"1.0\">"), Format::Xml);
        assert_eq!(Format::detect(b"bplist00\x01"), Format::Binary);
    }

    #[test]
    fn test_truncated_binary_fails() {
        let err = read(b"bplist00abc").unwrap_err();
        assert!(matches!(err, ProjError::Plist(_)));
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_read_binary_project() {
        let mut root = ::plist::Dictionary::new();
        root.insert("archiveVersion".to_string(), ::plist::Value::from("1"));
        root.insert("rootObject".to_string(), ::plist::Value::from("P_1"));
        let mut bytes = Vec::new();
        ::plist::Value::Dictionary(root)
            .to_writer_binary(&mut bytes)
            .unwrap();

        let value = read(&bytes).unwrap();
        assert_eq!(value.as_dictionary().unwrap()["rootObject"], Value::from("P_1"));
    }

    #[test]
    fn test_read_ascii_with_bom() {
        let value = read(b"\xEF\xBB\xBF{ a = b; }").unwrap();
        assert_eq!(value.as_dictionary().unwrap()["a"], Value::from("b"));
    }
}
