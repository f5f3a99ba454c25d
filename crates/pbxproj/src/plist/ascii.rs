//! Reader for the OpenStep (ASCII) property list dialect used by `.pbxproj`
//!
//! Grammar accepted:
//! - dictionaries `{ key = value; ... }`
//! - arrays `( value, value, ... )` with an optional trailing comma
//! - quoted strings `"..."` with backslash escapes
//! - bare strings made of anything but whitespace and delimiters
//! - `/* block */` and `// line` comments anywhere between tokens

use super::value::{Dictionary, Value};
use crate::error::{ProjError, Result};

/// Parse a whole ASCII property list document
pub fn parse(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    parser.skip_trivia()?;
    if let Some(c) = parser.peek() {
        return Err(parser.error(format!("unexpected trailing character '{c}'")));
    }
    Ok(value)
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ProjError {
        ProjError::Syntax {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.next() {
                        Some('*') => self.skip_block_comment()?,
                        Some('/') => self.skip_line_comment(),
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        self.bump();
        self.bump();
        let mut previous = '\0';
        while let Some(c) = self.bump() {
            if previous == '*' && c == '/' {
                return Ok(());
            }
            previous = c;
        }
        Err(self.error("unterminated comment"))
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_trivia()?;
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected '{expected}', found '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', found end of input"))),
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_trivia()?;
        match self.peek() {
            Some('{') => self.parse_dictionary(),
            Some('(') => self.parse_array(),
            Some('"') => self.parse_quoted().map(Value::String),
            Some('<') => Err(self.error("binary data values are not supported")),
            Some(c) if is_bare(c) => Ok(Value::String(self.parse_bare())),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_dictionary(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut dict = Dictionary::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Dictionary(dict));
            }
            let key = match self.parse_value()? {
                Value::String(key) => key,
                _ => return Err(self.error("dictionary keys must be strings")),
            };
            self.expect('=')?;
            let value = self.parse_value()?;
            self.expect(';')?;
            dict.insert(key, value);
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('(')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(')') {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') => {}
                Some(c) => return Err(self.error(format!("expected ',' or ')', found '{c}'"))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn parse_quoted(&mut self) -> Result<String> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => out.push(self.parse_escape()?),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char> {
        let c = self.bump().ok_or_else(|| self.error("unterminated escape"))?;
        Ok(match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            'U' | 'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = self
                        .bump()
                        .and_then(|d| d.to_digit(16))
                        .ok_or_else(|| self.error("invalid unicode escape"))?;
                    code = code * 16 + digit;
                }
                char::from_u32(code).ok_or_else(|| self.error("invalid unicode scalar"))?
            }
            d @ '0'..='7' => {
                let mut code = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|n| n.to_digit(8)) {
                        Some(digit) => {
                            self.bump();
                            code = code * 8 + digit;
                        }
                        None => break,
                    }
                }
                char::from_u32(code).ok_or_else(|| self.error("invalid octal escape"))?
            }
            other => other,
        })
    }

    fn parse_bare(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if !is_bare(c) {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }
}

fn is_bare(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '{' | '}' | '(' | ')' | '=' | ';' | ',' | '"' | '<' | '>')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let doc = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objects = {
/* Begin PBXBuildFile section */
		OBJ_1 /* main.swift in Sources */ = {isa = PBXBuildFile; fileRef = OBJ_2 /* main.swift */; };
/* End PBXBuildFile section */
	};
	list = (
		a,
		"b c",
	);
}
"#;
        let value = parse(doc).unwrap();
        let root = value.as_dictionary().unwrap();
        assert_eq!(root["archiveVersion"], Value::from("1"));
        assert_eq!(root["classes"], Value::Dictionary(Dictionary::new()));
        let objects = root["objects"].as_dictionary().unwrap();
        let build_file = objects["OBJ_1"].as_dictionary().unwrap();
        assert_eq!(build_file["isa"], Value::from("PBXBuildFile"));
        assert_eq!(build_file["fileRef"], Value::from("OBJ_2"));
        assert_eq!(
            root["list"],
            Value::Array(vec![Value::from("a"), Value::from("b c")])
        );
    }

    #[test]
    fn test_escapes_are_decoded() {
        let value = parse(r#"{ s = "a\"b\\c\nd\te"; }"#).unwrap();
        assert_eq!(
            value.as_dictionary().unwrap()["s"],
            Value::from("a\"b\\c\nd\te")
        );
    }

    #[test]
    fn test_bare_values_with_slashes() {
        let value = parse("{ path = Sources/main.swift; tree = \"<group>\"; }").unwrap();
        let dict = value.as_dictionary().unwrap();
        assert_eq!(dict["path"], Value::from("Sources/main.swift"));
        assert_eq!(dict["tree"], Value::from("<group>"));
    }

    #[test]
    fn test_array_without_trailing_comma() {
        let value = parse("(a, b)").unwrap();
        assert_eq!(value, Value::Array(vec![Value::from("a"), Value::from("b")]));
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let err = parse("{\n  a = b\n}").unwrap_err();
        match err {
            ProjError::Syntax { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_merge_conflict_markers_are_rejected() {
        assert!(parse("{\n<<<<<<< HEAD\n}").is_err());
    }
}
