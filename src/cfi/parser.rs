//! CFI Parser
//!
//! Grammar accepted (simplified):
//! ```text
//! cfi       = "epubcfi(" body ")" | body
//! body      = path ["," path "," path]
//! path      = step+ [offset]
//! step      = "/" number [assertion] | "!" [assertion]
//! offset    = ":" number [assertion] | "~" number | "@" number ":" number
//! assertion = "[" text "]"          ; "^" escapes the next character
//! ```

use thiserror::Error;

use super::types::*;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CfiParseError {
    #[error("Empty CFI string")]
    Empty,

    #[error("CFI must start with 'epubcfi(', '/' or '!'")]
    MissingPrefix,

    #[error("CFI must end with ')'")]
    MissingClosingParen,

    #[error("Expected '/' or '!' at position {0}")]
    ExpectedStep(usize),

    #[error("Expected number at position {0}")]
    ExpectedNumber(usize),

    #[error("Unclosed bracket at position {0}")]
    UnclosedBracket(usize),

    #[error("Unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.input[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> CfiParseError {
        CfiParseError::UnexpectedChar(self.peek().unwrap_or('\0'), self.pos)
    }

    fn digits(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn number(&mut self) -> Result<u32, CfiParseError> {
        let start = self.pos;
        self.digits()
            .parse()
            .map_err(|_| CfiParseError::ExpectedNumber(start))
    }

    fn float(&mut self) -> Result<f64, CfiParseError> {
        let start = self.pos;
        self.eat('-');
        self.digits();
        if self.eat('.') {
            self.digits();
        }
        self.input[start..self.pos]
            .parse()
            .map_err(|_| CfiParseError::ExpectedNumber(start))
    }

    fn assertion(&mut self) -> Result<Option<Assertion>, CfiParseError> {
        let open = self.pos;
        if !self.eat('[') {
            return Ok(None);
        }

        // Unescaped pieces, each tagged with the delimiter that preceded it.
        let mut pieces: Vec<(char, String)> = vec![('[', String::new())];
        loop {
            let ch = self.bump().ok_or(CfiParseError::UnclosedBracket(open))?;
            match ch {
                '^' => {
                    let escaped = self.bump().ok_or(CfiParseError::UnclosedBracket(open))?;
                    if let Some((_, piece)) = pieces.last_mut() {
                        piece.push(escaped);
                    }
                }
                ']' => break,
                '[' => return Err(CfiParseError::UnexpectedChar('[', self.pos - 1)),
                ',' | ';' => pieces.push((ch, String::new())),
                _ => {
                    if let Some((_, piece)) = pieces.last_mut() {
                        piece.push(ch);
                    }
                }
            }
        }

        if pieces.len() == 1 {
            return Ok(pieces.pop().map(|(_, id)| Assertion::Id(id)));
        }

        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let mut prefix = None;
        let mut suffix = None;
        let mut parameters = Vec::new();
        for (delimiter, piece) in &pieces {
            match delimiter {
                '[' => prefix = non_empty(piece.as_str()),
                ',' => suffix = non_empty(piece.as_str()),
                _ => {
                    if let Some((key, value)) = piece.split_once('=') {
                        if !key.trim().is_empty() {
                            parameters.push((key.trim().to_string(), value.trim().to_string()));
                        }
                    }
                }
            }
        }
        Ok(Some(Assertion::Text {
            prefix,
            suffix,
            parameters,
        }))
    }

    fn step(&mut self) -> Result<CfiStep, CfiParseError> {
        let kind = if self.eat('/') {
            StepKind::Index(self.number()?)
        } else if self.eat('!') {
            StepKind::Indirection
        } else {
            return Err(CfiParseError::ExpectedStep(self.pos));
        };
        Ok(CfiStep {
            kind,
            assertion: self.assertion()?,
        })
    }

    fn path(&mut self, allow_empty: bool) -> Result<CfiPath, CfiParseError> {
        let mut path = CfiPath::default();
        while matches!(self.peek(), Some('/') | Some('!')) {
            path.steps.push(self.step()?);
        }

        if self.eat(':') {
            let offset = self.number()?;
            path.character_offset = Some(CharacterOffset {
                offset,
                assertion: self.assertion()?,
            });
        }
        if self.eat('~') {
            path.temporal_offset = Some(self.float()?);
        }
        if self.eat('@') {
            let x = self.float()?;
            if !self.eat(':') {
                return Err(self.unexpected());
            }
            path.spatial_offset = Some((x, self.float()?));
        }

        let is_empty = path.steps.is_empty() && path.character_offset.is_none();
        if is_empty && !allow_empty {
            return Err(CfiParseError::ExpectedStep(self.pos));
        }
        Ok(path)
    }

    fn body(&mut self, wrapped: bool) -> Result<Cfi, CfiParseError> {
        let path = self.path(false)?;
        let range = if self.eat(',') {
            let start = self.path(true)?;
            if !self.eat(',') {
                return Err(self.unexpected());
            }
            let end = self.path(true)?;
            Some(CfiRange { start, end })
        } else {
            None
        };
        Ok(Cfi {
            path,
            range,
            wrapped,
        })
    }
}

/// Parse a CFI string, with or without the `epubcfi(...)` wrapper.
pub fn parse(input: &str) -> Result<Cfi, CfiParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CfiParseError::Empty);
    }

    let mut cursor = Cursor::new(input);
    let cfi = if cursor.eat_str("epubcfi(") {
        let cfi = cursor.body(true)?;
        if !cursor.eat(')') {
            return Err(CfiParseError::MissingClosingParen);
        }
        cfi
    } else if matches!(cursor.peek(), Some('/') | Some('!')) {
        cursor.body(false)?
    } else {
        return Err(CfiParseError::MissingPrefix);
    };

    if cursor.peek().is_some() {
        return Err(cursor.unexpected());
    }
    Ok(cfi)
}

pub fn try_parse(input: &str) -> Option<Cfi> {
    parse(input).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped() {
        let cfi = parse("epubcfi(/6/4!/4/2)").unwrap();
        assert!(cfi.wrapped);
        let kinds: Vec<StepKind> = cfi.path.steps.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Index(6),
                StepKind::Index(4),
                StepKind::Indirection,
                StepKind::Index(4),
                StepKind::Index(2),
            ]
        );
    }

    #[test]
    fn test_parse_bare() {
        let cfi = parse("/6/4[chap01]!/4/2").unwrap();
        assert!(!cfi.wrapped);
        assert_eq!(
            cfi.path.steps[1].assertion,
            Some(Assertion::Id("chap01".to_string()))
        );
        assert_eq!(cfi.to_string(), "/6/4[chap01]!/4/2");
    }

    #[test]
    fn test_parse_text_assertion_with_parameters() {
        let cfi = parse("epubcfi(/6/4!/4/2/1:42[hello,world;s=b])").unwrap();
        let offset = cfi.path.character_offset.unwrap();
        assert_eq!(offset.offset, 42);
        assert_eq!(
            offset.assertion,
            Some(Assertion::Text {
                prefix: Some("hello".into()),
                suffix: Some("world".into()),
                parameters: vec![("s".into(), "b".into())],
            })
        );
    }

    #[test]
    fn test_parse_escaped_bracket() {
        let cfi = parse("/6/4[test^]value]!/4").unwrap();
        assert_eq!(
            cfi.path.steps[1].assertion,
            Some(Assertion::Id("test]value".into()))
        );
    }

    #[test]
    fn test_parse_range() {
        let cfi = parse("epubcfi(/6/4!/4/2,/1:0,/1:10)").unwrap();
        let range = cfi.range.as_ref().unwrap();
        assert_eq!(range.start.character_offset.as_ref().unwrap().offset, 0);
        assert_eq!(range.end.character_offset.as_ref().unwrap().offset, 10);
        assert_eq!(cfi.to_string(), "epubcfi(/6/4!/4/2,/1:0,/1:10)");
    }

    #[test]
    fn test_parse_temporal_and_spatial_offsets() {
        let cfi = parse("epubcfi(/6/4!/4~12.5@50.5:25)").unwrap();
        assert_eq!(cfi.path.temporal_offset, Some(12.5));
        assert_eq!(cfi.path.spatial_offset, Some((50.5, 25.0)));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("   "), Err(CfiParseError::Empty));
        assert_eq!(parse("chapter"), Err(CfiParseError::MissingPrefix));
        assert_eq!(parse("epubcfi(/6/4"), Err(CfiParseError::MissingClosingParen));
        assert_eq!(parse("/6/x"), Err(CfiParseError::ExpectedNumber(3)));
        assert_eq!(parse("/6[abc"), Err(CfiParseError::UnclosedBracket(2)));
        assert_eq!(parse("epubcfi()"), Err(CfiParseError::ExpectedStep(8)));
        assert!(matches!(
            parse("/6/4)"),
            Err(CfiParseError::UnexpectedChar(')', 4))
        ));
    }

    #[test]
    fn test_try_parse() {
        assert!(try_parse("/2").is_some());
        assert!(try_parse("nope").is_none());
    }
}
