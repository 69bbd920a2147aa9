//! Tokenizer for the literal subset of Go, including automatic semicolons.

use crate::error::{Pos, SyntaxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    /// A Go keyword other than `map`. Never valid in a literal.
    Keyword,
    Map,
    Int,
    Float,
    Imag,
    Char,
    String,
    Amp,
    Star,
    Minus,
    Plus,
    Not,
    Caret,
    Dot,
    Ellipsis,
    Comma,
    Colon,
    Semicolon,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    /// Semicolon inserted at a line end or at the end of input.
    AutoSemicolon,
    Eof,
}

impl TokenKind {
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Float | TokenKind::Imag | TokenKind::Char | TokenKind::String
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub pos: Pos,
    /// Line of the token's last character. Differs from `pos.line` only for
    /// raw strings spanning lines.
    pub end_line: usize,
}

impl Token<'_> {
    /// How the token is named in error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "EOF".to_string(),
            TokenKind::AutoSemicolon => "newline".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

const UNSUPPORTED_OPERATORS: &[&str] = &[
    "&&", "&^", "&=", "||", "|=", "++", "+=", "--", "-=", "*=", "!=", "^=", ":=", "==", "<-", "<=",
    "<<", ">=", ">>", "/=", "%=",
];

pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, SyntaxError> {
    Lexer {
        src,
        offset: 0,
        line: 1,
        line_start: 0,
        insert_semi: false,
        tokens: Vec::new(),
    }
    .run()
}

struct Lexer<'a> {
    src: &'a str,
    offset: usize,
    line: usize,
    line_start: usize,
    /// Whether a line end here terminates a statement.
    insert_semi: bool,
    tokens: Vec<Token<'a>>,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> Result<Vec<Token<'a>>, SyntaxError> {
        loop {
            let Some(c) = self.peek() else {
                if self.insert_semi {
                    self.push_auto_semicolon(self.pos());
                }
                let pos = self.pos();
                self.tokens.push(Token {
                    kind: TokenKind::Eof,
                    text: "",
                    pos,
                    end_line: pos.line,
                });
                return Ok(self.tokens);
            };
            match c {
                ' ' | '\t' | '\r' => self.bump(),
                '\n' => {
                    if self.insert_semi {
                        self.push_auto_semicolon(self.pos());
                    }
                    self.bump();
                }
                '/' if self.peek_second() == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                '/' if self.peek_second() == Some('*') => self.skip_block_comment()?,
                _ => self.scan_token(c)?,
            }
        }
    }

    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            column: self.offset - self.line_start + 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.offset..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.offset..].chars().nth(1)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.offset += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.line_start = self.offset;
            }
        }
    }

    fn push_auto_semicolon(&mut self, pos: Pos) {
        self.tokens.push(Token {
            kind: TokenKind::AutoSemicolon,
            text: "\n",
            pos,
            end_line: pos.line,
        });
        self.insert_semi = false;
    }

    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos();
        let Some(len) = self.src[self.offset + 2..].find("*/") else {
            return Err(SyntaxError::new(start, "comment not terminated"));
        };
        let body = &self.src[self.offset..self.offset + 2 + len + 2];
        // A comment spanning lines acts like a newline.
        if body.contains('\n') && self.insert_semi {
            self.push_auto_semicolon(start);
        }
        for _ in body.chars() {
            self.bump();
        }
        Ok(())
    }

    fn scan_token(&mut self, c: char) -> Result<(), SyntaxError> {
        let start_offset = self.offset;
        let start = self.pos();
        let kind = match c {
            c if c == '_' || c.is_alphabetic() => {
                while self.peek().is_some_and(|c| c == '_' || c.is_alphanumeric()) {
                    self.bump();
                }
                match &self.src[start_offset..self.offset] {
                    "map" => TokenKind::Map,
                    word if KEYWORDS.contains(&word) => TokenKind::Keyword,
                    _ => TokenKind::Ident,
                }
            }
            '0'..='9' => self.scan_number(start)?,
            '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => self.scan_number(start)?,
            '"' => {
                self.scan_string(start)?;
                TokenKind::String
            }
            '`' => {
                self.scan_raw_string(start)?;
                TokenKind::String
            }
            '\'' => {
                self.scan_rune(start)?;
                TokenKind::Char
            }
            '.' if self.src[self.offset..].starts_with("...") => {
                self.offset += 3;
                TokenKind::Ellipsis
            }
            _ => {
                if let Some(op) = UNSUPPORTED_OPERATORS
                    .iter()
                    .find(|op| self.src[self.offset..].starts_with(**op))
                {
                    return Err(SyntaxError::new(
                        start,
                        format!("operator {op} is not allowed in a literal"),
                    ));
                }
                let kind = match c {
                    '&' => TokenKind::Amp,
                    '*' => TokenKind::Star,
                    '-' => TokenKind::Minus,
                    '+' => TokenKind::Plus,
                    '!' => TokenKind::Not,
                    '^' => TokenKind::Caret,
                    '.' => TokenKind::Dot,
                    ',' => TokenKind::Comma,
                    ':' => TokenKind::Colon,
                    ';' => TokenKind::Semicolon,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '[' => TokenKind::LBrack,
                    ']' => TokenKind::RBrack,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    other => {
                        return Err(SyntaxError::new(
                            start,
                            format!("invalid character U+{:04X} {other:?}", other as u32),
                        ));
                    }
                };
                self.bump();
                kind
            }
        };

        let text = &self.src[start_offset..self.offset];
        self.insert_semi = match kind {
            TokenKind::Ident | TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace => true,
            TokenKind::Keyword => matches!(text, "break" | "continue" | "fallthrough" | "return"),
            kind => kind.is_literal(),
        };
        self.tokens.push(Token {
            kind,
            text,
            pos: start,
            end_line: self.line,
        });
        Ok(())
    }

    fn scan_number(&mut self, start: Pos) -> Result<TokenKind, SyntaxError> {
        let mut kind = TokenKind::Int;
        let mut base = 10;
        let mut prefix = None;
        let mut has_digits = false;
        let mut invalid_digit = None;

        if self.peek() == Some('.') {
            kind = TokenKind::Float;
            self.bump();
            has_digits |= self.digits(10, &mut invalid_digit);
        } else {
            if self.peek() == Some('0') {
                self.bump();
                match self.peek().map(|c| c.to_ascii_lowercase()) {
                    Some(p @ 'x') => (base, prefix) = (16, Some(p)),
                    Some(p @ 'o') => (base, prefix) = (8, Some(p)),
                    Some(p @ 'b') => (base, prefix) = (2, Some(p)),
                    _ => {
                        (base, prefix) = (8, Some('0'));
                        has_digits = true;
                    }
                }
                if prefix != Some('0') {
                    self.bump();
                }
            }
            has_digits |= self.digits(base, &mut invalid_digit);
            if self.peek() == Some('.') {
                if matches!(prefix, Some('o' | 'b')) {
                    return Err(SyntaxError::new(
                        start,
                        format!("invalid radix point in {} literal", base_name(prefix)),
                    ));
                }
                kind = TokenKind::Float;
                self.bump();
                has_digits |= self.digits(base, &mut invalid_digit);
            }
        }

        if !has_digits {
            return Err(SyntaxError::new(
                start,
                format!("{} literal has no digits", base_name(prefix)),
            ));
        }

        match self.peek().map(|c| c.to_ascii_lowercase()) {
            Some(exp @ ('e' | 'p')) => {
                if exp == 'e' && matches!(prefix, Some('o' | 'b')) {
                    return Err(SyntaxError::new(start, "'e' exponent requires decimal mantissa"));
                }
                if exp == 'p' && prefix != Some('x') {
                    return Err(SyntaxError::new(start, "'p' exponent requires hexadecimal mantissa"));
                }
                kind = TokenKind::Float;
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                if !self.digits(10, &mut None) {
                    return Err(SyntaxError::new(start, "exponent has no digits"));
                }
            }
            _ if prefix == Some('x') && kind == TokenKind::Float => {
                return Err(SyntaxError::new(
                    start,
                    "hexadecimal mantissa requires a 'p' exponent",
                ));
            }
            _ => {}
        }

        if self.peek() == Some('i') {
            self.bump();
            kind = TokenKind::Imag;
        }

        if kind == TokenKind::Int
            && let Some(digit) = invalid_digit
        {
            return Err(SyntaxError::new(
                start,
                format!("invalid digit '{digit}' in {} literal", base_name(prefix)),
            ));
        }
        Ok(kind)
    }

    /// Consume digits and separators. Decimal digits beyond `base` are
    /// consumed but recorded, since they are legal in a float mantissa.
    fn digits(&mut self, base: u32, invalid: &mut Option<char>) -> bool {
        let mut any = false;
        while let Some(c) = self.peek() {
            if c == '_' {
                self.bump();
                continue;
            }
            let valid = if base <= 10 { c.is_ascii_digit() } else { c.is_ascii_hexdigit() };
            if !valid {
                break;
            }
            if c.to_digit(base).is_none() && invalid.is_none() {
                *invalid = Some(c);
            }
            any = true;
            self.bump();
        }
        any
    }

    fn scan_string(&mut self, start: Pos) -> Result<(), SyntaxError> {
        self.bump();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(SyntaxError::new(start, "string literal not terminated"));
                }
                Some('"') => {
                    self.bump();
                    return Ok(());
                }
                Some('\\') => self.scan_escape('"')?,
                Some(_) => self.bump(),
            }
        }
    }

    fn scan_raw_string(&mut self, start: Pos) -> Result<(), SyntaxError> {
        self.bump();
        loop {
            match self.peek() {
                None => return Err(SyntaxError::new(start, "raw string literal not terminated")),
                Some('`') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => self.bump(),
            }
        }
    }

    fn scan_rune(&mut self, start: Pos) -> Result<(), SyntaxError> {
        self.bump();
        let mut count = 0;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(SyntaxError::new(start, "rune literal not terminated"));
                }
                Some('\'') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.scan_escape('\'')?;
                    count += 1;
                }
                Some(_) => {
                    self.bump();
                    count += 1;
                }
            }
        }
        match count {
            1 => Ok(()),
            0 => Err(SyntaxError::new(start, "empty rune literal or unescaped ' in rune literal")),
            _ => Err(SyntaxError::new(start, "more than one character in rune literal")),
        }
    }

    fn scan_escape(&mut self, quote: char) -> Result<(), SyntaxError> {
        let pos = self.pos();
        self.bump();
        let (count, base, max) = match self.peek() {
            Some(c) if c == quote || matches!(c, 'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\') => {
                self.bump();
                return Ok(());
            }
            Some('0'..='7') => (3, 8, 255),
            Some('x') => (2, 16, 255),
            Some('u') => (4, 16, 0x10FFFF),
            Some('U') => (8, 16, 0x10FFFF),
            None => return Err(SyntaxError::new(pos, "escape sequence not terminated")),
            Some(_) => return Err(SyntaxError::new(pos, "unknown escape sequence")),
        };
        if base == 16 {
            self.bump();
        }
        let mut value: u32 = 0;
        for _ in 0..count {
            let Some(digit) = self.peek().and_then(|c| c.to_digit(base)) else {
                return Err(SyntaxError::new(pos, "invalid character in escape sequence"));
            };
            value = value * base + digit;
            self.bump();
        }
        if value > max || (0xD800..0xE000).contains(&value) {
            return Err(SyntaxError::new(
                pos,
                "escape sequence is invalid Unicode code point",
            ));
        }
        Ok(())
    }
}

fn base_name(prefix: Option<char>) -> &'static str {
    match prefix {
        Some('x') => "hexadecimal",
        Some('o' | '0') => "octal",
        Some('b') => "binary",
        _ => "decimal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_semicolon_after_closing_brace() {
        use TokenKind::*;
        assert_eq!(
            kinds("&T{\n}\n"),
            vec![Amp, Ident, LBrace, RBrace, AutoSemicolon, Eof]
        );
    }

    #[test]
    fn test_no_semicolon_after_comma() {
        use TokenKind::*;
        assert_eq!(kinds("a,\nb"), vec![Ident, Comma, Ident, AutoSemicolon, Eof]);
    }

    #[test]
    fn test_numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds("1 0x1F 0b101 0o17 017 1.5 .5 1e+06 0x1p-2 1_000 2i 089.5"),
            vec![Int, Int, Int, Int, Int, Float, Float, Float, Float, Int, Imag, Float, AutoSemicolon, Eof]
        );
    }

    #[test]
    fn test_number_errors() {
        assert_eq!(tokenize("0x").unwrap_err().message, "hexadecimal literal has no digits");
        assert_eq!(tokenize("089").unwrap_err().message, "invalid digit '8' in octal literal");
        assert_eq!(tokenize("1e").unwrap_err().message, "exponent has no digits");
        assert_eq!(
            tokenize("0x1.5").unwrap_err().message,
            "hexadecimal mantissa requires a 'p' exponent"
        );
    }

    #[test]
    fn test_string_escapes() {
        assert!(tokenize(r#""a\"b\x41\u00e9\U0001F600\101\a""#).is_ok());
        let err = tokenize(r#""bad \q""#).unwrap_err();
        assert_eq!(err.message, "unknown escape sequence");
        assert_eq!(err.column, 6);
        assert_eq!(
            tokenize(r#""\uD800""#).unwrap_err().message,
            "escape sequence is invalid Unicode code point"
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("\"abc\n\"").unwrap_err();
        assert_eq!((err.line, err.column), (1, 1));
        assert_eq!(err.message, "string literal not terminated");
    }

    #[test]
    fn test_raw_string_spans_lines() {
        let tokens = tokenize("`a\nb`").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].pos.line, 1);
        assert_eq!(tokens[0].end_line, 2);
    }

    #[test]
    fn test_runes() {
        assert!(tokenize(r"'a' '\n' '\'' 'é'").is_ok());
        assert!(tokenize("''").is_err());
        assert!(tokenize("'ab'").is_err());
    }

    #[test]
    fn test_comments_are_whitespace() {
        use TokenKind::*;
        assert_eq!(kinds("a // note\n"), vec![Ident, AutoSemicolon, Eof]);
        assert_eq!(kinds("a /* x */ , b"), vec![Ident, Comma, Ident, AutoSemicolon, Eof]);
        assert_eq!(kinds("a /*\n*/ b"), vec![Ident, AutoSemicolon, Ident, AutoSemicolon, Eof]);
        assert_eq!(tokenize("/* open").unwrap_err().message, "comment not terminated");
    }

    #[test]
    fn test_keywords_and_operators() {
        use TokenKind::*;
        assert_eq!(kinds("map func"), vec![Map, Keyword, Eof]);
        assert_eq!(kinds("x..."), vec![Ident, Ellipsis, Eof]);
        assert!(tokenize("a && b").is_err());
        assert_eq!(tokenize("@").unwrap_err().message, "invalid character U+0040 '@'");
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("a:\n  bb").unwrap();
        assert_eq!(tokens[2].pos, Pos { line: 2, column: 3 });
    }
}
