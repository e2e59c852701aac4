//! The lexer implementation using logos.
//!
//! Lexing runs in two passes: logos produces raw tokens (comments and
//! horizontal whitespace skipped), then a layout pass drops newlines inside
//! brackets and blank lines, and turns changes in leading indentation into
//! `Indent` / `Dedent` tokens.

use logos::Logos;
use docsnip_ast::token::{Token, TokenKind};
use docsnip_ast::Span;

/// Raw token type for logos - we parse values in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\f]+")]  // Skip horizontal whitespace (not newlines)
enum RawToken {
    // === Keywords ===
    #[token("and")]
    And,
    #[token("as")]
    As,
    #[token("assert")]
    Assert,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("def")]
    Def,
    #[token("del")]
    Del,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("except")]
    Except,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("from")]
    From,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("in")]
    In,
    #[token("is")]
    Is,
    #[token("None")]
    None,
    #[token("not")]
    Not,
    #[token("or")]
    Or,
    #[token("pass")]
    Pass,
    #[token("raise")]
    Raise,
    #[token("return")]
    Return,
    #[token("try")]
    Try,
    #[token("while")]
    While,
    #[token("True")]
    True,
    #[token("False")]
    False,

    // === Operators (order matters - longer first) ===
    #[token("//=")]
    SlashSlashEq,
    #[token("**")]
    StarStar,
    #[token("//")]
    SlashSlash,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    // === Newline (significant) ===
    #[token("\n")]
    #[token("\r\n")]
    Newline,

    // === Comments and explicit line joins (skip them) ===
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,
    #[regex(r"\\\r?\n", logos::skip)]
    LineJoin,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    HexInt,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    Float,

    #[regex(r"[0-9][0-9_]*")]
    DecInt,

    // Triple-quoted strings may span lines
    #[regex(r#""""([^"\\]|\\.|\\\n|"[^"]|""[^"])*""""#)]
    #[regex(r#"'''([^'\\]|\\.|\\\n|'[^']|''[^'])*'''"#)]
    TripleString,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,

    // === Identifier (must come after keywords) ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// Columns a tab advances to (the next multiple of this).
const TAB_WIDTH: usize = 8;

/// The lexer for docsnip source code.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the entire source, collecting multiple errors.
    pub fn tokenize(&mut self) -> LexResult {
        let raw = self.raw_tokens();
        let tokens = self.layout(raw);

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// First pass: logos tokens with literal values parsed.
    fn raw_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(raw) => match self.convert_token(raw, slice, span.start, span.end) {
                    Ok(kind) => kind,
                    Err(e) => {
                        self.errors.push(e);
                        continue;
                    }
                },
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    let error = if ch == '"' || ch == '\'' {
                        LexError::unterminated_string(span.start, self.line_end(span.start), ch)
                    } else {
                        LexError::unexpected_char(ch, span.start)
                    };
                    self.errors.push(error);
                    continue;
                }
            };

            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        tokens
    }

    /// Second pass: bracket-aware newlines plus indentation tokens.
    fn layout(&mut self, raw: Vec<Token>) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(raw.len() + 8);
        let mut indents: Vec<usize> = vec![0];
        let mut depth: usize = 0;
        let mut at_line_start = true;

        for tok in raw {
            if tok.kind == TokenKind::Newline {
                if depth > 0 || at_line_start {
                    continue;
                }
                tokens.push(tok);
                at_line_start = true;
                continue;
            }

            if at_line_start {
                let column = self.indent_width(tok.span.start);
                let top = indents.last().copied().unwrap_or(0);
                if column > top {
                    indents.push(column);
                    tokens.push(Token { kind: TokenKind::Indent, span: Span::new(tok.span.start, tok.span.start) });
                } else if column < top {
                    while indents.last().is_some_and(|&level| level > column) {
                        indents.pop();
                        tokens.push(Token { kind: TokenKind::Dedent, span: Span::new(tok.span.start, tok.span.start) });
                    }
                    if indents.last().copied().unwrap_or(0) != column {
                        self.errors.push(LexError::inconsistent_dedent(tok.span.start));
                        indents.push(column);
                    }
                }
                at_line_start = false;
            }

            if tok.kind.opens_group() {
                depth += 1;
            } else if tok.kind.closes_group() {
                depth = depth.saturating_sub(1);
            }
            tokens.push(tok);
        }

        let end = self.source.len();
        if !at_line_start {
            tokens.push(Token { kind: TokenKind::Newline, span: Span::new(end, end) });
        }
        while indents.len() > 1 {
            indents.pop();
            tokens.push(Token { kind: TokenKind::Dedent, span: Span::new(end, end) });
        }
        tokens.push(Token { kind: TokenKind::Eof, span: Span::new(end, end) });
        tokens
    }

    /// Width of the leading whitespace on the line containing `offset`.
    fn indent_width(&self, offset: usize) -> usize {
        let line_start = self.source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
        self.source[line_start..offset].chars().fold(0, |col, c| match c {
            '\t' => (col / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => col + 1,
        })
    }

    fn line_end(&self, offset: usize) -> usize {
        self.source[offset..].find('\n').map(|i| offset + i).unwrap_or(self.source.len())
    }

    /// Convert a raw logos token to our TokenKind, parsing literals.
    fn convert_token(&self, raw: RawToken, slice: &str, start: usize, end: usize) -> Result<TokenKind, LexError> {
        Ok(match raw {
            // Keywords
            RawToken::And => TokenKind::And,
            RawToken::As => TokenKind::As,
            RawToken::Assert => TokenKind::Assert,
            RawToken::Break => TokenKind::Break,
            RawToken::Continue => TokenKind::Continue,
            RawToken::Def => TokenKind::Def,
            RawToken::Del => TokenKind::Del,
            RawToken::Elif => TokenKind::Elif,
            RawToken::Else => TokenKind::Else,
            RawToken::Except => TokenKind::Except,
            RawToken::Finally => TokenKind::Finally,
            RawToken::For => TokenKind::For,
            RawToken::From => TokenKind::From,
            RawToken::If => TokenKind::If,
            RawToken::Import => TokenKind::Import,
            RawToken::In => TokenKind::In,
            RawToken::Is => TokenKind::Is,
            RawToken::None => TokenKind::None,
            RawToken::Not => TokenKind::Not,
            RawToken::Or => TokenKind::Or,
            RawToken::Pass => TokenKind::Pass,
            RawToken::Raise => TokenKind::Raise,
            RawToken::Return => TokenKind::Return,
            RawToken::Try => TokenKind::Try,
            RawToken::While => TokenKind::While,
            RawToken::True => TokenKind::Bool(true),
            RawToken::False => TokenKind::Bool(false),

            // Operators
            RawToken::SlashSlashEq => TokenKind::SlashSlashEq,
            RawToken::StarStar => TokenKind::StarStar,
            RawToken::SlashSlash => TokenKind::SlashSlash,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::PercentEq => TokenKind::PercentEq,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Dot => TokenKind::Dot,

            // Delimiters
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Comma => TokenKind::Comma,

            RawToken::Newline => TokenKind::Newline,

            // Literals - parse the values
            RawToken::DecInt => {
                let cleaned: String = slice.chars().filter(|c| *c != '_').collect();
                let value = cleaned.parse::<i64>().map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Int(value)
            }
            RawToken::HexInt => {
                let cleaned: String = slice[2..].chars().filter(|c| *c != '_').collect();
                let value = i64::from_str_radix(&cleaned, 16).map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Int(value)
            }
            RawToken::Float => {
                let cleaned: String = slice.chars().filter(|c| *c != '_').collect();
                let value = cleaned.parse::<f64>().map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Float(value)
            }
            RawToken::String => {
                let inner = &slice[1..slice.len() - 1]; // Remove quotes
                TokenKind::String(parse_string(inner, start)?)
            }
            RawToken::TripleString => {
                let inner = &slice[3..slice.len() - 3];
                TokenKind::String(parse_string(inner, start)?)
            }
            RawToken::Ident => TokenKind::Ident(slice.to_string()),

            // These are skipped by logos, but we list them for completeness
            RawToken::Comment | RawToken::LineJoin => {
                unreachable!("comments and line joins are skipped")
            }
        })
    }
}

/// Parse a string literal body (handling escape sequences).
///
/// Unknown escapes are kept verbatim, backslash included.
fn parse_string(s: &str, pos: usize) -> Result<String, LexError> {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('\'') => result.push('\''),
            Some('"') => result.push('"'),
            Some('\n') => {}
            Some('x') => result.push(parse_hex_escape(&mut chars, 2, pos)?),
            Some('u') => result.push(parse_hex_escape(&mut chars, 4, pos)?),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => return Err(LexError::invalid_escape(pos)),
        }
    }

    Ok(result)
}

/// Parse exactly `digits` hex digits into a character (`\xHH`, `\uXXXX`).
fn parse_hex_escape(chars: &mut impl Iterator<Item = char>, digits: usize, pos: usize) -> Result<char, LexError> {
    let hex: String = chars.take(digits).collect();
    if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(LexError::invalid_escape(pos));
    }
    let code_point = u32::from_str_radix(&hex, 16).map_err(|_| LexError::invalid_escape(pos))?;
    char::from_u32(code_point).ok_or(LexError::invalid_escape(pos))
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone)]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unexpected character '{}'", ch),
            hint: None,
        }
    }

    fn unterminated_string(start: usize, end: usize, quote: char) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Unterminated string".to_string(),
            hint: Some(format!("Add a closing {} on the same line", quote)),
        }
    }

    fn invalid_escape(pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + 1),
            message: "Invalid escape sequence".to_string(),
            hint: Some("Valid: \\n \\r \\t \\\\ \\0 \\' \\\" \\xHH \\uXXXX".to_string()),
        }
    }

    fn invalid_number(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Invalid number".to_string(),
            hint: None,
        }
    }

    fn inconsistent_dedent(pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos),
            message: "Unindent does not match any outer indentation level".to_string(),
            hint: Some("Line this block up with an enclosing block".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok(), "Lex errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn simple_statement() {
        assert_eq!(
            kinds("a = 1 / 0"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Eq,
                TokenKind::Int(1),
                TokenKind::Slash,
                TokenKind::Int(0),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("# prints\n# abc\nx  # trailing\n"),
            vec![TokenKind::Ident("x".into()), TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn indentation_blocks() {
        let src = "if x:\n    y = 1\n\n    z = 2\nw\n";
        assert_eq!(
            kinds(src),
            vec![
                TokenKind::If,
                TokenKind::Ident("x".into()),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Ident("y".into()),
                TokenKind::Eq,
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Ident("z".into()),
                TokenKind::Eq,
                TokenKind::Int(2),
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Ident("w".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn dedents_closed_at_end_of_input() {
        let toks = kinds("def f():\n    if a:\n        return 1");
        let dedents = toks.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(dedents, 2);
        assert_eq!(toks.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn newlines_inside_brackets_are_joined() {
        assert_eq!(
            kinds("f(1,\n  2)\n"),
            vec![
                TokenKind::Ident("f".into()),
                TokenKind::LParen,
                TokenKind::Int(1),
                TokenKind::Comma,
                TokenKind::Int(2),
                TokenKind::RParen,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn literals() {
        assert_eq!(
            kinds("1_000 0x1f 2.5 1e3 'a\\tb' \"q\\\"\" True None"),
            vec![
                TokenKind::Int(1000),
                TokenKind::Int(31),
                TokenKind::Float(2.5),
                TokenKind::Float(1000.0),
                TokenKind::String("a\tb".into()),
                TokenKind::String("q\"".into()),
                TokenKind::Bool(true),
                TokenKind::None,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn triple_quoted_string_spans_lines() {
        let toks = kinds("s = \"\"\"a\nb\"\"\"\n");
        assert_eq!(toks[2], TokenKind::String("a\nb".into()));
    }

    #[test]
    fn unknown_escape_is_kept() {
        assert_eq!(kinds(r"'\d'")[0], TokenKind::String("\\d".into()));
    }

    #[test]
    fn two_char_operators() {
        assert_eq!(
            kinds("a //= 2 ** 3"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::SlashSlashEq,
                TokenKind::Int(2),
                TokenKind::StarStar,
                TokenKind::Int(3),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_reported() {
        let result = Lexer::new("print(\"abc)\n").tokenize();
        assert!(!result.is_ok());
        assert_eq!(result.errors[0].message, "Unterminated string");
    }

    #[test]
    fn bad_dedent_is_reported() {
        let result = Lexer::new("if a:\n    b\n  c\n").tokenize();
        assert!(!result.is_ok());
        assert!(result.errors[0].message.contains("Unindent"));
    }
}
