//! Tokenize DSL source using PEST.
//!
//! The grammar only recognises tokens. Classification into names, idents and
//! numbers happens in the grammar itself so the parser can match on
//! [`TokenKind`] instead of re-checking text patterns.

use crate::error::ParseError;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::fmt;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct TokenParser;

/// 1-based line and column of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Capitalised letters-only word (`Foo`, `String`). Object and type names.
    Name,
    /// Lowercase letters-only word (`name`, `object`). Property names and keywords.
    Ident,
    /// Unsigned decimal literal.
    Number,
    /// Any other identifier-shaped word (`Int32`, `Vector2D`, `x`).
    Word,
    /// One of `{ } [ ] ,`.
    Punct,
    /// End of a source line. Only significant while reading a property type.
    Newline,
    /// Any other single character.
    Stray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Position,
}

impl Token {
    pub fn is_punct(&self, p: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == p
    }

    /// `object` / `schema` keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind == TokenKind::Ident && matches!(self.text.as_str(), "object" | "schema")
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Token stream of one source text plus the position just past its last character.
#[derive(Debug, Clone)]
pub struct Tokens {
    pub tokens: Vec<Token>,
    pub end: Position,
}

/// Split source into tokens. Whitespace and comments are dropped; newlines are kept.
pub fn tokenize(source: &str) -> Result<Tokens, ParseError> {
    let pairs = TokenParser::parse(Rule::tokens, source)
        .map_err(|e| ParseError::Grammar(e.to_string()))?;
    let root = pairs
        .into_iter()
        .next()
        .ok_or_else(|| ParseError::Grammar("empty token stream".to_string()))?;

    let mut tokens = Vec::new();
    let mut end = Position::new(1, 1);
    for pair in root.into_inner() {
        let (line, column) = pair.as_span().start_pos().line_col();
        let pos = Position::new(line, column);
        let kind = match pair.as_rule() {
            Rule::name => TokenKind::Name,
            Rule::ident => TokenKind::Ident,
            Rule::number => TokenKind::Number,
            Rule::word => TokenKind::Word,
            Rule::punct => TokenKind::Punct,
            Rule::newline => TokenKind::Newline,
            Rule::stray => TokenKind::Stray,
            Rule::EOI => {
                end = pos;
                continue;
            }
            other => return Err(ParseError::Grammar(format!("unexpected token rule: {:?}", other))),
        };
        tokens.push(Token {
            kind,
            text: pair.as_str().to_string(),
            pos,
        });
    }
    Ok(Tokens { tokens, end })
}
