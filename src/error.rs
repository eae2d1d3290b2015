//! Error types for parsing, type resolution and verification.

use crate::lexer::Position;
use std::fmt;

/// Failure while turning source text into a [`Document`](crate::ast::Document).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("tokenize: {0}")]
    Grammar(String),
    #[error("{pos}: unexpected end of input, expected {expected}")]
    UnexpectedEof { pos: Position, expected: String },
    /// Token does not match the Name / ident / Number pattern required here.
    #[error("{pos}: '{found}' is not a valid {expected}")]
    Lex {
        pos: Position,
        found: String,
        expected: String,
    },
    #[error("{pos}: number '{found}' is out of range")]
    NumberOutOfRange { pos: Position, found: String },
    #[error("{pos}: expected {expected}, found '{found}'")]
    Syntax {
        pos: Position,
        expected: String,
        found: String,
    },
    #[error("{pos}: property '{property}' has no type")]
    MissingType { pos: Position, property: String },
    #[error("{pos}: object '{name}' is already declared at {first}")]
    DuplicateObject {
        pos: Position,
        name: String,
        first: Position,
    },
}

impl ParseError {
    pub fn pos(&self) -> Option<Position> {
        match self {
            ParseError::Grammar(_) => None,
            ParseError::UnexpectedEof { pos, .. }
            | ParseError::Lex { pos, .. }
            | ParseError::NumberOutOfRange { pos, .. }
            | ParseError::Syntax { pos, .. }
            | ParseError::MissingType { pos, .. }
            | ParseError::DuplicateObject { pos, .. } => Some(*pos),
        }
    }
}

/// A raw type token sequence that is not a scalar, `C1[T]` or `C2[A,B]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("empty type expression")]
    Empty,
    #[error("unknown type '{0}'")]
    UnknownType(String),
    #[error("'{container}' must be followed by '['")]
    MissingOpenBracket { container: String },
    #[error("unbalanced brackets in '{0}'")]
    UnbalancedBrackets(String),
    #[error("unexpected '{trailing}' after '{container}[...]'")]
    TrailingTokens { container: String, trailing: String },
    #[error("'{container}' takes {expected} type argument(s), found {found}")]
    ArgumentCount {
        container: String,
        expected: usize,
        found: usize,
    },
    #[error("type nesting exceeds {limit} levels")]
    TooDeep { limit: usize },
}

/// Referential-integrity failure found by [`verify`](crate::verify::verify).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("{pos}: unknown child '{child}' in object '{parent}'")]
    UnknownChild {
        pos: Position,
        child: String,
        parent: String,
    },
    #[error("{pos}: unknown type '{raw}' for property '{object}.{property}': {reason}")]
    UnknownType {
        pos: Position,
        raw: String,
        object: String,
        property: String,
        reason: ResolutionError,
    },
}

impl VerifyError {
    pub fn pos(&self) -> Position {
        match self {
            VerifyError::UnknownChild { pos, .. } | VerifyError::UnknownType { pos, .. } => *pos,
        }
    }
}

/// Every error found in one pass, in source order. Never empty when returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics<E>(Vec<E>);

impl<E> Diagnostics<E> {
    pub fn errors(&self) -> &[E] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.0.iter()
    }
}

impl<E> From<Vec<E>> for Diagnostics<E> {
    fn from(errors: Vec<E>) -> Self {
        Diagnostics(errors)
    }
}

impl<E: fmt::Display> fmt::Display for Diagnostics<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Diagnostics<E> {}

/// Failure of [`compile`](crate::compile): either the parse or the verify pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] Diagnostics<ParseError>),
    #[error(transparent)]
    Verify(#[from] Diagnostics<VerifyError>),
}

impl Error {
    /// One rendered line per diagnostic.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Error::Parse(d) => d.iter().map(ToString::to_string).collect(),
            Error::Verify(d) => d.iter().map(ToString::to_string).collect(),
        }
    }
}
