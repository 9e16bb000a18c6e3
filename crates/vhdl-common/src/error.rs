use serde::Serialize;
use thiserror::Error;

use crate::span::Span;

/// A lexer error with location information.
///
/// The lexer never aborts: it emits an `Error` token at the offending position,
/// records one of these, and keeps going.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The specific kind of lexer error.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
pub enum LexErrorKind {
    #[error("unexpected character: {0:?}")]
    UnexpectedCharacter(char),
    /// A string or bit-string literal reached end of line before its closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("unterminated extended identifier")]
    UnterminatedExtendedIdentifier,
    /// A based literal such as `16#FF` without its closing `#`.
    #[error("invalid based literal: {0}")]
    InvalidBasedLiteral(String),
}
