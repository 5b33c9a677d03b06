//! A lexed token borrowing its text from the source buffer

use super::kind::{TokenClass, TokenKind};
use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// Immutable token: kind, exact source text and location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self { kind, text, span }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn class(&self) -> TokenClass {
        self.kind.class()
    }

    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    pub fn is_newline(&self) -> bool {
        self.kind == TokenKind::Newline
    }

    /// Text with surrounding quotes removed for quoted strings
    pub fn unquoted(&self) -> &'src str {
        if self.kind.is_quoted() && self.text.len() >= 2 {
            &self.text[1..self.text.len() - 1]
        } else {
            self.text
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "end of line"),
            kind if kind.is_keyword() || kind.is_punctuation() => write!(f, "'{}'", self.text),
            kind => write!(f, "{} '{}'", kind.as_str(), self.text),
        }
    }
}
