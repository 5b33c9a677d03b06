//! Token system for the flat VyOS dialect
//!
//! - **[`TokenKind`]**: closed set of keywords, literal classes, punctuation,
//!   the newline terminator and trivia, generated from a single table
//! - **[`Token`]**: a kind plus the exact source text and span it covers
//! - **[`TokenStream`]**: the parser's view, navigating content tokens while
//!   keeping trivia for span validation

pub mod kind;
pub mod token;
pub mod token_stream;

pub use kind::{TokenClass, TokenKind, KEYWORDS, PUNCTUATION};
pub use token::Token;
pub use token_stream::{validation, TokenStream};

pub use crate::utils::{Position, Span};
