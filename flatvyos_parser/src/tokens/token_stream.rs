//! Content/trivia token stream for the statement parser
//!
//! All tokens are kept in source order so spans can be checked against the
//! input. The parser navigates only the content channel (everything that is
//! not whitespace or a comment) through an index table.

use super::token::Token;
use crate::utils::Span;

#[derive(Debug, Clone, Default)]
pub struct TokenStream<'src> {
    /// Every token, trivia included, in source order
    all_tokens: Vec<Token<'src>>,
    /// Indices into all_tokens for content tokens
    significant_indices: Vec<usize>,
    /// Current position in significant_indices
    position: usize,
}

impl<'src> TokenStream<'src> {
    pub fn new(tokens: Vec<Token<'src>>) -> Self {
        let significant_indices = tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| !token.is_trivia())
            .map(|(i, _)| i)
            .collect();

        Self {
            all_tokens: tokens,
            significant_indices,
            position: 0,
        }
    }

    // === NAVIGATION ===

    pub fn current(&self) -> Option<Token<'src>> {
        self.peek_ahead(0)
    }

    pub fn current_span(&self) -> Option<Span> {
        self.current().map(|token| token.span)
    }

    /// Content token `n` positions ahead of the current one
    pub fn peek_ahead(&self, n: usize) -> Option<Token<'src>> {
        self.significant_indices
            .get(self.position + n)
            .and_then(|&index| self.all_tokens.get(index))
            .copied()
    }

    /// Consume and return the current content token
    pub fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.current()?;
        self.position += 1;
        Some(token)
    }

    /// Span of the previously consumed content token
    pub fn previous_span(&self) -> Option<Span> {
        self.position
            .checked_sub(1)
            .and_then(|pos| self.significant_indices.get(pos))
            .and_then(|&index| self.all_tokens.get(index))
            .map(|token| token.span)
    }

    // === CHANNELS ===

    pub fn all_tokens(&self) -> &[Token<'src>] {
        &self.all_tokens
    }

    /// Number of content tokens
    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.significant_indices.is_empty()
    }

    pub fn trivia_count(&self) -> usize {
        self.all_tokens.len() - self.significant_indices.len()
    }
}

/// Span integrity checks over a token stream
pub mod validation {
    use super::*;

    /// Spans never overlap and appear in source order
    pub fn validate_span_order(tokens: &[Token<'_>]) -> Result<(), String> {
        for window in tokens.windows(2) {
            let current = window[0].span;
            let next = window[1].span;

            if current.end.offset > next.start.offset {
                return Err(format!(
                    "Span order violation: token ending at {} overlaps token starting at {}",
                    current.end.offset, next.start.offset
                ));
            }
        }
        Ok(())
    }

    /// Content and trivia spans tile the whole input with no gaps
    pub fn validate_span_coverage(tokens: &[Token<'_>], source: &str) -> Result<(), String> {
        let mut expected_offset = 0;

        for token in tokens {
            if token.span.is_empty() {
                return Err(format!("Empty span for {} at {}", token.kind, token.span));
            }
            if token.span.start.offset != expected_offset {
                return Err(format!(
                    "Coverage gap: expected token at offset {}, found {} at {}",
                    expected_offset, token.kind, token.span.start.offset
                ));
            }
            if token.span.slice(source) != token.text {
                return Err(format!(
                    "Token text mismatch at offset {}",
                    token.span.start.offset
                ));
            }
            expected_offset = token.span.end.offset;
        }

        if expected_offset != source.len() {
            return Err(format!(
                "Coverage ends at {} but input has {} bytes",
                expected_offset,
                source.len()
            ));
        }
        Ok(())
    }

    pub fn validate_token_stream(stream: &TokenStream<'_>, source: &str) -> Result<(), String> {
        validate_span_order(stream.all_tokens())?;
        validate_span_coverage(stream.all_tokens(), source)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;
    use crate::utils::Position;

    fn stream_of(parts: &[(TokenKind, &'static str)]) -> TokenStream<'static> {
        let mut pos = Position::start();
        let tokens = parts
            .iter()
            .map(|&(kind, text)| {
                let start = pos;
                pos = if kind == TokenKind::Newline {
                    pos.advance_line(text.len())
                } else {
                    pos.advance_str(text)
                };
                Token::new(kind, text, Span::new(start, pos))
            })
            .collect();
        TokenStream::new(tokens)
    }

    #[test]
    fn test_trivia_is_skipped() {
        let mut stream = stream_of(&[
            (TokenKind::Set, "set"),
            (TokenKind::Whitespace, " "),
            (TokenKind::System, "system"),
            (TokenKind::Comment, "#c"),
            (TokenKind::Newline, "\n"),
        ]);

        assert_eq!(stream.len(), 3);
        assert_eq!(stream.trivia_count(), 2);
        assert_eq!(stream.current().map(|t| t.kind), Some(TokenKind::Set));
        assert_eq!(stream.peek_ahead(1).map(|t| t.kind), Some(TokenKind::System));

        stream.advance();
        assert_eq!(stream.advance().map(|t| t.kind), Some(TokenKind::System));
        assert_eq!(stream.current().map(|t| t.kind), Some(TokenKind::Newline));
        assert_eq!(stream.previous_span().map(|s| s.start.offset), Some(4));

        stream.advance();
        assert!(stream.advance().is_none());
        assert!(stream.current_span().is_none());
    }

    #[test]
    fn test_span_coverage_detects_gap() {
        let stream = stream_of(&[(TokenKind::Set, "set"), (TokenKind::Whitespace, " ")]);
        assert!(validation::validate_token_stream(&stream, "set ").is_ok());
        assert!(validation::validate_span_coverage(stream.all_tokens(), "set  ").is_err());
    }
}
