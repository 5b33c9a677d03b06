//! Line-level helpers shared by the statement builders

use crate::grammar::ast::nodes::PathSegment;
use crate::grammar::builders::atomic::Parser;
use crate::tokens::Token;

/// Consume every token up to (not including) the newline
pub fn take_line<'src>(parser: &mut dyn Parser<'src>) -> Vec<Token<'src>> {
    let mut tokens = Vec::new();
    while !parser.at_line_end() {
        match parser.advance() {
            Some(token) => tokens.push(token),
            None => break,
        }
    }
    tokens
}

/// Keywords stay keywords; everything else becomes a name
pub fn segment_for(token: &Token<'_>) -> PathSegment {
    if token.kind.is_keyword() {
        PathSegment::Keyword(token.kind)
    } else {
        PathSegment::Name(token.unquoted().to_string())
    }
}

/// Consume the rest of the line as path segments
pub fn line_segments(parser: &mut dyn Parser<'_>) -> Vec<PathSegment> {
    take_line(parser).iter().map(segment_for).collect()
}

/// Rebuild source text from adjacent tokens: touching tokens are joined
/// directly, any gap becomes a single space
pub fn joined_text(tokens: &[Token<'_>]) -> String {
    let mut text = String::new();
    let mut previous_end = None;
    for token in tokens {
        if let Some(end) = previous_end {
            if token.span.start.offset != end {
                text.push(' ');
            }
        }
        text.push_str(token.text);
        previous_end = Some(token.span.end.offset);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenKind;
    use crate::utils::{Position, Span};

    fn at(kind: TokenKind, text: &'static str, offset: usize) -> Token<'static> {
        Token::new(
            kind,
            text,
            Span::new(
                Position::new(offset, 1, offset as u32 + 1),
                Position::new(offset + text.len(), 1, (offset + text.len()) as u32 + 1),
            ),
        )
    }

    #[test]
    fn test_joined_text_respects_gaps() {
        let tokens = [
            at(TokenKind::DecimalNumber, "64512", 0),
            at(TokenKind::Colon, ":", 5),
            at(TokenKind::Period, ".", 6),
            at(TokenKind::Variable, "*", 7),
            at(TokenKind::Variable, "_", 9),
        ];
        assert_eq!(joined_text(&tokens), "64512:.* _");
    }

    #[test]
    fn test_segment_for() {
        assert_eq!(
            segment_for(&at(TokenKind::Neighbor, "neighbor", 0)),
            PathSegment::Keyword(TokenKind::Neighbor)
        );
        assert_eq!(
            segment_for(&at(TokenKind::DoubleQuotedString, "\"x y\"", 0)),
            PathSegment::name("x y")
        );
    }
}
