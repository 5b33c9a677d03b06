//! Builders for `set community` and `set extcommunity-rt|extcommunity-soo`
//!
//! Both keywords switch the tokenizer out of IPv6 mode, so `64512:100`
//! arrives as a single `StandardCommunity` token. A quoted list such as
//! `"64512:100 no-export additive"` is split on whitespace and read the same
//! way as the unquoted form.

use crate::grammar::ast::value::{
    Administrator, ExtendedCommunity, ExtendedCommunityKind, StandardCommunity, Value,
};
use crate::grammar::builders::atomic::{decimal, mismatch, Parser};
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{Token, TokenKind};
use crate::utils::Span;
use std::net::Ipv4Addr;

const WELL_KNOWN: &[TokenKind] = &[
    TokenKind::NoExport,
    TokenKind::NoAdvertise,
    TokenKind::LocalAsCommunity,
    TokenKind::Internet,
];

const COMMUNITY_EXPECTED: &str = "a community, a well-known community or 'none'";
const EXTENDED_EXPECTED: &str = "an extended community of the form ASN:NN or IP:NN";

/// `none`, or one or more communities optionally followed by `additive`.
/// Returns `Keyword(none)` or a `List`.
pub fn parse_set_community(parser: &mut dyn Parser<'_>) -> SyntaxResult<Value> {
    if parser.check(TokenKind::NoneKeyword) {
        parser.advance();
        return Ok(Value::Keyword(TokenKind::NoneKeyword));
    }

    let mut values = Vec::new();
    while let Some(token) = parser.current_token() {
        if token.is_newline() || values.last() == Some(&Value::Keyword(TokenKind::Additive)) {
            break;
        }
        match token.kind {
            TokenKind::StandardCommunity => {
                values.push(standard_community(token.text, token.span)?);
            }
            TokenKind::Additive if !values.is_empty() => {
                values.push(Value::Keyword(TokenKind::Additive));
            }
            kind if WELL_KNOWN.contains(&kind) => values.push(Value::Keyword(kind)),
            kind if kind.is_quoted() => {
                for word in token.unquoted().split_whitespace() {
                    values.push(community_word(word, token.span)?);
                }
            }
            _ => break,
        }
        parser.advance();
    }

    if values.is_empty() {
        return Err(mismatch(parser, COMMUNITY_EXPECTED));
    }
    Ok(Value::List(values))
}

fn standard_community(text: &str, span: Span) -> SyntaxResult<Value> {
    StandardCommunity::parse(text)
        .map(Value::Community)
        .map_err(|reason| SyntaxError::invalid_value(text, &reason, span))
}

fn community_word(word: &str, span: Span) -> SyntaxResult<Value> {
    if word.contains(':') {
        return standard_community(word, span);
    }
    match TokenKind::keyword(word) {
        Some(kind) if WELL_KNOWN.contains(&kind) || kind == TokenKind::Additive => {
            Ok(Value::Keyword(kind))
        }
        _ => Err(SyntaxError::invalid_value(
            word,
            "not a community or well-known community name",
            span,
        )),
    }
}

/// One or more `ASN:NN` / `IP:NN` values; a single value stays scalar
pub fn parse_extended_community(
    parser: &mut dyn Parser<'_>,
    kind: ExtendedCommunityKind,
) -> SyntaxResult<Value> {
    let mut values = Vec::new();
    while let Some(token) = parser.current_token() {
        match token.kind {
            TokenKind::StandardCommunity => {
                parser.advance();
                values.push(extended_word(token.text, kind, token.span)?);
            }
            TokenKind::IpAddress => {
                parser.advance();
                values.push(ip_administered(parser, token, kind)?);
            }
            quoted if quoted.is_quoted() => {
                parser.advance();
                for word in token.unquoted().split_whitespace() {
                    values.push(extended_word(word, kind, token.span)?);
                }
            }
            _ => break,
        }
    }

    match values.len() {
        0 => Err(mismatch(parser, EXTENDED_EXPECTED)),
        1 => Ok(values.remove(0)),
        _ => Ok(Value::List(values)),
    }
}

/// `IP` already consumed; expects `:` then the assigned number
fn ip_administered(
    parser: &mut dyn Parser<'_>,
    address: Token<'_>,
    kind: ExtendedCommunityKind,
) -> SyntaxResult<Value> {
    let ip: Ipv4Addr = address.text.parse().map_err(|_| {
        SyntaxError::invalid_value(address.text, "not a valid IPv4 address", address.span)
    })?;
    if !parser.check(TokenKind::Colon) {
        return Err(mismatch(parser, "':'"));
    }
    parser.advance();

    let assigned = match parser.current_token() {
        Some(token) if token.kind == TokenKind::DecimalNumber => {
            parser.advance();
            (decimal(&token)?, token.span)
        }
        _ => return Err(mismatch(parser, "an assigned number")),
    };
    extended(kind, Administrator::Ip(ip), assigned.0, address.span.to(assigned.1))
}

fn extended_word(text: &str, kind: ExtendedCommunityKind, span: Span) -> SyntaxResult<Value> {
    let (administrator, assigned) = text
        .rsplit_once(':')
        .ok_or_else(|| SyntaxError::invalid_value(text, "expected ASN:NN or IP:NN", span))?;
    let assigned: u64 = assigned
        .parse()
        .map_err(|_| SyntaxError::invalid_value(text, "assigned number is not a decimal", span))?;

    let administrator = if administrator.contains('.') {
        administrator
            .parse::<Ipv4Addr>()
            .map(Administrator::Ip)
            .map_err(|_| SyntaxError::invalid_value(text, "not a valid IPv4 administrator", span))?
    } else {
        administrator
            .parse::<u32>()
            .map(Administrator::As)
            .map_err(|_| SyntaxError::invalid_value(text, "AS numbers must fit in 32 bits", span))?
    };

    extended(kind, administrator, assigned, span)
}

fn extended(
    kind: ExtendedCommunityKind,
    administrator: Administrator,
    assigned: u64,
    span: Span,
) -> SyntaxResult<Value> {
    let assigned = u32::try_from(assigned).map_err(|_| {
        SyntaxError::invalid_value(&assigned.to_string(), "assigned number exceeds 32 bits", span)
    })?;
    ExtendedCommunity::new(kind, administrator, assigned)
        .map(Value::ExtendedCommunity)
        .map_err(|reason| {
            SyntaxError::invalid_value(&format!("{}:{}", administrator, assigned), &reason, span)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use crate::syntax::StatementParser;
    use assert_matches::assert_matches;

    /// Tokenize `prefix rest`, skip the prefix keyword, run `build`
    fn with_parser<T>(
        source: &str,
        build: impl FnOnce(&mut StatementParser<'_>) -> SyntaxResult<T>,
    ) -> SyntaxResult<T> {
        let output = tokenize(source).unwrap();
        let mut parser = StatementParser::new(output.tokens);
        Parser::advance(&mut parser);
        build(&mut parser)
    }

    fn community(source: &str) -> SyntaxResult<Value> {
        with_parser(source, |p| parse_set_community(p))
    }

    fn rt(source: &str) -> SyntaxResult<Value> {
        with_parser(source, |p| {
            parse_extended_community(p, ExtendedCommunityKind::RouteTarget)
        })
    }

    #[test]
    fn test_standard_and_additive() {
        assert_eq!(
            community("community 64512:100 no-export additive\n"),
            Ok(Value::List(vec![
                Value::Community(StandardCommunity::new(64512, 100)),
                Value::Keyword(TokenKind::NoExport),
                Value::Keyword(TokenKind::Additive),
            ]))
        );
    }

    #[test]
    fn test_none_and_quoted() {
        assert_eq!(
            community("community none"),
            Ok(Value::Keyword(TokenKind::NoneKeyword))
        );
        assert_eq!(
            community("community \"64512:1 local-AS\""),
            Ok(Value::List(vec![
                Value::Community(StandardCommunity::new(64512, 1)),
                Value::Keyword(TokenKind::LocalAsCommunity),
            ]))
        );
    }

    #[test]
    fn test_community_errors() {
        assert_matches!(
            community("community 70000:1"),
            Err(SyntaxError::InvalidValue { .. })
        );
        assert_matches!(
            community("community additive"),
            Err(SyntaxError::UnexpectedToken { .. })
        );
        assert_matches!(
            community("community\n"),
            Err(SyntaxError::UnexpectedEndOfLine { .. })
        );
    }

    #[test]
    fn test_extended_forms() {
        assert_eq!(
            rt("extcommunity-rt 65000:100"),
            Ok(Value::ExtendedCommunity(
                ExtendedCommunity::new(
                    ExtendedCommunityKind::RouteTarget,
                    Administrator::As(65000),
                    100
                )
                .unwrap()
            ))
        );
        assert_matches!(
            rt("extcommunity-rt 10.1.1.1:7"),
            Ok(Value::ExtendedCommunity(ExtendedCommunity {
                administrator: Administrator::Ip(_),
                assigned: 7,
                ..
            }))
        );
        assert_matches!(rt("extcommunity-rt 65000:1 65000:2"), Ok(Value::List(v)) if v.len() == 2);
        assert_matches!(
            rt("extcommunity-rt 10.1.1.1:70000"),
            Err(SyntaxError::InvalidValue { .. })
        );
        assert_matches!(rt("extcommunity-rt"), Err(SyntaxError::UnexpectedEndOfLine { .. }));
    }
}
