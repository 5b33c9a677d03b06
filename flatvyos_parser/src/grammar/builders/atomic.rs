//! Single-token builders: the parser trait and typed value conversion
//!
//! Every value slot in the grammar names a [`ValueClass`]. The builders here
//! check the current token against that class, consume it, and convert its
//! text into a range-checked [`Value`].

use crate::grammar::ast::nodes::PathSegment;
use crate::grammar::ast::value::Value;
use crate::grammar::table::{Scope, ValueClass};
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::{Token, TokenKind};
use crate::utils::Span;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Navigation and bookkeeping the builders need from the statement parser
pub trait Parser<'src> {
    // === NAVIGATION ===
    fn current_token(&self) -> Option<Token<'src>>;
    fn advance(&mut self) -> Option<Token<'src>>;

    /// Span of the current token, or just past the last consumed one
    fn current_span(&self) -> Span;

    /// Span of the last consumed token
    fn previous_span(&self) -> Span;

    // === CONTEXT ===
    fn enter_scope(&mut self, scope: Scope) -> SyntaxResult<()>;
    fn exit_scope(&mut self);

    /// Record a path the grammar does not model
    fn report_unknown_path(&mut self, path: &[PathSegment], span: Span);

    fn at_line_end(&self) -> bool {
        matches!(
            self.current_token().map(|token| token.kind),
            None | Some(TokenKind::Newline)
        )
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_token().map(|token| token.kind) == Some(kind)
    }
}

/// Error for a token that does not fit `expected`, or for a missing token
pub fn mismatch(parser: &dyn Parser<'_>, expected: &str) -> SyntaxError {
    match parser.current_token() {
        Some(token) if !token.is_newline() => {
            SyntaxError::unexpected_token(expected, &token.to_string(), token.span)
        }
        _ => SyntaxError::unexpected_end_of_line(expected, parser.current_span()),
    }
}

/// Consume the current token if it belongs to `class`
pub fn expect_class<'src>(
    parser: &mut dyn Parser<'src>,
    class: ValueClass,
) -> SyntaxResult<Token<'src>> {
    match parser.current_token() {
        Some(token) if class.accepts(token.kind) => {
            parser.advance();
            Ok(token)
        }
        _ => Err(mismatch(parser, &class.describe())),
    }
}

/// Consume one token of `class` and convert it
pub fn parse_value(parser: &mut dyn Parser<'_>, class: ValueClass) -> SyntaxResult<Value> {
    let token = expect_class(parser, class)?;
    convert_token(&token, class)
}

/// Consume one token of `class` as a path name; the value is range-checked
/// but the segment keeps the written text
pub fn parse_name(parser: &mut dyn Parser<'_>, class: ValueClass) -> SyntaxResult<String> {
    let token = expect_class(parser, class)?;
    convert_token(&token, class)?;
    Ok(token.unquoted().to_string())
}

pub fn convert_token(token: &Token<'_>, class: ValueClass) -> SyntaxResult<Value> {
    match class {
        ValueClass::Identifier | ValueClass::Text | ValueClass::Regex => {
            Ok(Value::text(token.unquoted()))
        }
        ValueClass::Description => Ok(Value::text(strip_matching_quotes(token.text))),
        ValueClass::AsNumber => as_number(token),
        ValueClass::Speed => speed(token),
        ValueClass::OneOf(_) => Ok(Value::Keyword(token.kind)),
        _ => typed_literal(token),
    }
}

/// `"text"` or `'text'` loses its quotes; anything else is kept as written
pub fn strip_matching_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&open), Some(&close))
            if bytes.len() >= 2 && open == close && (open == b'"' || open == b'\'') =>
        {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}

fn typed_literal(token: &Token<'_>) -> SyntaxResult<Value> {
    match token.kind {
        TokenKind::DecimalNumber => decimal(token).map(Value::Decimal),
        TokenKind::FloatNumber => token
            .text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid(token, "not a valid number")),
        TokenKind::IpAddress => ipv4(token, token.text).map(Value::Ipv4),
        TokenKind::IpPrefix => {
            let (addr, len) = split_prefix(token, 32)?;
            Ok(Value::Ipv4Prefix(ipv4(token, addr)?, len))
        }
        TokenKind::Ipv6Address => ipv6(token, token.text).map(Value::Ipv6),
        TokenKind::Ipv6Prefix => {
            let (addr, len) = split_prefix(token, 128)?;
            Ok(Value::Ipv6Prefix(ipv6(token, addr)?, len))
        }
        TokenKind::MacAddress => Ok(Value::Mac(token.text.to_string())),
        TokenKind::IsoAddress => Ok(Value::Iso(token.text.to_string())),
        TokenKind::SpeedValue => speed(token),
        TokenKind::DescriptionText => Ok(Value::text(strip_matching_quotes(token.text))),
        kind if kind.is_keyword() => Ok(Value::Keyword(kind)),
        _ => Ok(Value::text(token.unquoted())),
    }
}

fn invalid(token: &Token<'_>, reason: &str) -> SyntaxError {
    SyntaxError::invalid_value(token.text, reason, token.span)
}

pub(crate) fn decimal(token: &Token<'_>) -> SyntaxResult<u64> {
    token
        .text
        .parse::<u64>()
        .map_err(|_| invalid(token, "does not fit in 64 bits"))
}

fn as_number(token: &Token<'_>) -> SyntaxResult<Value> {
    token
        .text
        .parse::<u32>()
        .map(|asn| Value::Decimal(u64::from(asn)))
        .map_err(|_| invalid(token, "AS numbers must fit in 32 bits"))
}

fn ipv4(token: &Token<'_>, text: &str) -> SyntaxResult<Ipv4Addr> {
    text.parse()
        .map_err(|_| invalid(token, "not a valid IPv4 address"))
}

fn ipv6(token: &Token<'_>, text: &str) -> SyntaxResult<Ipv6Addr> {
    text.parse()
        .map_err(|_| invalid(token, "not a valid IPv6 address"))
}

fn split_prefix<'t>(token: &Token<'t>, max_len: u8) -> SyntaxResult<(&'t str, u8)> {
    let (addr, len) = token
        .text
        .split_once('/')
        .ok_or_else(|| invalid(token, "missing prefix length"))?;
    let len: u8 = len
        .parse()
        .map_err(|_| invalid(token, "prefix length is not a number"))?;
    if len > max_len {
        return Err(invalid(
            token,
            &format!("prefix length exceeds {}", max_len),
        ));
    }
    Ok((addr, len))
}

/// `auto`, bare Mbit/s, or a `g`/`m` suffixed rate, normalized to Mbit/s
fn speed(token: &Token<'_>) -> SyntaxResult<Value> {
    match token.kind {
        TokenKind::Auto => Ok(Value::Keyword(TokenKind::Auto)),
        TokenKind::DecimalNumber => decimal(token).map(Value::Speed),
        TokenKind::SpeedValue => {
            let split = token.text.len().saturating_sub(1);
            let (digits, unit) = token.text.split_at(split);
            let amount: u64 = digits
                .parse()
                .map_err(|_| invalid(token, "speed does not fit in 64 bits"))?;
            let multiplier = match unit {
                "g" | "G" => 1000,
                "m" | "M" => 1,
                _ => return Err(invalid(token, "unknown speed unit")),
            };
            amount
                .checked_mul(multiplier)
                .map(Value::Speed)
                .ok_or_else(|| invalid(token, "speed does not fit in 64 bits"))
        }
        _ => Err(invalid(token, "not a link speed")),
    }
}
