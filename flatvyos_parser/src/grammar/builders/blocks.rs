//! Table-driven `set` path builder
//!
//! Starting from a scope, each keyword is looked up in the grammar table and
//! its production decides what follows. The builder appends to the statement
//! path as it goes and returns the payload that ends the statement. Leftover
//! tokens are left for the caller to report.

use crate::grammar::ast::nodes::{PathSegment, Payload};
use crate::grammar::ast::value::{ExtendedCommunityKind, Value};
use crate::grammar::builders::atomic::{parse_name, parse_value, Parser};
use crate::grammar::builders::communities::{parse_extended_community, parse_set_community};
use crate::grammar::builders::expressions::parse_policy_expression;
use crate::grammar::builders::helpers::{joined_text, line_segments, segment_for, take_line};
use crate::grammar::table::{self, Handler, Production, Scope, ValueClass};
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::Token;

/// Parse the remainder of a statement in `scope`, extending `path`
pub fn parse_tail(
    parser: &mut dyn Parser<'_>,
    scope: Scope,
    path: &mut Vec<PathSegment>,
) -> SyntaxResult<Payload> {
    parser.enter_scope(scope)?;
    let payload = parse_scope(parser, scope, path);
    parser.exit_scope();
    payload
}

fn parse_scope(
    parser: &mut dyn Parser<'_>,
    scope: Scope,
    path: &mut Vec<PathSegment>,
) -> SyntaxResult<Payload> {
    let token = match parser.current_token() {
        Some(token) if !token.is_newline() => token,
        // Nothing after a branch or entity name
        _ => return Ok(Payload::Null),
    };

    let production = match table::lookup(scope, token.kind) {
        Some(production) => production,
        None => {
            absorb_unknown(parser, path);
            return Ok(Payload::Null);
        }
    };

    parser.advance();
    path.push(PathSegment::Keyword(token.kind));

    match production {
        Production::Branch(next) => parse_tail(parser, next, path),
        Production::Entity(class, next) => {
            let name = parse_name(parser, class)?;
            path.push(PathSegment::Name(name));
            parse_tail(parser, next, path)
        }
        Production::Terminal(ValueClass::Regex) => parse_regex(parser).map(Payload::Scalar),
        Production::Terminal(class) => parse_value(parser, class).map(Payload::Scalar),
        Production::Flag => Ok(Payload::Scalar(Value::Flag)),
        Production::Ignored => {
            path.extend(line_segments(parser));
            Ok(Payload::Null)
        }
        Production::Custom(handler) => parse_custom(parser, handler, token),
    }
}

/// No production for the current token: the rest of the line becomes path
fn absorb_unknown(parser: &mut dyn Parser<'_>, path: &mut Vec<PathSegment>) {
    let start = parser.current_span();
    let tokens = take_line(parser);
    let span = tokens.last().map_or(start, |last| start.to(last.span));
    path.extend(tokens.iter().map(segment_for));
    parser.report_unknown_path(path, span);
}

fn parse_regex(parser: &mut dyn Parser<'_>) -> SyntaxResult<Value> {
    let tokens = take_line(parser);
    match tokens.as_slice() {
        [] => Err(SyntaxError::unexpected_end_of_line(
            &ValueClass::Regex.describe(),
            parser.current_span(),
        )),
        [single] if single.kind.is_quoted() => Ok(Value::text(single.unquoted())),
        tokens => Ok(Value::Text(joined_text(tokens))),
    }
}

fn parse_custom(
    parser: &mut dyn Parser<'_>,
    handler: Handler,
    keyword: Token<'_>,
) -> SyntaxResult<Payload> {
    match handler {
        Handler::PolicyExpression => {
            let start = parser.current_span();
            let expr = parse_policy_expression(parser)?;
            Ok(expr.into_payload(start.to(parser.previous_span())))
        }
        Handler::Community => parse_set_community(parser).map(Payload::Scalar),
        Handler::ExtendedCommunity => {
            let kind = ExtendedCommunityKind::from_keyword(keyword.kind).ok_or_else(|| {
                SyntaxError::internal_parser_error(&format!(
                    "extended community handler bound to {}",
                    keyword.kind.describe()
                ))
            })?;
            parse_extended_community(parser, kind).map(Payload::Scalar)
        }
    }
}
