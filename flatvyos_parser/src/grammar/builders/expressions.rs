//! Policy expression builder
//!
//! ```text
//! expr := conj ('||' conj)*
//! conj := atom ('&&' atom)*
//! atom := '(' expr ')' | name
//! ```
//!
//! Parenthesized groups count toward the nesting limit; the limit is checked
//! before recursing so deeply nested input cannot exhaust the stack.

use crate::config::compile_time::syntax::MAX_EXPRESSION_DEPTH;
use crate::grammar::ast::expression::PolicyExpr;
use crate::grammar::builders::atomic::{mismatch, Parser};
use crate::grammar::table::ValueClass;
use crate::syntax::error::{SyntaxError, SyntaxResult};
use crate::tokens::TokenKind;

/// Parse a full policy expression; the caller checks for leftover tokens
pub fn parse_policy_expression(parser: &mut dyn Parser<'_>) -> SyntaxResult<PolicyExpr> {
    parse_policy_expression_with_limit(parser, MAX_EXPRESSION_DEPTH)
}

pub fn parse_policy_expression_with_limit(
    parser: &mut dyn Parser<'_>,
    max_depth: usize,
) -> SyntaxResult<PolicyExpr> {
    parse_disjunction(parser, 1, max_depth)
}

fn parse_disjunction(
    parser: &mut dyn Parser<'_>,
    depth: usize,
    max_depth: usize,
) -> SyntaxResult<PolicyExpr> {
    let mut expr = parse_conjunction(parser, depth, max_depth)?;
    while parser.check(TokenKind::DoublePipe) {
        parser.advance();
        let right = parse_conjunction(parser, depth, max_depth)?;
        expr = PolicyExpr::or(expr, right);
    }
    Ok(expr)
}

fn parse_conjunction(
    parser: &mut dyn Parser<'_>,
    depth: usize,
    max_depth: usize,
) -> SyntaxResult<PolicyExpr> {
    let mut expr = parse_atom(parser, depth, max_depth)?;
    while parser.check(TokenKind::DoubleAmpersand) {
        parser.advance();
        let right = parse_atom(parser, depth, max_depth)?;
        expr = PolicyExpr::and(expr, right);
    }
    Ok(expr)
}

fn parse_atom(
    parser: &mut dyn Parser<'_>,
    depth: usize,
    max_depth: usize,
) -> SyntaxResult<PolicyExpr> {
    if parser.check(TokenKind::OpenParen) {
        if depth >= max_depth {
            return Err(SyntaxError::ExpressionTooDeep {
                max: max_depth,
                span: parser.current_span(),
            });
        }
        parser.advance();
        let inner = parse_disjunction(parser, depth + 1, max_depth)?;
        if !parser.check(TokenKind::CloseParen) {
            return Err(mismatch(parser, "')'"));
        }
        parser.advance();
        return Ok(inner);
    }

    match parser.current_token() {
        Some(token) if ValueClass::Identifier.accepts(token.kind) => {
            parser.advance();
            Ok(PolicyExpr::leaf(token.unquoted()))
        }
        _ => Err(mismatch(parser, "a policy name or '('")),
    }
}
