//! Route-map `match policy` boolean expressions

use super::nodes::{PathSegment, Payload, StatementNode};
use super::value::Value;
use crate::tokens::TokenKind;
use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// `&&` binds tighter than `||`; both are left-associative
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PolicyExpr {
    And(Box<PolicyExpr>, Box<PolicyExpr>),
    Or(Box<PolicyExpr>, Box<PolicyExpr>),
    Leaf(String),
}

impl PolicyExpr {
    pub fn leaf(name: impl Into<String>) -> Self {
        PolicyExpr::Leaf(name.into())
    }

    pub fn and(left: PolicyExpr, right: PolicyExpr) -> Self {
        PolicyExpr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: PolicyExpr, right: PolicyExpr) -> Self {
        PolicyExpr::Or(Box::new(left), Box::new(right))
    }

    pub fn depth(&self) -> usize {
        match self {
            PolicyExpr::Leaf(_) => 1,
            PolicyExpr::And(l, r) | PolicyExpr::Or(l, r) => 1 + l.depth().max(r.depth()),
        }
    }

    /// Referenced policy names, left to right
    pub fn leaves(&self) -> Vec<&str> {
        match self {
            PolicyExpr::Leaf(name) => vec![name.as_str()],
            PolicyExpr::And(l, r) | PolicyExpr::Or(l, r) => {
                let mut names = l.leaves();
                names.extend(r.leaves());
                names
            }
        }
    }

    /// Lower into statement nodes: operators become `[&&]` or `[||]` blocks
    /// holding both operands, leaves become `[policy]` text scalars
    pub fn lower(&self, span: Span) -> StatementNode {
        match self {
            PolicyExpr::Leaf(name) => StatementNode::scalar(
                vec![PathSegment::Keyword(TokenKind::Policy)],
                Value::text(name.clone()),
                span,
            ),
            PolicyExpr::And(l, r) => Self::lower_binary(TokenKind::DoubleAmpersand, l, r, span),
            PolicyExpr::Or(l, r) => Self::lower_binary(TokenKind::DoublePipe, l, r, span),
        }
    }

    fn lower_binary(op: TokenKind, left: &PolicyExpr, right: &PolicyExpr, span: Span) -> StatementNode {
        StatementNode::new(
            vec![PathSegment::Keyword(op)],
            Payload::Block(vec![left.lower(span), right.lower(span)]),
            span,
        )
    }

    /// Payload for the statement ending in `policy`: a bare name stays a
    /// scalar, anything else is a one-element block
    pub fn into_payload(self, span: Span) -> Payload {
        match self {
            PolicyExpr::Leaf(name) => Payload::Scalar(Value::Text(name)),
            expr => Payload::Block(vec![expr.lower(span)]),
        }
    }
}

impl fmt::Display for PolicyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyExpr::Leaf(name) => write!(f, "{}", name),
            PolicyExpr::And(l, r) => write!(f, "({} && {})", l, r),
            PolicyExpr::Or(l, r) => write!(f, "({} || {})", l, r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowering_shape() {
        let expr = PolicyExpr::and(
            PolicyExpr::or(PolicyExpr::leaf("A"), PolicyExpr::leaf("B")),
            PolicyExpr::leaf("C"),
        );
        assert_eq!(expr.to_string(), "((A || B) && C)");
        assert_eq!(expr.depth(), 3);
        assert_eq!(expr.leaves(), vec!["A", "B", "C"]);

        let node = expr.lower(Span::dummy());
        assert_eq!(node.path, vec![PathSegment::Keyword(TokenKind::DoubleAmpersand)]);
        let children = node.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].path, vec![PathSegment::Keyword(TokenKind::DoublePipe)]);
        assert_eq!(children[1].value(), Some(&Value::text("C")));
    }

    #[test]
    fn test_leaf_payload_is_scalar() {
        let payload = PolicyExpr::leaf("ONLY").into_payload(Span::dummy());
        assert_eq!(payload, Payload::Scalar(Value::text("ONLY")));
    }
}
