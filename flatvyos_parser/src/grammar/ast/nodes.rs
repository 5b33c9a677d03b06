//! Statement tree nodes
//!
//! Each `set` line becomes one [`StatementNode`] whose path lists the keywords
//! and names after `set`. Lines that share a path prefix can be folded into
//! blocks with [`nest_statements`].

use super::value::Value;
use crate::tokens::TokenKind;
use crate::utils::Span;
use serde::Serialize;
use std::fmt;

/// One element of a statement path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum PathSegment {
    Keyword(TokenKind),
    /// A value used as a path element, such as `eth0` or `10.0.0.1`
    Name(String),
}

impl PathSegment {
    pub fn name(name: impl Into<String>) -> Self {
        PathSegment::Name(name.into())
    }

    pub fn is_keyword(&self, kind: TokenKind) -> bool {
        matches!(self, PathSegment::Keyword(k) if *k == kind)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Keyword(kind) => write!(f, "{}", kind.as_str()),
            PathSegment::Name(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Payload {
    Scalar(Value),
    Block(Vec<StatementNode>),
    /// Nothing modelled after the path
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementNode {
    /// Never empty
    pub path: Vec<PathSegment>,
    pub payload: Payload,
    pub span: Span,
}

impl StatementNode {
    pub fn new(path: Vec<PathSegment>, payload: Payload, span: Span) -> Self {
        debug_assert!(!path.is_empty(), "statement path must not be empty");
        Self {
            path,
            payload,
            span,
        }
    }

    pub fn scalar(path: Vec<PathSegment>, value: Value, span: Span) -> Self {
        Self::new(path, Payload::Scalar(value), span)
    }

    pub fn null(path: Vec<PathSegment>, span: Span) -> Self {
        Self::new(path, Payload::Null, span)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.payload, Payload::Null)
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn children(&self) -> &[StatementNode] {
        match &self.payload {
            Payload::Block(children) => children,
            _ => &[],
        }
    }

    pub fn starts_with(&self, prefix: &[PathSegment]) -> bool {
        self.path.starts_with(prefix)
    }

    /// Space-separated path, as written in the configuration
    pub fn path_string(&self) -> String {
        let parts: Vec<String> = self.path.iter().map(|s| s.to_string()).collect();
        parts.join(" ")
    }

    /// This node plus all descendants
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(StatementNode::node_count)
            .sum::<usize>()
    }
}

impl fmt::Display for StatementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Scalar(value) => write!(f, "{} {}", self.path_string(), value),
            Payload::Block(children) => {
                write!(f, "{} {{ {} children }}", self.path_string(), children.len())
            }
            Payload::Null => write!(f, "{}", self.path_string()),
        }
    }
}

fn common_prefix_len(a: &[PathSegment], b: &[PathSegment]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Fold statements sharing a path prefix into `Block` nodes.
///
/// Statements are grouped by first segment in order of first appearance. A
/// group of two or more becomes one block whose path is the longest prefix
/// shared by every member, leaving each child at least one segment. Members
/// whose whole path is that single first segment stay separate.
pub fn nest_statements(statements: Vec<StatementNode>) -> Vec<StatementNode> {
    let mut groups: Vec<Vec<StatementNode>> = Vec::new();
    for statement in statements {
        match groups
            .iter_mut()
            .find(|group| group[0].path.first() == statement.path.first())
        {
            Some(group) => group.push(statement),
            None => groups.push(vec![statement]),
        }
    }

    let mut nested = Vec::new();
    for group in groups {
        if group.len() == 1 {
            nested.extend(group);
            continue;
        }

        let (singles, members): (Vec<_>, Vec<_>) =
            group.into_iter().partition(|s| s.path.len() == 1);
        nested.extend(singles);

        if members.len() < 2 {
            nested.extend(members);
            continue;
        }

        let shared = members
            .iter()
            .skip(1)
            .map(|s| common_prefix_len(&members[0].path, &s.path))
            .min()
            .unwrap_or(0);
        let shortest = members.iter().map(|s| s.path.len()).min().unwrap_or(1);
        let prefix_len = shared.min(shortest - 1);

        let prefix = members[0].path[..prefix_len].to_vec();
        let span = members
            .iter()
            .skip(1)
            .fold(members[0].span, |span, s| span.to(s.span));
        let children = members
            .into_iter()
            .map(|mut s| {
                s.path.drain(..prefix_len);
                s
            })
            .collect();

        nested.push(StatementNode::new(
            prefix,
            Payload::Block(nest_statements(children)),
            span,
        ));
    }

    nested
}
