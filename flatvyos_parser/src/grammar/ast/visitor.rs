//! Depth-first traversal over statement trees

use super::nodes::StatementNode;

/// Callbacks for [`walk`]; returning an error stops the traversal
pub trait StatementVisitor {
    type Error;

    fn enter(&mut self, _node: &StatementNode) -> Result<(), Self::Error> {
        Ok(())
    }

    fn exit(&mut self, _node: &StatementNode) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Visit every node in document order, calling `enter` before a node's
/// children and `exit` after them
pub fn walk<V: StatementVisitor + ?Sized>(
    statements: &[StatementNode],
    visitor: &mut V,
) -> Result<(), V::Error> {
    for node in statements {
        visitor.enter(node)?;
        walk(node.children(), visitor)?;
        visitor.exit(node)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::{nest_statements, PathSegment};
    use crate::tokens::TokenKind;
    use crate::utils::Span;

    struct Recorder {
        events: Vec<String>,
        stop_at: Option<String>,
    }

    impl StatementVisitor for Recorder {
        type Error = String;

        fn enter(&mut self, node: &StatementNode) -> Result<(), String> {
            let path = node.path_string();
            if self.stop_at.as_deref() == Some(path.as_str()) {
                return Err(path);
            }
            self.events.push(format!("enter {}", path));
            Ok(())
        }

        fn exit(&mut self, node: &StatementNode) -> Result<(), String> {
            self.events.push(format!("exit {}", node.path_string()));
            Ok(())
        }
    }

    fn sample() -> Vec<StatementNode> {
        let kw = PathSegment::Keyword;
        nest_statements(vec![
            StatementNode::null(vec![kw(TokenKind::System), kw(TokenKind::HostName)], Span::dummy()),
            StatementNode::null(vec![kw(TokenKind::System), kw(TokenKind::TimeZone)], Span::dummy()),
        ])
    }

    #[test]
    fn test_walk_order() {
        let mut recorder = Recorder {
            events: Vec::new(),
            stop_at: None,
        };
        walk(&sample(), &mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec![
                "enter system",
                "enter host-name",
                "exit host-name",
                "enter time-zone",
                "exit time-zone",
                "exit system",
            ]
        );
    }

    #[test]
    fn test_walk_stops_on_error() {
        let mut recorder = Recorder {
            events: Vec::new(),
            stop_at: Some("time-zone".to_string()),
        };
        assert_eq!(walk(&sample(), &mut recorder), Err("time-zone".to_string()));
        assert_eq!(recorder.events.len(), 3);
    }
}
