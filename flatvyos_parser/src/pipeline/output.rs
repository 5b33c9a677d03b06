use crate::grammar::ast::nodes::{nest_statements, StatementNode};
use crate::grammar::ast::visitor::{walk, StatementVisitor};
use crate::lexical::LexicalMetrics;
use crate::syntax::Diagnostic;
use crate::utils::SourceMap;
use serde::Serialize;
use std::time::Duration;

/// Everything produced by parsing one document
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput {
    pub statements: Vec<StatementNode>,
    /// Lexical warnings first, then parser diagnostics in source order
    pub diagnostics: Vec<Diagnostic>,
    pub token_count: usize,
    pub trivia_count: usize,
    pub metrics: LexicalMetrics,
    #[serde(skip)]
    pub duration: Duration,
}

impl ParseOutput {
    /// No errors or warnings; informational diagnostics are allowed
    pub fn is_clean(&self) -> bool {
        self.diagnostics.iter().all(Diagnostic::is_info)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    pub fn infos(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_info())
    }

    /// Statements folded into blocks by shared path prefix
    pub fn nested(&self) -> Vec<StatementNode> {
        nest_statements(self.statements.clone())
    }

    pub fn walk<V: StatementVisitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        walk(&self.statements, visitor)
    }

    /// Render every diagnostic with a caret snippet of `source`
    pub fn render_diagnostics(&self, source: &str) -> String {
        let source_map = SourceMap::new(source);
        self.diagnostics
            .iter()
            .map(|diagnostic| {
                let label = format!("{}[{}]", diagnostic.severity, diagnostic.code);
                source_map.format_error(&label, &diagnostic.span, &diagnostic.message)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
