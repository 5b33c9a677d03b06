//! Line-oriented statement parser
//!
//! Each content line is one statement. `set` lines are handed to the
//! table-driven builders; the parser owns the token cursor, the scope stack,
//! and the diagnostics collected while recovering from bad lines.

use crate::config::compile_time::syntax::{
    MAX_CONTEXT_STACK_DEPTH, MAX_ERROR_HISTORY, MAX_PARSE_DEPTH, MAX_RECOVERY_SCAN_TOKENS,
};
use crate::config::runtime::SyntaxPreferences;
use crate::grammar::ast::nodes::{PathSegment, StatementNode};
use crate::grammar::builders::atomic::{mismatch, Parser};
use crate::grammar::builders::blocks::parse_tail;
use crate::grammar::builders::helpers::{line_segments, segment_for, take_line};
use crate::grammar::table::Scope;
use crate::logging::codes;
use crate::syntax::error::{Diagnostic, SyntaxError, SyntaxResult};
use crate::tokens::{Token, TokenKind, TokenStream};
use crate::utils::Span;
use crate::{log_debug, log_error, log_success, log_warning};
use std::collections::VecDeque;

pub struct StatementParser<'src> {
    tokens: TokenStream<'src>,
    preferences: SyntaxPreferences,
    /// Scopes entered by the statement currently being built
    context_stack: Vec<Scope>,
    /// Most recent recoverable errors, oldest dropped first
    error_history: VecDeque<SyntaxError>,
    diagnostics: Vec<Diagnostic>,
    parse_depth: usize,
}

impl<'src> StatementParser<'src> {
    pub fn new(tokens: TokenStream<'src>) -> Self {
        Self::with_preferences(tokens, SyntaxPreferences::default())
    }

    pub fn with_preferences(tokens: TokenStream<'src>, preferences: SyntaxPreferences) -> Self {
        log_debug!("Creating statement parser",
            "content_tokens" => tokens.len(),
            "trivia_tokens" => tokens.trivia_count()
        );

        Self {
            tokens,
            preferences,
            context_stack: Vec::new(),
            error_history: VecDeque::new(),
            diagnostics: Vec::new(),
            parse_depth: 0,
        }
    }

    /// Parse every line until the input ends.
    ///
    /// Recoverable errors become diagnostics and the offending line is
    /// skipped; only internal parser errors stop the parse.
    pub fn parse_configuration(&mut self) -> SyntaxResult<Vec<StatementNode>> {
        let mut statements = Vec::new();

        while let Some(token) = self.tokens.current() {
            if token.is_newline() {
                self.tokens.advance();
                continue;
            }

            match self.parse_line(token) {
                Ok(statement) => statements.push(statement),
                Err(error) if error.requires_halt() => {
                    log_error!(error.error_code(), "Statement parsing halted",
                        "error" => error,
                        "statements" => statements.len()
                    );
                    return Err(error);
                }
                Err(error) => {
                    self.record_error(error);
                    self.recover_to_line_end();
                }
            }
            self.reset_context();
        }

        log_success!(
            codes::success::STATEMENT_TREE_COMPLETE,
            "Statement parsing completed",
            "statements" => statements.len(),
            "diagnostics" => self.diagnostics.len()
        );

        Ok(statements)
    }

    fn parse_line(&mut self, first: Token<'src>) -> SyntaxResult<StatementNode> {
        match first.kind {
            TokenKind::Set => self.parse_set(first),
            kind if kind.is_ignored_command() => {
                self.tokens.advance();
                let mut path = vec![PathSegment::Keyword(kind)];
                path.extend(line_segments(self));
                Ok(StatementNode::null(path, first.span.to(self.previous_span())))
            }
            _ if self.preferences.absorb_unknown_top_level => Ok(self.absorb_top_level(first)),
            _ => Err(SyntaxError::UnknownTopLevel {
                found: first.to_string(),
                span: first.span,
            }),
        }
    }

    fn parse_set(&mut self, set: Token<'src>) -> SyntaxResult<StatementNode> {
        self.tokens.advance();
        if self.at_line_end() {
            return Err(SyntaxError::unexpected_end_of_line(
                "a configuration path",
                self.current_span(),
            ));
        }

        let mut path = Vec::new();
        let payload = parse_tail(self, Scope::Root, &mut path)?;

        if !self.at_line_end() {
            return Err(mismatch(self, "end of line"));
        }
        if path.is_empty() {
            return Err(SyntaxError::internal_parser_error(
                "set statement produced an empty path",
            ));
        }

        let node = StatementNode::new(path, payload, set.span.to(self.previous_span()));
        log_debug!("Parsed statement", "path" => node.path_string());
        Ok(node)
    }

    /// Unrecognized leading token kept as a null statement
    fn absorb_top_level(&mut self, first: Token<'src>) -> StatementNode {
        let tokens = take_line(self);
        let span = tokens.last().map_or(first.span, |last| first.span.to(last.span));
        let path: Vec<PathSegment> = tokens.iter().map(segment_for).collect();

        let message = format!("absorbed unrecognized command {}", first);
        log_warning!(code = codes::syntax::ABSORBED_TOP_LEVEL, &message,
            "line" => span.start.line
        );
        self.diagnostics.push(Diagnostic::warning(
            codes::syntax::ABSORBED_TOP_LEVEL,
            message,
            span,
        ));

        StatementNode::null(path, span)
    }

    // === ERROR RECOVERY ===

    fn record_error(&mut self, error: SyntaxError) {
        let diagnostic = Diagnostic::from_syntax_error(&error, self.current_span());
        log_error!(error.error_code(), &diagnostic.message,
            span = diagnostic.span,
            "line" => diagnostic.line,
            "column" => diagnostic.column
        );
        self.diagnostics.push(diagnostic);

        if self.error_history.len() >= MAX_ERROR_HISTORY {
            self.error_history.pop_front();
        }
        self.error_history.push_back(error);
    }

    /// Discard tokens up to the next newline, scanning a bounded number of
    /// tokens
    fn recover_to_line_end(&mut self) {
        let start = self.current_span();
        let mut skipped = 0;

        while !self.at_line_end() {
            if skipped >= MAX_RECOVERY_SCAN_TOKENS {
                let span = start.to(self.previous_span());
                log_warning!(code = codes::syntax::RECOVERY_SCAN_LIMIT,
                    "Recovery scan limit reached before end of line",
                    "tokens_scanned" => skipped
                );
                self.diagnostics.push(Diagnostic::warning(
                    codes::syntax::RECOVERY_SCAN_LIMIT,
                    format!(
                        "stopped skipping after {} tokens without reaching end of line",
                        skipped
                    ),
                    span,
                ));
                return;
            }
            self.tokens.advance();
            skipped += 1;
        }

        if self.preferences.log_recovery_details {
            log_debug!("Recovered at end of line",
                "skipped_tokens" => skipped,
                "line" => start.start.line
            );
        }
    }

    fn reset_context(&mut self) {
        if !self.context_stack.is_empty() || self.parse_depth != 0 {
            log_debug!("Clearing unbalanced scope stack",
                "depth" => self.parse_depth,
                "scopes" => self.current_context()
            );
        }
        self.context_stack.clear();
        self.parse_depth = 0;
    }

    // === ACCESSORS ===

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn error_history(&self) -> &VecDeque<SyntaxError> {
        &self.error_history
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn trivia_count(&self) -> usize {
        self.tokens.trivia_count()
    }

    /// Scope chain of the statement being built, outermost first
    pub fn current_context(&self) -> String {
        self.context_stack
            .iter()
            .map(|scope| scope.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl<'src> Parser<'src> for StatementParser<'src> {
    fn current_token(&self) -> Option<Token<'src>> {
        self.tokens.current()
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        self.tokens.advance()
    }

    fn current_span(&self) -> Span {
        match (self.tokens.current_span(), self.tokens.previous_span()) {
            (Some(span), _) => span,
            (None, Some(previous)) => Span::new(previous.end, previous.end),
            (None, None) => Span::dummy(),
        }
    }

    fn previous_span(&self) -> Span {
        self.tokens
            .previous_span()
            .unwrap_or_else(|| self.current_span())
    }

    fn enter_scope(&mut self, scope: Scope) -> SyntaxResult<()> {
        if self.parse_depth >= MAX_PARSE_DEPTH {
            return Err(SyntaxError::MaxRecursionDepth {
                max: MAX_PARSE_DEPTH,
                span: self.current_span(),
            });
        }
        if self.context_stack.len() >= MAX_CONTEXT_STACK_DEPTH {
            return Err(SyntaxError::MaxRecursionDepth {
                max: MAX_CONTEXT_STACK_DEPTH,
                span: self.current_span(),
            });
        }

        self.parse_depth += 1;
        self.context_stack.push(scope);
        Ok(())
    }

    fn exit_scope(&mut self) {
        self.context_stack.pop();
        self.parse_depth = self.parse_depth.saturating_sub(1);
    }

    fn report_unknown_path(&mut self, path: &[PathSegment], span: Span) {
        let rendered = path
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        log_debug!("Path not modelled by grammar",
            "path" => rendered,
            "scope" => self.current_context()
        );

        if self.preferences.report_unknown_paths {
            self.diagnostics.push(Diagnostic::info(
                codes::syntax::UNKNOWN_PATH,
                format!("path '{}' is not modelled; kept as a null statement", rendered),
                span,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::value::Value;
    use crate::lexical::tokenize;
    use crate::syntax::error::DiagnosticSeverity;
    use assert_matches::assert_matches;

    fn preferences() -> SyntaxPreferences {
        SyntaxPreferences {
            report_unknown_paths: true,
            absorb_unknown_top_level: false,
            log_recovery_details: false,
        }
    }

    fn parse_with(
        source: &str,
        preferences: SyntaxPreferences,
    ) -> (Vec<StatementNode>, Vec<Diagnostic>) {
        let output = tokenize(source).unwrap();
        let mut parser = StatementParser::with_preferences(output.tokens, preferences);
        let statements = parser.parse_configuration().unwrap();
        (statements, parser.into_diagnostics())
    }

    fn parse(source: &str) -> (Vec<StatementNode>, Vec<Diagnostic>) {
        parse_with(source, preferences())
    }

    #[test]
    fn test_set_statement() {
        let (statements, diagnostics) =
            parse("set protocols bgp 65000 neighbor 10.0.0.1 remote-as 65001\n");
        assert!(diagnostics.is_empty());
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0].path,
            vec![
                PathSegment::Keyword(TokenKind::Protocols),
                PathSegment::Keyword(TokenKind::Bgp),
                PathSegment::name("65000"),
                PathSegment::Keyword(TokenKind::Neighbor),
                PathSegment::name("10.0.0.1"),
                PathSegment::Keyword(TokenKind::RemoteAs),
            ]
        );
        assert_eq!(statements[0].value(), Some(&Value::Decimal(65001)));
        assert_eq!(statements[0].span.start.offset, 0);
    }

    #[test]
    fn test_ignored_commands_are_silent() {
        let (statements, diagnostics) = parse("commit\nsave\nshow interfaces\n");
        assert!(diagnostics.is_empty());
        assert_eq!(statements.len(), 3);
        assert!(statements.iter().all(StatementNode::is_null));
        assert!(statements[1].path[0].is_keyword(TokenKind::Save));
    }

    #[test]
    fn test_unknown_top_level_recovers() {
        let (statements, diagnostics) =
            parse("frobnicate the router\nset system host-name edge1\n");
        assert_eq!(statements.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, codes::syntax::UNKNOWN_TOP_LEVEL);
        assert_eq!(diagnostics[0].line, 1);
    }

    #[test]
    fn test_absorb_unknown_top_level() {
        let mut preferences = preferences();
        preferences.absorb_unknown_top_level = true;
        let (statements, diagnostics) = parse_with("frobnicate now\n", preferences);
        assert_eq!(statements.len(), 1);
        assert!(statements[0].is_null());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Warning);
        assert_eq!(diagnostics[0].code, codes::syntax::ABSORBED_TOP_LEVEL);
    }

    #[test]
    fn test_leftover_tokens_are_an_error() {
        let (statements, diagnostics) =
            parse("set system host-name edge1 extra\nset system time-zone UTC\n");
        assert_eq!(statements.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, codes::syntax::UNEXPECTED_TOKEN);
        assert!(diagnostics[0].message.contains("end of line"));
    }

    #[test]
    fn test_bare_set() {
        let (statements, diagnostics) = parse("set\n");
        assert!(statements.is_empty());
        assert_eq!(diagnostics[0].code, codes::syntax::UNEXPECTED_END_OF_LINE);
    }

    #[test]
    fn test_unknown_path_info() {
        let source = "set protocols mystery area 0 network 10.0.0.0/8\n";
        let (statements, diagnostics) = parse(source);
        assert_eq!(statements.len(), 1);
        assert!(statements[0].is_null());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_info());
        assert_eq!(diagnostics[0].code, codes::syntax::UNKNOWN_PATH);

        let mut quiet = preferences();
        quiet.report_unknown_paths = false;
        let (statements, diagnostics) = parse_with(source, quiet);
        assert_eq!(statements.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_depth_limit_is_recoverable() {
        let mut source = String::from("set interfaces ethernet eth0");
        for n in 0..MAX_PARSE_DEPTH + 4 {
            source.push_str(&format!(" vif {}", n + 1));
        }
        source.push_str(" mtu 1500\nset system host-name edge1\n");

        let (statements, diagnostics) = parse(&source);
        assert_eq!(statements.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, codes::syntax::MAX_RECURSION_DEPTH);
    }

    #[test]
    fn test_error_history_is_capped() {
        let source = "bogus\n".repeat(MAX_ERROR_HISTORY + 5);
        let output = tokenize(&source).unwrap();
        let mut parser = StatementParser::with_preferences(output.tokens, preferences());
        let statements = parser.parse_configuration().unwrap();
        assert!(statements.is_empty());
        assert_eq!(parser.diagnostics().len(), MAX_ERROR_HISTORY + 5);
        assert_eq!(parser.error_history().len(), MAX_ERROR_HISTORY);
        assert_matches!(
            parser.error_history().back(),
            Some(SyntaxError::UnknownTopLevel { .. })
        );
    }

    #[test]
    fn test_scope_stack_balanced_after_error() {
        let output = tokenize("set protocols bgp 65000 neighbor 10.0.0.1 remote-as x\n").unwrap();
        let mut parser = StatementParser::with_preferences(output.tokens, preferences());
        parser.parse_configuration().unwrap();
        assert_eq!(parser.current_context(), "");
        assert_eq!(parser.diagnostics().len(), 1);
    }
}
