//! Single-document pipeline: source text -> tokens -> statements
//!
//! Lexical errors abort the document. Syntax problems are collected as
//! diagnostics next to a best-effort statement list.

mod error;
pub mod output;
mod validation;

pub use error::PipelineError;
pub use output::ParseOutput;
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::logging::codes;
use crate::syntax::{Diagnostic, StatementParser};
use crate::{log_debug, log_error, log_performance, log_success};
use std::time::Instant;

/// Parse one document with preferences taken from the environment
pub fn parse_document(source: &str) -> Result<ParseOutput, PipelineError> {
    parse_document_with_config(source, &RuntimeConfig::default())
}

pub fn parse_document_with_config(
    source: &str,
    config: &RuntimeConfig,
) -> Result<ParseOutput, PipelineError> {
    let start_time = Instant::now();
    log_debug!("Starting document parse", "bytes" => source.len());

    let lexed = crate::lexical::tokenize_with_preferences(source, config.lexical.clone())?;

    let mut diagnostics: Vec<Diagnostic> = lexed
        .warnings
        .iter()
        .map(|warning| Diagnostic::warning(warning.code(), warning.message(), warning.span))
        .collect();

    if lexed.tokens.is_empty() {
        log_debug!("Document has no content tokens");
    }
    let token_count = lexed.tokens.len();
    let trivia_count = lexed.tokens.trivia_count();
    let mut parser = StatementParser::with_preferences(lexed.tokens, config.syntax.clone());

    let statements = match parser.parse_configuration() {
        Ok(statements) => statements,
        Err(error) => {
            log_error!(error.error_code(), "Document parse aborted",
                "error" => error
            );
            return Err(error.into());
        }
    };
    diagnostics.extend(parser.into_diagnostics());

    let output = ParseOutput {
        statements,
        diagnostics,
        token_count,
        trivia_count,
        metrics: lexed.metrics,
        duration: start_time.elapsed(),
    };

    log_success!(codes::success::DOCUMENT_PARSED, "Document parsed",
        "statements" => output.statements.len(),
        "errors" => output.errors().count(),
        "warnings" => output.warnings().count()
    );
    log_performance!(codes::success::DOCUMENT_PARSED, "Document parse timing",
        duration = output.duration,
        "tokens" => token_count
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::nodes::{PathSegment, Payload, StatementNode};
    use crate::grammar::ast::value::Value;
    use crate::grammar::ast::visitor::StatementVisitor;
    use crate::syntax::DiagnosticSeverity;
    use crate::tokens::TokenKind;
    use assert_matches::assert_matches;

    fn config() -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.syntax.report_unknown_paths = true;
        config.syntax.absorb_unknown_top_level = false;
        config.lexical.report_capture_warnings = true;
        config
    }

    fn parse(source: &str) -> ParseOutput {
        parse_document_with_config(source, &config()).unwrap()
    }

    fn kw(kind: TokenKind) -> PathSegment {
        PathSegment::Keyword(kind)
    }

    #[test]
    fn test_interface_description() {
        let output = parse("set interfaces ethernet eth0 description \"uplink to core\"\n");
        assert!(output.is_clean());
        assert_eq!(output.statements.len(), 1);
        assert_eq!(
            output.statements[0].path,
            vec![
                kw(TokenKind::Interfaces),
                kw(TokenKind::Ethernet),
                PathSegment::name("eth0"),
                kw(TokenKind::Description),
            ]
        );
        assert_eq!(
            output.statements[0].payload,
            Payload::Scalar(Value::text("uplink to core"))
        );
    }

    #[test]
    fn test_bgp_remote_as() {
        let output = parse("set protocols bgp 65000 neighbor 10.0.0.1 remote-as 65001\n");
        assert!(output.is_clean());
        assert_eq!(
            output.statements[0].path,
            vec![
                kw(TokenKind::Protocols),
                kw(TokenKind::Bgp),
                PathSegment::name("65000"),
                kw(TokenKind::Neighbor),
                PathSegment::name("10.0.0.1"),
                kw(TokenKind::RemoteAs),
            ]
        );
        assert_eq!(
            output.statements[0].payload,
            Payload::Scalar(Value::Decimal(65001))
        );
    }

    #[test]
    fn test_route_map_rules_merge() {
        let output = parse(
            "set policy route-map FOO rule 10 action permit\n\
             set policy route-map FOO rule 10 match ip address prefix-list PL\n",
        );
        assert!(output.is_clean());
        assert_eq!(output.statements.len(), 2);

        let prefix = vec![
            kw(TokenKind::Policy),
            kw(TokenKind::RouteMap),
            PathSegment::name("FOO"),
            kw(TokenKind::Rule),
            PathSegment::name("10"),
        ];
        assert!(output.statements.iter().all(|s| s.starts_with(&prefix)));

        let nested = output.nested();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].path, prefix);
        assert_eq!(nested[0].children().len(), 2);
    }

    #[test]
    fn test_ipv6_in_numeric_slot_recovers() {
        let output = parse(
            "set protocols bgp 65000 neighbor 10.0.0.1 remote-as 2001:db8::1\n\
             set protocols bgp 65000 neighbor 10.0.0.1 description peer\n",
        );
        assert_eq!(output.errors().count(), 1);
        let error = output.errors().next().unwrap();
        assert_eq!(error.code, codes::syntax::UNEXPECTED_TOKEN);
        assert_eq!(error.line, 1);
        assert_eq!(output.statements.len(), 1);
        assert_eq!(
            output.statements[0].value(),
            Some(&Value::text("peer"))
        );
    }

    #[test]
    fn test_quoted_community_description() {
        let output = parse("set policy community-list 1 rule 10 description \"64512:100\"\n");
        assert!(output.is_clean());
        assert_eq!(
            output.statements[0].value(),
            Some(&Value::text("64512:100"))
        );
    }

    #[test]
    fn test_whitespace_is_idempotent() {
        let plain = parse("set system host-name edge1\nset system time-zone UTC\n");
        let padded = parse("\n\nset system host-name edge1   \n\n\t\nset system time-zone UTC  \t\n\n");

        let strip = |statements: &[StatementNode]| {
            statements
                .iter()
                .map(|s| (s.path.clone(), s.payload.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(&plain.statements), strip(&padded.statements));
        assert!(padded.is_clean());
    }

    #[test]
    fn test_unknown_path_tolerance() {
        let output = parse("set protocols babel interface eth0 split-horizon enable\n");
        assert_eq!(output.statements.len(), 1);
        assert!(output.statements[0].is_null());
        assert_eq!(output.errors().count(), 0);
        assert!(output.infos().count() <= 1);
        assert!(output.is_clean());
    }

    #[test]
    fn test_policy_expression_lowering() {
        let output = parse("set policy route-map RM rule 10 match policy (A || B) && C\n");
        assert!(output.is_clean());
        let children = output.statements[0].children();
        assert_eq!(children.len(), 1);
        assert!(children[0].path[0].is_keyword(TokenKind::DoubleAmpersand));
        assert_eq!(children[0].children().len(), 2);
    }

    #[test]
    fn test_apostrophe_inside_bare_word() {
        let output = parse("set system host-name r1\nset foo o'brien\n");
        assert_eq!(output.statements.len(), 2);
        assert_eq!(
            output.statements[0].payload,
            Payload::Scalar(Value::text("r1"))
        );
        assert!(output.statements[1].is_null());
        assert_eq!(
            output.statements[1].path.last(),
            Some(&PathSegment::name("o'brien"))
        );
        assert_eq!(output.errors().count(), 0);
    }

    #[test]
    fn test_block_comment_across_lines_ends_statement() {
        let output =
            parse("set system host-name r1 /* a\nb */ set system time-zone UTC\n");
        assert!(output.is_clean());
        assert_eq!(output.statements.len(), 2);
        assert_eq!(
            output.statements[1].path,
            vec![kw(TokenKind::System), kw(TokenKind::TimeZone)]
        );
        assert_eq!(output.statements[1].span.start.line, 2);
    }

    #[test]
    fn test_lexical_error_aborts() {
        let result = parse_document_with_config("set system host-name r1\nset & oops\n", &config());
        assert_matches!(result, Err(PipelineError::Lexical(_)));
    }

    #[test]
    fn test_capture_warning_becomes_diagnostic() {
        let output = parse("set interfaces ethernet eth0 speed fast\n");
        assert!(output
            .warnings()
            .any(|d| d.code == codes::lexical::CAPTURE_MISMATCH));
        assert_eq!(output.diagnostics[0].severity, DiagnosticSeverity::Warning);
    }

    #[test]
    fn test_render_diagnostics() {
        let source = "set system host-name edge1 extra\n";
        let output = parse(source);
        let rendered = output.render_diagnostics(source);
        assert!(rendered.starts_with("error[E050]"));
        assert!(rendered.contains("1 | set system host-name edge1 extra"));
        assert!(rendered.contains("^^^^^"));
    }

    #[test]
    fn test_walk_visits_every_node() {
        struct Counter(usize);
        impl StatementVisitor for Counter {
            type Error = ();
            fn enter(&mut self, _node: &StatementNode) -> Result<(), ()> {
                self.0 += 1;
                Ok(())
            }
        }

        let output = parse("set policy route-map RM rule 10 match policy A || B\n");
        let mut counter = Counter(0);
        output.walk(&mut counter).unwrap();
        assert_eq!(counter.0, output.statements[0].node_count());
    }

    #[test]
    fn test_validate_pipeline() {
        assert!(validate_pipeline().is_ok());
    }
}
