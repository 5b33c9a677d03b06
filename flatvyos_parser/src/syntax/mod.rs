//! Syntax analysis - TokenStream to statement list
//!
//! The parser walks the content tokens line by line and builds one
//! [`StatementNode`] per line. Bad lines become [`Diagnostic`]s instead of
//! aborting the document.

pub mod error;
pub mod parser;

pub use error::{Diagnostic, DiagnosticSeverity, SyntaxError, SyntaxResult};
pub use parser::StatementParser;

use crate::config::compile_time::syntax::*;
use crate::config::runtime::SyntaxPreferences;
use crate::grammar::ast::nodes::StatementNode;
use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_debug, log_error, log_success};

/// Parse a token stream with the given preferences, returning the statements
/// together with every diagnostic raised along the way
pub fn parse_statements(
    tokens: TokenStream<'_>,
    preferences: SyntaxPreferences,
) -> SyntaxResult<(Vec<StatementNode>, Vec<Diagnostic>)> {
    log_debug!("Starting syntax analysis", "tokens" => tokens.len());

    let mut parser = StatementParser::with_preferences(tokens, preferences);
    let statements = parser.parse_configuration()?;
    Ok((statements, parser.into_diagnostics()))
}

/// Check that every syntax code is registered, the limits are usable and the
/// grammar table is consistent
pub fn validate_syntax_configuration() -> Result<(), String> {
    let syntax_codes = [
        codes::syntax::UNEXPECTED_END_OF_LINE,
        codes::syntax::INVALID_VALUE,
        codes::syntax::UNEXPECTED_TOKEN,
        codes::syntax::UNKNOWN_TOP_LEVEL,
        codes::syntax::INTERNAL_PARSER_ERROR,
        codes::syntax::MAX_RECURSION_DEPTH,
        codes::syntax::ABSORBED_TOP_LEVEL,
        codes::syntax::RECOVERY_SCAN_LIMIT,
        codes::syntax::UNKNOWN_PATH,
    ];

    for code in &syntax_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Syntax code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_PARSE_DEPTH == 0 || MAX_EXPRESSION_DEPTH == 0 || MAX_RECOVERY_SCAN_TOKENS == 0 {
        return Err("Syntax limits cannot be zero".to_string());
    }
    if MAX_CONTEXT_STACK_DEPTH < MAX_PARSE_DEPTH {
        return Err("MAX_CONTEXT_STACK_DEPTH is below MAX_PARSE_DEPTH".to_string());
    }

    match crate::grammar::table::validate_grammar_table() {
        Ok(()) => {
            log_success!(
                codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
                "Syntax configuration validated",
                "rules" => crate::grammar::table::rules().len()
            );
            Ok(())
        }
        Err(message) => {
            log_error!(codes::syntax::INTERNAL_PARSER_ERROR,
                "Grammar table validation failed",
                "reason" => message
            );
            Err(message)
        }
    }
}
