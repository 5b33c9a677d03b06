//! Lexical analysis for flat VyOS configuration text
//!
//! Turns a source buffer into a [`TokenStream`] whose tokens borrow from the
//! buffer. Tokenization is all-or-nothing: the first [`LexerError`] aborts the
//! document.

pub mod analyzer;
pub mod error;
pub mod literals;
pub mod state;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::{log_debug, log_error, log_success};

pub use analyzer::{LexicalMetrics, Tokenizer};
pub use error::{CaptureWarning, LexerError};
pub use state::{LexMode, LexerState};

/// Everything produced by tokenizing one document
#[derive(Debug, Clone)]
pub struct LexOutput<'src> {
    pub tokens: TokenStream<'src>,
    pub metrics: LexicalMetrics,
    pub warnings: Vec<CaptureWarning>,
}

/// Tokenize with preferences taken from the environment
pub fn tokenize(source: &str) -> Result<LexOutput<'_>, LexerError> {
    tokenize_with_preferences(source, LexicalPreferences::default())
}

pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Result<LexOutput<'_>, LexerError> {
    log_debug!("Starting lexical analysis",
        "bytes" => source.len(),
        "max_tokens_allowed" => MAX_TOKEN_COUNT,
        "max_token_length" => MAX_TOKEN_LENGTH
    );

    let include_positions = preferences.include_position_in_errors;
    let mut tokenizer = Tokenizer::with_preferences(source, preferences);
    let mut tokens = Vec::new();

    loop {
        match tokenizer.next_token() {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => break,
            Err(error) => {
                match error.span() {
                    Some(span) if include_positions => {
                        log_error!(error.error_code(), &error.to_string(), span = span,
                            "tokens_before_error" => tokens.len()
                        );
                    }
                    _ => {
                        log_error!(error.error_code(), &error.to_string(),
                            "tokens_before_error" => tokens.len()
                        );
                    }
                }
                return Err(error);
            }
        }
    }

    let (metrics, warnings) = tokenizer.finish();

    log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
        "tokens" => metrics.total_tokens,
        "content_tokens" => metrics.content_tokens,
        "lines" => metrics.lines,
        "capture_warnings" => warnings.len()
    );

    Ok(LexOutput {
        tokens: TokenStream::new(tokens),
        metrics,
        warnings,
    })
}

/// Check that every lexical code has registry metadata and the limits are sane
pub fn validate_lexical_configuration() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::UNRECOGNIZED_INPUT,
        codes::lexical::UNTERMINATED_STRING,
        codes::lexical::UNTERMINATED_COMMENT,
        codes::lexical::TOKEN_TOO_LONG,
        codes::lexical::TOO_MANY_TOKENS,
        codes::lexical::CAPTURE_MISMATCH,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_TOKEN_COUNT == 0 || MAX_TOKEN_LENGTH == 0 {
        return Err("Lexical limits cannot be zero".to_string());
    }
    if MAX_DESCRIPTION_LENGTH > MAX_TOKEN_LENGTH {
        return Err("MAX_DESCRIPTION_LENGTH exceeds MAX_TOKEN_LENGTH".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{validation, TokenKind};
    use assert_matches::assert_matches;

    const SAMPLE: &str = "# router config\r\n\
set interfaces ethernet eth0 description \"uplink to core\"\r\n\
set interfaces ethernet eth0 hw-id 00:11:22:33:44:55\n\
\n\
set policy route-map RM rule 10 match policy (A || B) && C   \n\
set policy route-map RM rule 10 set community 64512:100 additive\r\
/* block\ncomment */ set protocols isis net 49.0001.1921.6800.1001.00\n\
set protocols bgp 65000 neighbor 2001:db8::1 remote-as 65001";

    #[test]
    fn test_span_coverage_over_mixed_input() {
        let output = tokenize(SAMPLE).unwrap();
        validation::validate_token_stream(&output.tokens, SAMPLE).unwrap();
        assert!(output.warnings.is_empty());
        assert_eq!(
            output.tokens.len() + output.tokens.trivia_count(),
            output.metrics.total_tokens
        );
    }

    #[test]
    fn test_no_empty_tokens() {
        let output = tokenize(SAMPLE).unwrap();
        assert!(output.tokens.all_tokens().iter().all(|t| !t.span.is_empty()));
    }

    #[test]
    fn test_error_aborts_document() {
        let result = tokenize("set system host-name r1\nset & oops\n");
        assert_matches!(result, Err(LexerError::UnrecognizedInput { .. }));
    }

    #[test]
    fn test_capture_warnings_respect_preferences() {
        let quiet = LexicalPreferences {
            report_capture_warnings: false,
            ..LexicalPreferences::default()
        };
        let output = tokenize_with_preferences("speed fast\n", quiet).unwrap();
        assert!(output.warnings.is_empty());
        assert_eq!(output.metrics.capture_fallbacks, 1);
    }

    #[test]
    fn test_detailed_metrics() {
        let detailed = LexicalPreferences {
            collect_detailed_metrics: true,
            ..LexicalPreferences::default()
        };
        let output = tokenize_with_preferences("set set\n", detailed).unwrap();
        assert_eq!(output.metrics.kind_counts.get(&TokenKind::Set), Some(&2));
    }

    #[test]
    fn test_validate_configuration() {
        assert!(validate_lexical_configuration().is_ok());
    }
}
