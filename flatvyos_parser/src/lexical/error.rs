//! Fatal lexical errors and capture warnings

use super::state::LexMode;
use crate::config::compile_time::lexical::MAX_TOKEN_COUNT;
use crate::logging::codes;
use crate::tokens::TokenKind;
use crate::utils::Span;

/// Fatal tokenizer errors; any of these aborts the document
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Unrecognized input '{}' at line {}, column {}", .text, .span.start.line, .span.start.column)]
    UnrecognizedInput { text: String, span: Span },

    #[error("Unterminated quoted string starting at line {}, column {}", .span.start.line, .span.start.column)]
    UnterminatedString { span: Span },

    #[error("Unterminated block comment starting at line {}, column {}", .span.start.line, .span.start.column)]
    UnterminatedComment { span: Span },

    #[error("{} too long: {} bytes (max {}) at line {}, column {}", .kind, .length, .max, .span.start.line, .span.start.column)]
    TokenTooLong {
        kind: TokenKind,
        length: usize,
        max: usize,
        span: Span,
    },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::UnrecognizedInput { .. } => codes::lexical::UNRECOGNIZED_INPUT,
            LexerError::UnterminatedString { .. } => codes::lexical::UNTERMINATED_STRING,
            LexerError::UnterminatedComment { .. } => codes::lexical::UNTERMINATED_COMMENT,
            LexerError::TokenTooLong { .. } => codes::lexical::TOKEN_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            LexerError::UnrecognizedInput { span, .. }
            | LexerError::UnterminatedString { span }
            | LexerError::UnterminatedComment { span }
            | LexerError::TokenTooLong { span, .. } => Some(*span),
            LexerError::TooManyTokens { .. } => None,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn severity(&self) -> codes::Severity {
        codes::get_severity(self.error_code().as_str())
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }
}

/// A capture mode found text that did not fit; lexing continued in default mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureWarning {
    pub mode: LexMode,
    pub found: String,
    pub span: Span,
}

impl CaptureWarning {
    pub fn code(&self) -> crate::logging::Code {
        codes::lexical::CAPTURE_MISMATCH
    }

    pub fn message(&self) -> String {
        format!(
            "Expected {} after '{}' trigger, found '{}'",
            self.mode.expects(),
            self.mode,
            self.found
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_error_messages_name_position() {
        let span = Span::new(Position::new(4, 2, 5), Position::new(5, 2, 6));
        let error = LexerError::UnrecognizedInput {
            text: "&".to_string(),
            span,
        };
        assert_eq!(
            error.to_string(),
            "Unrecognized input '&' at line 2, column 5"
        );
        assert_eq!(error.error_code(), codes::lexical::UNRECOGNIZED_INPUT);
        assert_eq!(error.span(), Some(span));
        assert!(!error.is_recoverable());
        assert_eq!(error.category(), "Lexical");
    }

    #[test]
    fn test_capture_warning_message() {
        let warning = CaptureWarning {
            mode: LexMode::SpeedCapture,
            found: "fast".to_string(),
            span: Span::dummy(),
        };
        assert!(warning.message().contains("after 'speed' trigger, found 'fast'"));
        assert_eq!(warning.code(), codes::lexical::CAPTURE_MISMATCH);
    }
}
