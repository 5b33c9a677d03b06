//! Statement parser errors and the diagnostics they become
//!
//! Every `SyntaxError` except `InternalParserError` is recoverable: the parser
//! records it as a [`Diagnostic`], skips the rest of the line and continues.

use crate::logging::{codes, Code};
use crate::utils::Span;
use serde::Serialize;
use std::fmt;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token: expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of line: expected {expected} at {span}")]
    UnexpectedEndOfLine { expected: String, span: Span },

    #[error("Invalid value '{value}': {reason} at {span}")]
    InvalidValue {
        value: String,
        reason: String,
        span: Span,
    },

    #[error("Unknown top-level command {found} at {span}")]
    UnknownTopLevel { found: String, span: Span },

    #[error("Policy expression nested deeper than {max} at {span}")]
    ExpressionTooDeep { max: usize, span: Span },

    #[error("Statement path nested deeper than {max} at {span}")]
    MaxRecursionDepth { max: usize, span: Span },

    #[error("Internal parser error: {message}")]
    InternalParserError { message: String },
}

impl SyntaxError {
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }

    pub fn unexpected_end_of_line(expected: &str, span: Span) -> Self {
        Self::UnexpectedEndOfLine {
            expected: expected.to_string(),
            span,
        }
    }

    pub fn invalid_value(value: &str, reason: &str, span: Span) -> Self {
        Self::InvalidValue {
            value: value.to_string(),
            reason: reason.to_string(),
            span,
        }
    }

    pub fn internal_parser_error(message: &str) -> Self {
        Self::InternalParserError {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfLine { .. } => codes::syntax::UNEXPECTED_END_OF_LINE,
            Self::InvalidValue { .. } => codes::syntax::INVALID_VALUE,
            Self::UnknownTopLevel { .. } => codes::syntax::UNKNOWN_TOP_LEVEL,
            Self::ExpressionTooDeep { .. } | Self::MaxRecursionDepth { .. } => {
                codes::syntax::MAX_RECURSION_DEPTH
            }
            Self::InternalParserError { .. } => codes::syntax::INTERNAL_PARSER_ERROR,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfLine { span, .. }
            | Self::InvalidValue { span, .. }
            | Self::UnknownTopLevel { span, .. }
            | Self::ExpressionTooDeep { span, .. }
            | Self::MaxRecursionDepth { span, .. } => Some(*span),
            Self::InternalParserError { .. } => None,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
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

    /// Message without the trailing position, for diagnostics that carry
    /// line and column separately
    pub fn short_message(&self) -> String {
        match self {
            Self::UnexpectedToken {
                expected, found, ..
            } => format!("expected {}, found {}", expected, found),
            Self::UnexpectedEndOfLine { expected, .. } => {
                format!("expected {}, found end of line", expected)
            }
            Self::InvalidValue { value, reason, .. } => {
                format!("invalid value '{}': {}", value, reason)
            }
            Self::UnknownTopLevel { found, .. } => {
                format!("unknown top-level command {}", found)
            }
            Self::ExpressionTooDeep { max, .. } => {
                format!("policy expression nested deeper than {}", max)
            }
            Self::MaxRecursionDepth { max, .. } => {
                format!("statement path nested deeper than {}", max)
            }
            Self::InternalParserError { message } => message.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

impl DiagnosticSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Info => "info",
        }
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One positioned finding reported to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: Code,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(severity: DiagnosticSeverity, code: Code, message: String, span: Span) -> Self {
        Self {
            severity,
            code,
            message,
            line: span.start.line,
            column: span.start.column,
            span,
        }
    }

    pub fn error(code: Code, message: String, span: Span) -> Self {
        Self::new(DiagnosticSeverity::Error, code, message, span)
    }

    pub fn warning(code: Code, message: String, span: Span) -> Self {
        Self::new(DiagnosticSeverity::Warning, code, message, span)
    }

    pub fn info(code: Code, message: String, span: Span) -> Self {
        Self::new(DiagnosticSeverity::Info, code, message, span)
    }

    /// Error diagnostic at the error's span, or `fallback` when it has none
    pub fn from_syntax_error(error: &SyntaxError, fallback: Span) -> Self {
        Self::error(
            error.error_code(),
            error.short_message(),
            error.span().unwrap_or(fallback),
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == DiagnosticSeverity::Warning
    }

    pub fn is_info(&self) -> bool {
        self.severity == DiagnosticSeverity::Info
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} at line {}, column {}",
            self.severity, self.code, self.message, self.line, self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn span() -> Span {
        Span::new(Position::new(10, 2, 5), Position::new(15, 2, 10))
    }

    #[test]
    fn test_error_code_mapping() {
        let unexpected = SyntaxError::unexpected_token("an AS number", "IPv6 address '::1'", span());
        assert_eq!(unexpected.error_code().as_str(), "E050");

        let eol = SyntaxError::unexpected_end_of_line("a name", span());
        assert_eq!(eol.error_code().as_str(), "E040");

        let invalid = SyntaxError::invalid_value("10.0.0.0/40", "prefix length exceeds 32", span());
        assert_eq!(invalid.error_code().as_str(), "E043");

        let deep = SyntaxError::ExpressionTooDeep { max: 4, span: span() };
        assert_eq!(deep.error_code().as_str(), "E087");
    }

    #[test]
    fn test_recoverability() {
        let internal = SyntaxError::internal_parser_error("stream desynchronized");
        assert!(internal.requires_halt());
        assert!(!internal.is_recoverable());
        assert_eq!(internal.span(), None);

        let depth = SyntaxError::MaxRecursionDepth { max: 8, span: span() };
        assert!(depth.is_recoverable());
        assert!(!depth.requires_halt());

        let unexpected = SyntaxError::unexpected_token("a name", "end of line", span());
        assert!(unexpected.is_recoverable());
        assert_eq!(unexpected.category(), "Syntax");
    }

    #[test]
    fn test_diagnostic_from_error() {
        let error = SyntaxError::unexpected_token("an AS number", "IPv6 address '2001:db8::1'", span());
        let diagnostic = Diagnostic::from_syntax_error(&error, Span::dummy());

        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.line, 2);
        assert_eq!(diagnostic.column, 5);
        assert_eq!(
            diagnostic.to_string(),
            "error[E050]: expected an AS number, found IPv6 address '2001:db8::1' at line 2, column 5"
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(DiagnosticSeverity::Error < DiagnosticSeverity::Warning);
        assert!(DiagnosticSeverity::Warning < DiagnosticSeverity::Info);
    }
}
