use crate::lexical::LexerError;
use crate::logging::codes::{self, Code};
use crate::syntax::SyntaxError;
use crate::utils::Span;

/// A failure that discards the whole document. Recoverable problems never
/// surface here; they become diagnostics on the `ParseOutput`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("tokenizing failed: {0}")]
    Lexical(#[from] LexerError),

    #[error("statement parsing halted: {0}")]
    Syntax(#[from] SyntaxError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Lexical(inner) => inner.error_code(),
            Self::Syntax(inner) => inner.error_code(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexical(inner) => inner.span(),
            Self::Syntax(inner) => inner.span(),
        }
    }

    /// 1-based source line of the failure, when known
    pub fn line(&self) -> Option<u32> {
        self.span().map(|span| span.start().line)
    }

    /// The document is gone either way; this is always false
    pub fn is_recoverable(&self) -> bool {
        false
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse_document;

    #[test]
    fn test_lexical_failure_carries_location() {
        let error = parse_document("set system host-name r1\nset & oops\n").unwrap_err();
        assert_eq!(error.error_code(), codes::lexical::UNRECOGNIZED_INPUT);
        assert_eq!(error.category(), "Lexical");
        assert_eq!(error.severity(), codes::Severity::High);
        assert_eq!(error.line(), Some(2));
        assert!(!error.is_recoverable());
        assert!(error.to_string().starts_with("tokenizing failed"));
    }
}
