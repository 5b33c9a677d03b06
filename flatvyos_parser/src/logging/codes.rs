//! Consolidated diagnostic codes and classification system
//!
//! Single source of truth for every code the tokenizer, statement parser,
//! pipeline and batch runner can emit, together with the behavioral metadata
//! used when logging or rendering them.

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning, notice and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// Tokenizer codes
pub mod lexical {
    use super::Code;

    pub const UNRECOGNIZED_INPUT: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const UNTERMINATED_COMMENT: Code = Code::new("E022");
    pub const TOKEN_TOO_LONG: Code = Code::new("E023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E024");

    /// A capture mode was entered but the following text did not fit it
    pub const CAPTURE_MISMATCH: Code = Code::new("W020");
}

/// Statement parser codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_END_OF_LINE: Code = Code::new("E040");
    pub const INVALID_VALUE: Code = Code::new("E043");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const UNKNOWN_TOP_LEVEL: Code = Code::new("E051");
    pub const INTERNAL_PARSER_ERROR: Code = Code::new("E086");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");

    pub const ABSORBED_TOP_LEVEL: Code = Code::new("W041");
    pub const RECOVERY_SCAN_LIMIT: Code = Code::new("W042");

    /// Informational: a `set` path the grammar does not model
    pub const UNKNOWN_PATH: Code = Code::new("N045");
}

/// Batch runner codes
pub mod batch {
    use super::Code;

    pub const NO_DOCUMENTS: Code = Code::new("E300");
    pub const TOO_MANY_DOCUMENTS: Code = Code::new("E301");
    pub const BATCH_TOO_LARGE: Code = Code::new("E302");
    pub const WORKER_FAILURE: Code = Code::new("E303");
    pub const DOCUMENT_FAILED: Code = Code::new("E304");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");

    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const STATEMENT_TREE_COMPLETE: Code = Code::new("I040");
    pub const DOCUMENT_PARSED: Code = Code::new("I060");
    pub const BATCH_COMPLETE: Code = Code::new("I070");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();
        let mut register = |metadata: ErrorMetadata| {
            registry.insert(metadata.code, metadata);
        };

        // System
        register(ErrorMetadata::new(
            "ERR001",
            "System",
            Severity::Critical,
            false,
            true,
            "Critical internal error",
            "File a bug report including the offending configuration",
        ));
        register(ErrorMetadata::new(
            "ERR002",
            "System",
            Severity::Critical,
            false,
            true,
            "Logging or runtime initialization failed",
            "Check environment configuration and initialize logging once per process",
        ));
        register(ErrorMetadata::new(
            "ERR003",
            "System",
            Severity::High,
            false,
            true,
            "Runtime configuration could not be read or parsed",
            "Check the preferences TOML file for syntax errors and unknown fields",
        ));

        // Lexical
        register(ErrorMetadata::new(
            "E020",
            "Lexical",
            Severity::High,
            false,
            true,
            "Input text matches no token rule",
            "Remove or quote the offending character",
        ));
        register(ErrorMetadata::new(
            "E021",
            "Lexical",
            Severity::High,
            false,
            true,
            "Quoted string is not closed before end of line",
            "Add the missing closing quote",
        ));
        register(ErrorMetadata::new(
            "E022",
            "Lexical",
            Severity::High,
            false,
            true,
            "Block comment is not closed before end of input",
            "Add the missing '*/'",
        ));
        register(ErrorMetadata::new(
            "E023",
            "Lexical",
            Severity::High,
            false,
            true,
            "Single token exceeds the configured maximum length",
            "Shorten the value or raise max_token_length in the build profile",
        ));
        register(ErrorMetadata::new(
            "E024",
            "Lexical",
            Severity::High,
            false,
            true,
            "Document produces more tokens than the configured maximum",
            "Split the configuration or raise max_token_count in the build profile",
        ));
        register(ErrorMetadata::new(
            "W020",
            "Lexical",
            Severity::Low,
            true,
            false,
            "Capture mode found no value of the expected shape",
            "Check the value following description, net, hw-id, mac or speed",
        ));

        // Syntax
        register(ErrorMetadata::new(
            "E040",
            "Syntax",
            Severity::Medium,
            true,
            false,
            "Line ended before the statement was complete",
            "Supply the missing keyword or value",
        ));
        register(ErrorMetadata::new(
            "E043",
            "Syntax",
            Severity::Medium,
            true,
            false,
            "Value has the right shape but is out of range",
            "Check numeric ranges, prefix lengths and community halves",
        ));
        register(ErrorMetadata::new(
            "E050",
            "Syntax",
            Severity::Medium,
            true,
            false,
            "Token kind does not fit this position in the statement",
            "Check the statement against the configuration reference",
        ));
        register(ErrorMetadata::new(
            "E051",
            "Syntax",
            Severity::Medium,
            true,
            false,
            "Line does not start with 'set' or a recognized top-level command",
            "Prefix the line with 'set' or enable absorb_unknown_top_level",
        ));
        register(ErrorMetadata::new(
            "E086",
            "Syntax",
            Severity::Critical,
            false,
            true,
            "Internal parser invariant violated",
            "File a bug report including the offending configuration",
        ));
        register(ErrorMetadata::new(
            "E087",
            "Syntax",
            Severity::Medium,
            true,
            false,
            "Statement or policy expression nests too deeply",
            "Flatten the expression or raise the depth limits in the build profile",
        ));
        register(ErrorMetadata::new(
            "W041",
            "Syntax",
            Severity::Low,
            true,
            false,
            "Unrecognized top-level line absorbed as a null statement",
            "Review the line; it carries no configuration",
        ));
        register(ErrorMetadata::new(
            "W042",
            "Syntax",
            Severity::Low,
            true,
            false,
            "Error recovery stopped before reaching the end of the line",
            "Break very long lines or raise max_recovery_scan_tokens",
        ));
        register(ErrorMetadata::new(
            "N045",
            "Syntax",
            Severity::Low,
            true,
            false,
            "Statement path is not modelled and was kept as a null node",
            "No action needed unless the path should be modelled",
        ));

        // Batch
        register(ErrorMetadata::new(
            "E300",
            "Batch",
            Severity::Medium,
            true,
            false,
            "Batch contains no documents",
            "Provide at least one document",
        ));
        register(ErrorMetadata::new(
            "E301",
            "Batch",
            Severity::High,
            false,
            true,
            "Batch exceeds the maximum document count",
            "Split the batch or raise max_documents_per_batch",
        ));
        register(ErrorMetadata::new(
            "E302",
            "Batch",
            Severity::High,
            false,
            true,
            "Batch exceeds the maximum total source size",
            "Split the batch or raise max_batch_bytes",
        ));
        register(ErrorMetadata::new(
            "E303",
            "Batch",
            Severity::Critical,
            false,
            true,
            "A worker thread panicked or could not be joined",
            "Re-run sequentially to isolate the failing document",
        ));
        register(ErrorMetadata::new(
            "E304",
            "Batch",
            Severity::Medium,
            true,
            false,
            "A document in the batch failed to parse",
            "Inspect the per-document error",
        ));

        // Success
        register(ErrorMetadata::new(
            "I001",
            "Success",
            Severity::Low,
            true,
            false,
            "Operation completed successfully",
            "Continue",
        ));
        register(ErrorMetadata::new(
            "I004",
            "Success",
            Severity::Low,
            true,
            false,
            "System initialization completed",
            "Continue",
        ));
        register(ErrorMetadata::new(
            "I020",
            "Lexical",
            Severity::Low,
            true,
            false,
            "Tokenization completed",
            "Continue to statement parsing",
        ));
        register(ErrorMetadata::new(
            "I040",
            "Syntax",
            Severity::Low,
            true,
            false,
            "Statement tree constructed",
            "Hand the tree to the consumer",
        ));
        register(ErrorMetadata::new(
            "I060",
            "Pipeline",
            Severity::Low,
            true,
            false,
            "Document parsed",
            "Continue",
        ));
        register(ErrorMetadata::new(
            "I070",
            "Batch",
            Severity::Low,
            true,
            false,
            "Batch parsing completed",
            "Review per-document results",
        ));

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if the condition behind a code is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if the condition behind a code requires an immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_constant_is_registered() {
        let all = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            system::CONFIGURATION_ERROR,
            lexical::UNRECOGNIZED_INPUT,
            lexical::UNTERMINATED_STRING,
            lexical::UNTERMINATED_COMMENT,
            lexical::TOKEN_TOO_LONG,
            lexical::TOO_MANY_TOKENS,
            lexical::CAPTURE_MISMATCH,
            syntax::UNEXPECTED_END_OF_LINE,
            syntax::INVALID_VALUE,
            syntax::UNEXPECTED_TOKEN,
            syntax::UNKNOWN_TOP_LEVEL,
            syntax::INTERNAL_PARSER_ERROR,
            syntax::MAX_RECURSION_DEPTH,
            syntax::ABSORBED_TOP_LEVEL,
            syntax::RECOVERY_SCAN_LIMIT,
            syntax::UNKNOWN_PATH,
            batch::NO_DOCUMENTS,
            batch::TOO_MANY_DOCUMENTS,
            batch::BATCH_TOO_LARGE,
            batch::WORKER_FAILURE,
            batch::DOCUMENT_FAILED,
            success::OPERATION_COMPLETED_SUCCESSFULLY,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::TOKENIZATION_COMPLETE,
            success::STATEMENT_TREE_COMPLETE,
            success::DOCUMENT_PARSED,
            success::BATCH_COMPLETE,
        ];

        for code in all {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_lexical_failures_halt() {
        assert!(requires_halt(lexical::UNRECOGNIZED_INPUT.as_str()));
        assert!(!is_recoverable(lexical::UNTERMINATED_COMMENT.as_str()));
        assert_eq!(get_category("E020"), "Lexical");
    }

    #[test]
    fn test_syntax_errors_recover() {
        assert!(is_recoverable(syntax::UNEXPECTED_TOKEN.as_str()));
        assert!(!requires_halt(syntax::UNEXPECTED_END_OF_LINE.as_str()));
        assert!(requires_halt(syntax::INTERNAL_PARSER_ERROR.as_str()));
        assert_eq!(get_severity(syntax::UNKNOWN_PATH.as_str()), Severity::Low);
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_severity("Z999"), Severity::Medium);
    }

    #[test]
    fn test_code_serializes_as_string() {
        let json = serde_json::to_string(&syntax::UNKNOWN_PATH).unwrap();
        assert_eq!(json, "\"N045\"");
    }
}
