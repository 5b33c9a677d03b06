//! Log events emitted by the tokenizer, statement parser and batch runner

use super::codes::{self, Code, ErrorMetadata};
use crate::utils::Span;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const GENERIC_WARNING: Code = Code::new("W000");
const GENERIC_INFO: Code = Code::new("I000");
const GENERIC_DEBUG: Code = Code::new("D000");

/// Lower values are more severe; a service passes every level up to its minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum LogLevel {
    #[serde(rename = "ERROR")]
    Error = 0,
    #[serde(rename = "WARN")]
    Warning = 1,
    #[serde(rename = "INFO")]
    Info = 2,
    #[serde(rename = "DEBUG")]
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub span: Option<Span>,
    /// Ordered so rendered output is stable between runs
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn at(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message: message.to_string(),
            span: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::at(LogLevel::Error, code, message)
    }

    pub fn warning(message: &str) -> Self {
        Self::at(LogLevel::Warning, GENERIC_WARNING, message)
    }

    pub fn warning_with_code(code: Code, message: &str) -> Self {
        Self::at(LogLevel::Warning, code, message)
    }

    pub fn info(message: &str) -> Self {
        Self::at(LogLevel::Info, GENERIC_INFO, message)
    }

    /// Info-level event carrying one of the `I0xx` completion codes
    pub fn success(code: Code, message: &str) -> Self {
        Self::at(LogLevel::Info, code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::at(LogLevel::Debug, GENERIC_DEBUG, message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_document(self, name: &str) -> Self {
        self.with_context("document", name)
    }

    /// Name of the document this event was logged under, if any
    pub fn document(&self) -> Option<&str> {
        self.context.get("document").map(String::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn is_info(&self) -> bool {
        self.level == LogLevel::Info
    }

    /// Registry entry for this event's code; generic codes have none
    pub fn metadata(&self) -> Option<&'static ErrorMetadata> {
        codes::get_error_metadata(self.code.as_str())
    }

    pub fn requires_halt(&self) -> bool {
        self.metadata().is_some_and(|m| m.requires_halt)
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.code.as_str())
    }

    /// `[LEVEL] CODE - message at line:column`
    pub fn format(&self) -> String {
        let mut line = format!("[{}] {} - {}", self.level.as_str(), self.code, self.message);
        if let Some(span) = &self.span {
            let start = span.start();
            line.push_str(&format!(" at {}:{}", start.line, start.column));
        }
        line
    }

    /// One JSON object per event, suitable for line-oriented log shipping
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&JsonEvent::from(self))
    }
}

#[derive(Serialize)]
struct JsonSpan {
    start_line: u32,
    start_column: u32,
    end_line: u32,
    end_column: u32,
}

#[derive(Serialize)]
struct JsonCodeInfo {
    category: &'static str,
    severity: &'static str,
    recoverable: bool,
    requires_halt: bool,
    description: &'static str,
    recommended_action: &'static str,
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    timestamp: String,
    level: LogLevel,
    code: Code,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_info: Option<JsonCodeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<JsonSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a BTreeMap<String, String>>,
}

impl<'a> From<&'a LogEvent> for JsonEvent<'a> {
    fn from(event: &'a LogEvent) -> Self {
        Self {
            timestamp: event.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            level: event.level,
            code: event.code,
            message: &event.message,
            code_info: event.metadata().map(|m| JsonCodeInfo {
                category: m.category,
                severity: m.severity.as_str(),
                recoverable: m.recoverable,
                requires_halt: m.requires_halt,
                description: m.description,
                recommended_action: m.recommended_action,
            }),
            span: event.span.as_ref().map(|s| JsonSpan {
                start_line: s.start().line,
                start_column: s.start().column,
                end_line: s.end().line,
                end_column: s.end().column,
            }),
            context: (!event.context.is_empty()).then_some(&event.context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_lexical_error_halts() {
        let event = LogEvent::error(codes::lexical::UNRECOGNIZED_INPUT, "Unrecognized '&'");

        assert!(event.is_error());
        assert_eq!(event.category(), "Lexical");
        assert!(event.requires_halt());
    }

    #[test]
    fn test_generic_codes_have_no_metadata() {
        let event = LogEvent::info("queued");
        assert!(event.metadata().is_none());
        assert!(!event.requires_halt());

        let parsed = LogEvent::success(codes::success::DOCUMENT_PARSED, "Document parsed");
        assert!(parsed.is_info());
        assert!(parsed.metadata().is_some());
    }

    #[test]
    fn test_document_tag() {
        let event = LogEvent::warning("capture mismatch").with_document("edge-router");
        assert_eq!(event.document(), Some("edge-router"));
        assert_eq!(LogEvent::warning("untagged").document(), None);
    }

    #[test]
    fn test_format_with_span() {
        let span = Span::new(Position::new(20, 3, 7), Position::new(24, 3, 11));
        let event = LogEvent::error(codes::syntax::UNEXPECTED_TOKEN, "bad token").with_span(span);

        let formatted = event.format();
        assert!(formatted.starts_with("[ERROR] E050 - bad token"));
        assert!(formatted.ends_with("at 3:7"));
    }

    #[test]
    fn test_json_record() {
        let event = LogEvent::error(codes::syntax::UNEXPECTED_END_OF_LINE, "missing value")
            .with_context("scope", "bgp neighbor");

        let json = event.format_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["code"], "E040");
        assert_eq!(parsed["code_info"]["category"], "Syntax");
        assert_eq!(parsed["context"]["scope"], "bgp neighbor");
        assert!(parsed.get("span").is_none());
        assert!(parsed["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_json_omits_empty_context() {
        let json = LogEvent::debug("tick").format_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("context").is_none());
        assert!(parsed.get("code_info").is_none());
    }
}
