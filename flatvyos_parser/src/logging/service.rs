//! Logging service and logger implementations
//!
//! Events reach a logger already tagged with the active document (see
//! `dispatch_event`), so the loggers here only decide where a line goes and
//! how it is rendered.

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Level gate in front of one logger
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Console or JSON-lines output per the installed preferences; a silent
    /// service when console output is disabled
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let logger: Arc<dyn Logger> = if !config::use_console_logging() {
            Arc::new(MemoryLogger::new())
        } else if config::use_structured_logging() {
            Arc::new(StructuredLogger)
        } else {
            Arc::new(ConsoleLogger {
                show_document: config::include_document_context(),
            })
        };

        Self::new(logger, min_level)
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// Errors to stderr, everything else to stdout
fn emit(level: LogLevel, line: &str) {
    match level {
        LogLevel::Error => eprintln!("{}", line),
        _ => println!("{}", line),
    }
}

/// Plain-text console logger, optionally prefixing the document name
pub struct ConsoleLogger {
    pub show_document: bool,
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        match event.document() {
            Some(document) if self.show_document => {
                emit(event.level, &format!("{}: {}", document, event.format()))
            }
            _ => emit(event.level, &event.format()),
        }
    }
}

/// JSON-lines console logger
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        let line = event.format_json().unwrap_or_else(|_| event.format());
        emit(event.level, &line);
    }
}

/// In-memory logger keeping the most recent events, bounded by the
/// compile-time buffer size
pub struct MemoryLogger {
    events: Mutex<VecDeque<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn filtered(&self, keep: impl Fn(&LogEvent) -> bool) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| keep(*e)).cloned().collect()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.filtered(|_| true)
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn errors(&self) -> Vec<LogEvent> {
        self.filtered(LogEvent::is_error)
    }

    pub fn events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.filtered(|e| e.code == code)
    }

    /// Events logged while `document` was the active document
    pub fn events_for_document(&self, document: &str) -> Vec<LogEvent> {
        self.filtered(|e| e.document() == Some(document))
    }

    pub fn has_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.code == code)
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();
        let capacity = config::get_error_buffer_size().max(1);
        while events.len() >= capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

/// Create logging service based on current configuration
pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger_queries() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::info("Document queued").with_document("edge-1"));
        logger.log(
            &LogEvent::error(codes::lexical::UNRECOGNIZED_INPUT, "Unrecognized '&'")
                .with_document("edge-2"),
        );

        assert_eq!(logger.event_count(), 2);
        assert_eq!(logger.errors().len(), 1);
        assert!(logger.has_code(codes::lexical::UNRECOGNIZED_INPUT));
        assert_eq!(logger.events_for_document("edge-2").len(), 1);
        assert!(logger.events_for_document("edge-3").is_empty());

        logger.clear();
        assert_eq!(logger.event_count(), 0);
    }

    #[test]
    fn test_service_level_filtering() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Error);

        service.log_event(LogEvent::debug("Debug message"));
        service.log_event(LogEvent::warning_with_code(
            codes::syntax::ABSORBED_TOP_LEVEL,
            "absorbed",
        ));
        service.log_event(LogEvent::error(codes::syntax::UNEXPECTED_TOKEN, "bad token"));

        assert_eq!(logger.event_count(), 1);
        assert_eq!(
            logger.events_with_code(codes::syntax::UNEXPECTED_TOKEN).len(),
            1
        );
    }

    #[test]
    fn test_service_passes_success_events() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Info);

        service.log_event(LogEvent::success(
            codes::success::TOKENIZATION_COMPLETE,
            "Tokenized",
        ));
        assert!(logger.has_code(codes::success::TOKENIZATION_COMPLETE));
    }
}
