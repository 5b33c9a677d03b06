//! Per-document collection of errors and warnings for batch runs
//!
//! While a document context is active, `dispatch_event` hands every error and
//! warning to the global collector, which files it under the document name.
//! `report` renders the lot in a cargo-like layout.

use super::events::LogEvent;
use crate::config::compile_time::logging::{MAX_ERROR_COLLECTION, MAX_LOG_EVENTS_PER_DOCUMENT};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard};

/// Document being parsed on the current thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    pub name: String,
    pub document_id: usize,
}

impl DocumentContext {
    pub fn new(name: impl Into<String>, document_id: usize) -> Self {
        Self {
            name: name.into(),
            document_id,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    pub documents: usize,
    pub clean_documents: usize,
    pub failed_documents: usize,
    pub documents_with_warnings: usize,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Default)]
struct Store {
    by_document: BTreeMap<String, Vec<LogEvent>>,
    total: usize,
    dropped: usize,
}

#[derive(Default)]
pub struct ErrorCollector {
    store: Mutex<Store>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a document so it is counted even if it logs nothing
    pub fn record_document(&self, context: &DocumentContext) {
        self.lock().by_document.entry(context.name.clone()).or_default();
    }

    /// File an event under `document`. Events past the per-document or the
    /// global limit are counted but not kept.
    pub fn record_event(&self, document: &str, event: LogEvent) {
        let mut store = self.lock();
        if store.total >= MAX_ERROR_COLLECTION {
            store.dropped += 1;
            return;
        }

        let events = store.by_document.entry(document.to_string()).or_default();
        if events.len() >= MAX_LOG_EVENTS_PER_DOCUMENT {
            store.dropped += 1;
            return;
        }
        events.push(event);
        store.total += 1;
    }

    pub fn document_events(&self, document: &str) -> Vec<LogEvent> {
        self.lock().by_document.get(document).cloned().unwrap_or_default()
    }

    pub fn document_has_errors(&self, document: &str) -> bool {
        self.lock()
            .by_document
            .get(document)
            .is_some_and(|events| events.iter().any(LogEvent::is_error))
    }

    /// Events that arrived after a limit was reached
    pub fn dropped_count(&self) -> usize {
        self.lock().dropped
    }

    pub fn summary(&self) -> ProcessingSummary {
        let store = self.lock();
        let mut summary = ProcessingSummary {
            documents: store.by_document.len(),
            ..ProcessingSummary::default()
        };

        for events in store.by_document.values() {
            let errors = events.iter().filter(|e| e.is_error()).count();
            let warnings = events.iter().filter(|e| e.is_warning()).count();
            match (errors, warnings) {
                (0, 0) => summary.clean_documents += 1,
                (0, _) => summary.documents_with_warnings += 1,
                _ => summary.failed_documents += 1,
            }
            summary.errors += errors;
            summary.warnings += warnings;
        }
        summary
    }

    /// Cargo-like listing of every collected event, grouped by document
    pub fn report(&self) -> String {
        let store = self.lock();
        let mut out = String::new();

        for (document, events) in store.by_document.iter().filter(|(_, e)| !e.is_empty()) {
            let _ = writeln!(out, "Checking {}...", document);
            for event in events {
                let label = if event.is_error() { "error" } else { "warning" };
                let _ = write!(out, "{}[{}]: {}", label, event.code, event.message);
                if let Some(span) = &event.span {
                    let _ = write!(out, " --> {}:{}", document, span.start());
                }
                out.push('\n');

                for (key, value) in &event.context {
                    if key != "document" && key != "document_id" {
                        let _ = writeln!(out, "  = {}: {}", key, value);
                    }
                }
                if event.is_error() && event.metadata().is_some() {
                    let _ = writeln!(out, "  = help: {}", event.recommended_action());
                }
            }
            out.push('\n');
        }

        let count = |keep: fn(&LogEvent) -> bool| -> usize {
            store
                .by_document
                .values()
                .map(|events| events.iter().filter(|e| keep(e)).count())
                .sum()
        };
        let errors = count(LogEvent::is_error);
        let warnings = count(LogEvent::is_warning);
        if errors > 0 {
            let _ = writeln!(out, "Total errors: {}", errors);
        }
        if warnings > 0 {
            let _ = writeln!(out, "Total warnings: {}", warnings);
        }
        if store.dropped > 0 {
            let _ = writeln!(out, "({} further events not shown)", store.dropped);
        }
        out
    }

    pub fn clear(&self) {
        *self.lock() = Store::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_collector_groups_by_document() {
        let collector = ErrorCollector::new();

        collector.record_event(
            "core-1",
            LogEvent::error(codes::syntax::UNEXPECTED_TOKEN, "bad remote-as"),
        );
        collector.record_event("edge-2", LogEvent::warning("capture mismatch"));
        collector.record_document(&DocumentContext::new("spare-3", 3));

        let summary = collector.summary();
        assert_eq!(summary.documents, 3);
        assert_eq!(summary.failed_documents, 1);
        assert_eq!(summary.documents_with_warnings, 1);
        assert_eq!(summary.clean_documents, 1);
        assert!(collector.document_has_errors("core-1"));
        assert!(!collector.document_has_errors("edge-2"));
    }

    #[test]
    fn test_per_document_cap() {
        let collector = ErrorCollector::new();
        for _ in 0..MAX_LOG_EVENTS_PER_DOCUMENT + 5 {
            collector.record_event("noisy", LogEvent::warning("line"));
        }

        assert_eq!(
            collector.document_events("noisy").len(),
            MAX_LOG_EVENTS_PER_DOCUMENT
        );
        assert_eq!(collector.dropped_count(), 5);
        assert!(collector.report().contains("(5 further events not shown)"));
    }

    #[test]
    fn test_report_layout() {
        let collector = ErrorCollector::new();
        let span = Span::new(Position::new(40, 2, 45), Position::new(51, 2, 56));
        collector.record_event(
            "core-1",
            LogEvent::error(codes::syntax::UNEXPECTED_TOKEN, "expected AS number")
                .with_span(span)
                .with_context("found", "2001:db8::1")
                .with_document("core-1"),
        );

        let report = collector.report();
        assert!(report.contains("Checking core-1..."));
        assert!(report.contains("error[E050]: expected AS number --> core-1:2:45"));
        assert!(report.contains("= found: 2001:db8::1"));
        assert!(report.contains("= help: "));
        assert!(!report.contains("= document:"));
        assert!(report.contains("Total errors: 1"));
    }

    #[test]
    fn test_clear() {
        let collector = ErrorCollector::new();
        collector.record_event("a", LogEvent::warning("x"));
        collector.clear();
        assert_eq!(collector.summary(), ProcessingSummary::default());
    }
}
