//! Global logging module
//!
//! Provides thread-safe global logging with document-aware batch processing,
//! cargo-style error reporting, and a small macro interface. Logging before
//! `init_global_logging` is a silent no-op.

pub mod codes;
pub mod collector;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use collector::{DocumentContext, ErrorCollector, ProcessingSummary};
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();
static GLOBAL_ERROR_COLLECTOR: OnceLock<Arc<ErrorCollector>> = OnceLock::new();

thread_local! {
    static DOCUMENT_CONTEXT: RefCell<Option<DocumentContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging system from the installed preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(service::create_configured_service());
    init_global_logging_with_service(logging_service.clone())?;

    for code in [
        codes::system::INTERNAL_ERROR,
        codes::lexical::UNRECOGNIZED_INPUT,
        codes::syntax::UNEXPECTED_TOKEN,
    ] {
        if codes::get_description(code.as_str()) == "Unknown error" {
            return Err(format!("Missing metadata for code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Install the logging preferences of a loaded runtime config, then
/// initialize global logging from them
pub fn init_global_logging_with_config(
    runtime: &crate::config::RuntimeConfig,
) -> Result<(), String> {
    config::init_runtime_preferences(runtime.logging.clone())?;
    init_global_logging()
}

/// Initialize with a custom service (primarily for testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized")?;

    GLOBAL_ERROR_COLLECTOR
        .set(Arc::new(ErrorCollector::new()))
        .map_err(|_| "Global error collector already initialized")?;

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some() && GLOBAL_ERROR_COLLECTOR.get().is_some()
}

// ============================================================================
// GLOBAL ACCESS
// ============================================================================

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

pub fn try_get_global_error_collector() -> Option<&'static ErrorCollector> {
    GLOBAL_ERROR_COLLECTOR
        .get()
        .map(|collector| collector.as_ref())
}

// ============================================================================
// DOCUMENT CONTEXT MANAGEMENT
// ============================================================================

/// Set document context for current thread
pub fn set_document_context(name: &str, document_id: usize) {
    let context = DocumentContext::new(name, document_id);

    if let Some(collector) = try_get_global_error_collector() {
        collector.record_document(&context);
    }

    DOCUMENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(context);
    });
}

/// Clear document context for current thread
pub fn clear_document_context() {
    DOCUMENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with document context
pub fn with_document_context<F, R>(name: &str, document_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    set_document_context(name, document_id);
    let result = f();
    clear_document_context();
    result
}

/// Current document context (used by macros)
pub fn get_current_document_context() -> Option<DocumentContext> {
    DOCUMENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

fn attach_document(event: LogEvent) -> LogEvent {
    if !config::include_document_context() {
        return event;
    }
    match get_current_document_context() {
        Some(ctx) => event
            .with_document(&ctx.name)
            .with_context("document_id", &ctx.document_id.to_string()),
        None => event,
    }
}

/// Route an event to the global logger and, when a document is active, the collector
pub fn dispatch_event(event: LogEvent) {
    let event = attach_document(event);

    let collect = event.is_error() || event.is_warning();
    if collect {
        if let (Some(ctx), Some(collector)) =
            (get_current_document_context(), try_get_global_error_collector())
        {
            collector.record_event(&ctx.name, event.clone());
        }
    }

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn with_pairs(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    event
}

/// Used by `log_error!`
pub fn log_error_with_context(
    code: Code,
    message: &str,
    span: Option<crate::utils::Span>,
    context: Vec<(&str, &str)>,
) {
    let mut event = with_pairs(
        LogEvent::error(code, config::truncate_message(message)),
        context,
    );
    if let Some(s) = span {
        event = event.with_span(s);
    }
    dispatch_event(event);
}

/// Used by `log_warning!`
pub fn log_warning_with_context(
    code: Option<Code>,
    message: &str,
    context: Vec<(&str, &str)>,
) {
    let message = config::truncate_message(message);
    let event = match code {
        Some(code) => LogEvent::warning_with_code(code, message),
        None => LogEvent::warning(message),
    };
    dispatch_event(with_pairs(event, context));
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    dispatch_event(with_pairs(LogEvent::success(code, message), context));
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch_event(with_pairs(LogEvent::info(message), context));
}

/// Used by `log_debug!`
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    dispatch_event(with_pairs(LogEvent::debug(message), context));
}

// ============================================================================
// BATCH REPORTING
// ============================================================================

/// Totals over everything collected since initialization
pub fn collected_summary() -> ProcessingSummary {
    try_get_global_error_collector()
        .map(ErrorCollector::summary)
        .unwrap_or_default()
}

/// Cargo-like report of collected errors and warnings; empty before initialization
pub fn collected_report() -> String {
    try_get_global_error_collector()
        .map(ErrorCollector::report)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_context_management() {
        assert!(get_current_document_context().is_none());

        set_document_context("border-1", 7);
        let context = get_current_document_context().unwrap();
        assert_eq!(context.name, "border-1");
        assert_eq!(context.document_id, 7);

        clear_document_context();
        assert!(get_current_document_context().is_none());
    }

    #[test]
    fn test_with_document_context() {
        let result = with_document_context("core-2", 2, || {
            assert_eq!(get_current_document_context().unwrap().name, "core-2");
            42
        });

        assert_eq!(result, 42);
        assert!(get_current_document_context().is_none());
    }

    #[test]
    fn test_helpers_accept_any_context() {
        log_error_with_context(codes::syntax::UNEXPECTED_TOKEN, "unexpected", None, vec![]);
        log_info_with_context("info", vec![("k", "v")]);
        log_debug_with_context("debug", vec![]);
    }

    #[test]
    fn test_config_init_rejects_invalid_preferences() {
        let mut runtime = crate::config::RuntimeConfig::default();
        runtime.logging.use_structured_logging = true;
        runtime.logging.enable_console_logging = false;

        let error = init_global_logging_with_config(&runtime).unwrap_err();
        assert!(error.contains("Structured logging requires console logging"));
    }

    #[test]
    fn test_collected_report_after_initialization() {
        let memory = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(memory.clone(), LogLevel::Info);
        // Another test may have installed the global logger first
        let _ = init_global_logging_with_service(Arc::new(service));
        assert!(is_initialized());

        with_document_context("report-edge-1", 1, || {
            log_error_with_context(
                codes::syntax::UNEXPECTED_TOKEN,
                "expected AS number",
                None,
                vec![("found", "2001:db8::1")],
            );
            log_info_with_context("not collected", vec![]);
        });

        let report = collected_report();
        assert!(report.contains("Checking report-edge-1..."));
        assert!(report.contains("error[E050]: expected AS number"));
        assert!(collected_summary().failed_documents >= 1);
    }
}
