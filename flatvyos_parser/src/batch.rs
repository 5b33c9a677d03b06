//! Batch parsing of in-memory documents
//!
//! Documents are split once into contiguous ranges, one per worker thread.
//! Every worker owns its tokenizer and parser; the only shared state is the
//! result collector and the fail-fast flag. Results are returned in submission order,
//! so sequential and parallel runs are interchangeable.

use crate::config::compile_time::batch_processing::{
    MAX_BATCH_BYTES, MAX_DOCUMENTS_PER_BATCH, MAX_WORKER_THREADS,
};
use crate::config::runtime::RuntimeConfig;
use crate::logging::{self, codes};
use crate::pipeline::{self, ParseOutput, PipelineError};
use chrono::{DateTime, Utc};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH TYPES
// ============================================================================

/// One named configuration text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub source: String,
}

impl Document {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    /// Further limit below the compiled `MAX_DOCUMENTS_PER_BATCH`
    pub max_documents: Option<usize>,
    pub fail_fast: bool,
    pub log_progress: bool,
    pub runtime: RuntimeConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(4.min(MAX_WORKER_THREADS)),
            max_documents: None,
            fail_fast: false,
            log_progress: false,
            runtime: RuntimeConfig::default(),
        }
    }
}

/// Position and name of a submitted document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DocumentKey {
    pub index: usize,
    pub name: String,
}

#[derive(Debug)]
pub struct BatchResults {
    pub successful_documents: Vec<(DocumentKey, ParseOutput)>,
    pub failed_documents: Vec<(DocumentKey, PipelineError)>,
    pub documents_submitted: usize,
    pub started_at: DateTime<Utc>,
    pub processing_duration: Duration,
}

impl BatchResults {
    pub fn new(documents_submitted: usize) -> Self {
        Self {
            successful_documents: Vec::new(),
            failed_documents: Vec::new(),
            documents_submitted,
            started_at: Utc::now(),
            processing_duration: Duration::new(0, 0),
        }
    }

    pub fn documents_processed(&self) -> usize {
        self.successful_documents.len() + self.failed_documents.len()
    }

    pub fn success_count(&self) -> usize {
        self.successful_documents.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_documents.len()
    }

    /// Parsed documents that still carry error diagnostics
    pub fn documents_with_errors(&self) -> usize {
        self.successful_documents
            .iter()
            .filter(|(_, output)| output.errors().next().is_some())
            .count()
    }

    pub fn success_rate(&self) -> f64 {
        match self.documents_processed() {
            0 => 0.0,
            processed => self.success_count() as f64 / processed as f64,
        }
    }

    pub fn add_success(&mut self, key: DocumentKey, output: ParseOutput) {
        self.successful_documents.push((key, output));
    }

    pub fn add_failure(&mut self, key: DocumentKey, error: PipelineError) {
        self.failed_documents.push((key, error));
    }

    fn sort(&mut self) {
        self.successful_documents.sort_by(|a, b| a.0.cmp(&b.0));
        self.failed_documents.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch parsing started {}: {} of {} documents processed, {} parsed ({:.1}%), {} with errors, {} failed, {:.2}s total",
            self.started_at.to_rfc3339(),
            self.documents_processed(),
            self.documents_submitted,
            self.success_count(),
            self.success_rate() * 100.0,
            self.documents_with_errors(),
            self.failure_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("No documents submitted")]
    NoDocuments,

    #[error("Too many documents: {count} (max: {max})")]
    TooManyDocuments { count: usize, max: usize },

    #[error("Batch too large: {bytes} bytes (max: {max})")]
    BatchTooLarge { bytes: u64, max: u64 },

    #[error("Worker failure: {message}")]
    WorkerFailure { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> logging::Code {
        match self {
            Self::NoDocuments => codes::batch::NO_DOCUMENTS,
            Self::TooManyDocuments { .. } => codes::batch::TOO_MANY_DOCUMENTS,
            Self::BatchTooLarge { .. } => codes::batch::BATCH_TOO_LARGE,
            Self::WorkerFailure { .. } => codes::batch::WORKER_FAILURE,
        }
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
}

// ============================================================================
// ADMISSION
// ============================================================================

fn check_batch(documents: &[Document], config: &BatchConfig) -> Result<(), BatchError> {
    if documents.is_empty() {
        return Err(BatchError::NoDocuments);
    }

    let max = config
        .max_documents
        .map_or(MAX_DOCUMENTS_PER_BATCH, |max| max.min(MAX_DOCUMENTS_PER_BATCH));
    if documents.len() > max {
        return Err(BatchError::TooManyDocuments {
            count: documents.len(),
            max,
        });
    }

    let bytes: u64 = documents.iter().map(|d| d.source.len() as u64).sum();
    if bytes > MAX_BATCH_BYTES {
        return Err(BatchError::BatchTooLarge {
            bytes,
            max: MAX_BATCH_BYTES,
        });
    }

    Ok(())
}

fn admit(documents: &[Document], config: &BatchConfig) -> Result<(), BatchError> {
    check_batch(documents, config).map_err(|error| {
        crate::log_error!(error.error_code(), &error.to_string());
        error
    })
}

/// Parse one document inside its logging context
fn parse_one(
    index: usize,
    document: &Document,
    runtime: &RuntimeConfig,
) -> (DocumentKey, Result<ParseOutput, PipelineError>) {
    let key = DocumentKey {
        index,
        name: document.name.clone(),
    };
    let result = logging::with_document_context(&document.name, index, || {
        let result = pipeline::parse_document_with_config(&document.source, runtime);
        if let Err(error) = &result {
            crate::log_error!(codes::batch::DOCUMENT_FAILED, "Document failed to parse",
                "document" => document.name,
                "document_id" => index,
                "error" => error
            );
        }
        result
    });
    (key, result)
}

// ============================================================================
// EXECUTION
// ============================================================================

/// Parse documents one after another on the calling thread
pub fn parse_documents_sequential(
    documents: Vec<Document>,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    admit(&documents, config)?;
    let start_time = Instant::now();

    crate::log_info!("Starting sequential batch parse",
        "documents" => documents.len()
    );

    let mut results = BatchResults::new(documents.len());

    for (index, document) in documents.iter().enumerate() {
        if config.log_progress {
            crate::log_info!("Parsing document",
                "document" => document.name,
                "position" => format!("{} of {}", index + 1, documents.len())
            );
        }

        match parse_one(index, document, &config.runtime) {
            (key, Ok(output)) => results.add_success(key, output),
            (key, Err(error)) => {
                results.add_failure(key, error);
                if config.fail_fast {
                    crate::log_warning!("Fail-fast mode enabled, stopping batch parse");
                    break;
                }
            }
        }
    }

    results.processing_duration = start_time.elapsed();
    log_completion("Sequential batch parse completed", &results, 1);
    Ok(results)
}

/// Parse documents on up to `config.max_threads` worker threads
pub fn parse_documents_parallel(
    documents: Vec<Document>,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    admit(&documents, config)?;
    let start_time = Instant::now();
    let threads = config.max_threads.clamp(1, MAX_WORKER_THREADS);

    crate::log_info!("Starting parallel batch parse",
        "documents" => documents.len(),
        "max_threads" => threads
    );

    let submitted = documents.len();
    let documents: Arc<[Document]> = documents.into();
    let ranges = worker_ranges(submitted, threads);

    crate::log_debug!("Parallel batch configuration",
        "workers" => ranges.len(),
        "documents_per_worker" => submitted.div_ceil(threads)
    );

    let collector = Arc::new(Mutex::new(BatchResults::new(submitted)));
    let stop = Arc::new(AtomicBool::new(false));

    let mut handles = Vec::with_capacity(ranges.len());
    for range in ranges {
        let documents = Arc::clone(&documents);
        let collector = Arc::clone(&collector);
        let stop = Arc::clone(&stop);
        let runtime = config.runtime.clone();
        let fail_fast = config.fail_fast;
        let log_progress = config.log_progress;

        handles.push(thread::spawn(move || {
            for index in range {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let (key, result) = parse_one(index, &documents[index], &runtime);
                let mut guard = collector.lock().unwrap_or_else(PoisonError::into_inner);
                match result {
                    Ok(output) => guard.add_success(key, output),
                    Err(error) => {
                        guard.add_failure(key, error);
                        if fail_fast {
                            stop.store(true, Ordering::Relaxed);
                        }
                    }
                }
                if log_progress {
                    crate::log_info!("Batch progress",
                        "processed" => guard.documents_processed(),
                        "total" => submitted
                    );
                }
            }
        }));
    }

    for handle in handles {
        handle.join().map_err(|_| {
            let error = BatchError::WorkerFailure {
                message: "worker thread panicked while parsing".to_string(),
            };
            crate::log_error!(error.error_code(), "Batch worker failed");
            error
        })?;
    }
    if stop.load(Ordering::Relaxed) {
        crate::log_warning!("Fail-fast mode enabled, stopping batch parse");
    }

    let mut results = Arc::try_unwrap(collector)
        .map_err(|_| BatchError::WorkerFailure {
            message: "result collector still shared after join".to_string(),
        })?
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);

    results.sort();
    results.processing_duration = start_time.elapsed();
    log_completion("Parallel batch parse completed", &results, threads);
    Ok(results)
}

/// Contiguous index ranges, one per worker, assigned once per batch
fn worker_ranges(documents: usize, threads: usize) -> Vec<Range<usize>> {
    let per_worker = documents.div_ceil(threads.max(1)).max(1);
    (0..documents)
        .step_by(per_worker)
        .map(|start| start..(start + per_worker).min(documents))
        .collect()
}

fn log_completion(message: &str, results: &BatchResults, threads: usize) {
    crate::log_success!(codes::success::BATCH_COMPLETE, message,
        "documents_processed" => results.documents_processed(),
        "successful" => results.success_count(),
        "with_errors" => results.documents_with_errors(),
        "failed" => results.failure_count(),
        "threads_used" => threads,
        "started_at" => results.started_at.to_rfc3339(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse a batch, choosing sequential or parallel execution from the config
pub fn parse_documents(
    documents: Vec<Document>,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if config.max_threads <= 1 || documents.len() <= 1 {
        parse_documents_sequential(documents, config)
    } else {
        parse_documents_parallel(documents, config)
    }
}
