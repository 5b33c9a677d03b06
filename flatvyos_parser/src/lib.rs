//! Tokenizer and statement parser for VyOS flat configuration (`set ...`)
//!
//! [`parse_document`] turns one configuration file into a list of
//! [`StatementNode`]s plus diagnostics; [`batch::parse_documents`] does the
//! same for many files across worker threads.

pub mod batch;
pub mod config;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

pub use batch::{BatchConfig, BatchError, BatchResults, Document};
pub use grammar::{
    nest_statements, walk, PathSegment, Payload, StatementNode, StatementVisitor, Value,
};
pub use pipeline::{parse_document, parse_document_with_config, ParseOutput, PipelineError};
pub use syntax::{Diagnostic, DiagnosticSeverity};
