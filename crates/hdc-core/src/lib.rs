//! hdc core - documentation model compiler for Hylo projects
//!
//! This crate turns a project tree into a cross-referenced documentation
//! model ready for rendering:
//! - Asset: scanning the file hierarchy into folders, articles, source files
//! - Doc: extracting and validating documentation comments
//! - Resolve: assigning output paths and computing relative links
//! - Pipeline: running the stages over every module of a program

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexer module - tokenization of Hylo source code
pub mod lexer;

/// Dense typed identifiers and arenas
pub mod id;

/// Declaration tree produced by the front end
pub mod program;

/// Validation diagnostics
pub mod diagnostics;

/// Build configuration (`hdc.toml`)
pub mod config;

/// Markdown block parser for documentation prose
pub mod markdown;

/// Asset tree scanning
pub mod asset;

/// Documentation comment extraction and records
pub mod doc;

/// Target resolution and relative references
pub mod resolve;

/// End-to-end documentation pipeline
pub mod pipeline;

pub use config::DocConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use pipeline::{document, document_project, DocumentationOutput, PipelineError};
