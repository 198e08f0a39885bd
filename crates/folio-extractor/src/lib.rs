//! Folio Extractor
//!
//! Pulls structured metadata out of PDF documents by handing them to an
//! LLM together with a user-supplied extraction schema.
//!
//! # Architecture
//!
//! ```text
//! Schema ─┐
//!         ├→ Prompt → LLM (file upload or embedded text) → Parser → Merge → JSON/CSV
//! PDF ────┘
//! ```
//!
//! Documents are processed one at a time. A document that fails for any
//! reason is skipped and reported; it never aborts the batch.
//!
//! # Example Usage
//!
//! ```no_run
//! use folio_domain::ProcessingMode;
//! use folio_extractor::{
//!     discover_pdfs, write_results, ExtractionSchema, Extractor, ExtractorConfig,
//!     OutputFormat, PdfTextBackend,
//! };
//! use folio_llm::MockProvider;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = ExtractionSchema::load(Path::new("extraction_schema.json"))?;
//! let paths = discover_pdfs(Path::new("papers"), false)?;
//!
//! let extractor = Extractor::new(
//!     MockProvider::new(r#"{"title": "On Memory"}"#),
//!     PdfTextBackend::new(),
//!     ExtractorConfig::default(),
//! );
//! let outcome = extractor
//!     .extract_batch(&paths, &schema, ProcessingMode::Text, |_| {})
//!     .await;
//!
//! println!("Extracted: {}", outcome.results.len());
//! println!("Skipped: {}", outcome.failures.len());
//! write_results(&outcome.results, Path::new("out.json"), OutputFormat::Json)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod aggregate;
mod config;
mod discovery;
mod error;
mod extractor;
mod parser;
mod pdf;
mod schema;
mod types;

pub mod prompt;


pub use aggregate::{
    flatten_record, render_csv, render_json, write_csv, write_json, write_results, OutputFormat,
};
pub use config::{ExtractorConfig, DEFAULT_EXCERPT_CHARS, MAX_UPLOAD_BYTES};
pub use discovery::{discover_pdfs, is_pdf_path};
pub use error::{format_file_size, ErrorKind, ExtractorError};
pub use extractor::{BatchEvent, Extractor, RawResponse, PDF_MIME_TYPE};
pub use parser::{parse_response, parse_response_with_limit};
pub use pdf::PdfTextBackend;
pub use prompt::{PromptBuilder, PromptContext, SYSTEM_INSTRUCTION};
pub use schema::{ExtractionSchema, FieldType, SchemaField, DEFAULT_ADDITIONAL_CONTEXT};
pub use types::{
    fields_from_map, BatchOutcome, DocumentFailure, DocumentMetadata, ExtractionRequest,
    ExtractionResult, FieldIssue, FieldValue, Fields, FILENAME_KEY, PAGE_COUNT_KEY,
    PROCESSING_MODE_KEY,
};
