//! Folio Domain Layer
//!
//! This crate contains the value types and capability traits shared by every
//! other Folio crate. It has ZERO external dependencies and defines the seams
//! between the extraction pipeline and the services it talks to.
//!
//! ## Key Concepts
//!
//! - **Processing mode**: whether a document is handed to the model service
//!   directly (`file`) or its text is extracted locally first (`text`)
//! - **Staged file**: a document uploaded to the model service's temporary
//!   storage for the duration of one invocation
//! - **Extracted text**: the locally extracted text of a PDF and its page count
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Infrastructure implementations live in other crates
//!   (`folio-llm` for the model service, `folio-extractor` for PDF text)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod mode;
pub mod traits;

// Re-exports for convenience
pub use document::{ExtractedText, StagedFile};
pub use mode::ProcessingMode;
pub use traits::{LlmProvider, TextExtractor};
