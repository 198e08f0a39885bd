//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! the services it depends on. Implementations live in other crates.

use crate::{ExtractedText, StagedFile};
use std::path::Path;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (folio-llm). Every call is a
/// single attempt; callers decide what a failure means for the document.
#[allow(async_fn_in_trait)]
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for a text-only prompt
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate a completion for a prompt that references a staged file
    async fn generate_with_file(
        &self,
        prompt: &str,
        file: &StagedFile,
    ) -> Result<String, Self::Error>;

    /// Upload a local file to the service's temporary storage
    async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<StagedFile, Self::Error>;

    /// Delete a previously staged file
    async fn delete_file(&self, file: &StagedFile) -> Result<(), Self::Error>;
}

/// Trait for local PDF text extraction
///
/// Implemented by the application layer (folio-extractor). Extraction is
/// blocking and CPU-bound, so implementations must be shareable with a
/// worker thread.
pub trait TextExtractor: Send + Sync {
    /// Error type for extraction operations
    type Error;

    /// Extract the full text and page count of a document
    fn extract_text(&self, path: &Path) -> Result<ExtractedText, Self::Error>;
}
