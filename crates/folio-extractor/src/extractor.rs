//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_response_with_limit;
use crate::prompt::PromptBuilder;
use crate::schema::ExtractionSchema;
use crate::types::{
    BatchOutcome, DocumentFailure, DocumentMetadata, ExtractionRequest, ExtractionResult,
};
use folio_domain::{LlmProvider, ProcessingMode, StagedFile, TextExtractor};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// MIME type sent with uploaded documents
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Raw model output for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Model reply, unparsed
    pub text: String,
    /// Page count, when the document was read locally
    pub page_count: Option<usize>,
}

/// Progress notifications emitted by [`Extractor::extract_batch`]
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// A document is about to be processed
    Started {
        /// Zero-based position in the batch
        index: usize,
        /// Batch size
        total: usize,
        /// Basename of the document
        filename: &'a str,
    },
    /// A document produced a result
    Succeeded {
        /// Basename of the document
        filename: &'a str,
        /// The merged result
        result: &'a ExtractionResult,
    },
    /// A document was skipped
    Failed {
        /// Basename of the document
        filename: &'a str,
        /// Why it was skipped
        error: &'a ExtractorError,
    },
}

/// Drives documents through the model and collects results
pub struct Extractor<L, P>
where
    L: LlmProvider,
    P: TextExtractor,
{
    llm_provider: L,
    pdf_backend: Arc<P>,
    config: ExtractorConfig,
}

impl<L, P> Extractor<L, P>
where
    L: LlmProvider,
    L::Error: Display,
    P: TextExtractor + 'static,
    P::Error: Into<ExtractorError> + Send + 'static,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, pdf_backend: P, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            pdf_backend: Arc::new(pdf_backend),
            config,
        }
    }

    /// Run one document through the model and return its raw reply
    ///
    /// File mode: size check, upload, generate, cleanup. Text mode: local
    /// text extraction, generate. Cleanup runs whether generation
    /// succeeded or not, and its own failure is only logged.
    pub async fn invoke(
        &self,
        request: &ExtractionRequest,
        schema: &ExtractionSchema,
    ) -> Result<RawResponse, ExtractorError> {
        match request.mode {
            ProcessingMode::File => self.invoke_with_file(&request.file_path, schema).await,
            ProcessingMode::Text => self.invoke_with_text(&request.file_path, schema).await,
        }
    }

    async fn invoke_with_file(
        &self,
        path: &Path,
        schema: &ExtractionSchema,
    ) -> Result<RawResponse, ExtractorError> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| ExtractorError::UnreadablePdf(format!("{}: {}", path.display(), e)))?
            .len();
        debug!(state = "size_check", size, path = %path.display());
        if size > self.config.max_upload_bytes {
            return Err(ExtractorError::FileTooLarge {
                size,
                limit: self.config.max_upload_bytes,
            });
        }

        debug!(state = "upload", path = %path.display());
        let staged = self
            .llm_provider
            .upload_file(path, PDF_MIME_TYPE)
            .await
            .map_err(|e| ExtractorError::Upload(e.to_string()))?;

        debug!(state = "generate", file = %staged.name);
        let prompt = PromptBuilder::new(schema).build();
        let generated = self
            .llm_provider
            .generate_with_file(&prompt, &staged)
            .await
            .map_err(|e| ExtractorError::Llm(e.to_string()));

        self.cleanup(&staged).await;

        Ok(RawResponse {
            text: generated?,
            page_count: None,
        })
    }

    async fn invoke_with_text(
        &self,
        path: &Path,
        schema: &ExtractionSchema,
    ) -> Result<RawResponse, ExtractorError> {
        debug!(state = "local_text_extract", path = %path.display());
        let backend = Arc::clone(&self.pdf_backend);
        let owned_path = path.to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || backend.extract_text(&owned_path))
            .await
            .map_err(|e| ExtractorError::UnreadablePdf(format!("extraction task failed: {}", e)))?
            .map_err(Into::<ExtractorError>::into)?;

        if extracted.is_blank() {
            return Err(ExtractorError::EmptyDocument);
        }

        debug!(state = "generate", chars = extracted.text.len(), pages = extracted.page_count);
        let prompt = PromptBuilder::new(schema)
            .with_document_text(&extracted.text)
            .build();
        let text = self
            .llm_provider
            .generate(&prompt)
            .await
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        Ok(RawResponse {
            text,
            page_count: Some(extracted.page_count),
        })
    }

    async fn cleanup(&self, staged: &StagedFile) {
        debug!(state = "cleanup", file = %staged.name);
        if let Err(e) = self.llm_provider.delete_file(staged).await {
            warn!("Failed to delete staged file {}: {}", staged.name, e);
        }
    }

    /// Extract, parse and merge one document
    pub async fn extract(
        &self,
        request: &ExtractionRequest,
        schema: &ExtractionSchema,
    ) -> Result<ExtractionResult, ExtractorError> {
        let start = Instant::now();
        let filename = request.filename();

        let raw = self.invoke(request, schema).await?;
        debug!("LLM response length: {} chars", raw.text.len());

        let fields = parse_response_with_limit(&raw.text, self.config.max_excerpt_chars)?;
        let result = ExtractionResult::merge(
            fields,
            DocumentMetadata {
                filename: filename.clone(),
                processing_mode: request.mode,
                page_count: raw.page_count,
            },
        );

        for issue in result.validate_against(schema) {
            warn!("{}: {}", filename, issue);
        }

        info!(
            "Extracted {} fields from {} in {:?}",
            result.record().len(),
            filename,
            start.elapsed()
        );
        Ok(result)
    }

    /// Process documents one at a time, skipping those that fail
    ///
    /// `on_event` is called before each document and after its outcome is
    /// known. Results keep the order of `paths`.
    pub async fn extract_batch<F>(
        &self,
        paths: &[PathBuf],
        schema: &ExtractionSchema,
        mode: ProcessingMode,
        mut on_event: F,
    ) -> BatchOutcome
    where
        F: FnMut(BatchEvent<'_>),
    {
        let total = paths.len();
        let mut outcome = BatchOutcome::default();
        info!("Processing {} documents in {} mode", total, mode);

        for (index, path) in paths.iter().enumerate() {
            let request = ExtractionRequest::new(path.clone(), mode);
            let filename = request.filename();
            on_event(BatchEvent::Started {
                index,
                total,
                filename: &filename,
            });

            match self.extract(&request, schema).await {
                Ok(result) => {
                    on_event(BatchEvent::Succeeded {
                        filename: &filename,
                        result: &result,
                    });
                    outcome.results.push(result);
                }
                Err(e) => {
                    info!("Skipping {}: {}", filename, e);
                    on_event(BatchEvent::Failed {
                        filename: &filename,
                        error: &e,
                    });
                    outcome.failures.push(DocumentFailure {
                        filename,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Batch complete: {} succeeded, {} failed",
            outcome.results.len(),
            outcome.failures.len()
        );
        outcome
    }
}
