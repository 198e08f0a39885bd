//! Local PDF text extraction backed by `pdf-extract`

use crate::error::ExtractorError;
use folio_domain::{ExtractedText, TextExtractor};
use std::fs;
use std::panic;
use std::path::Path;
use tracing::debug;

/// `TextExtractor` that reads PDFs with the `pdf-extract` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextBackend;

impl PdfTextBackend {
    /// Create a backend
    pub fn new() -> Self {
        Self
    }

    /// Extract text from a PDF held in memory
    pub fn extract_from_bytes(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractorError> {
        if bytes.is_empty() {
            return Err(ExtractorError::UnreadablePdf("file is empty".to_string()));
        }

        // pdf-extract panics on some malformed inputs
        let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|_| ExtractorError::UnreadablePdf("PDF parser aborted".to_string()))?
            .map_err(|e| ExtractorError::UnreadablePdf(e.to_string()))?;

        Ok(ExtractedText::new(pages.concat(), pages.len()))
    }
}

impl TextExtractor for PdfTextBackend {
    type Error = ExtractorError;

    fn extract_text(&self, path: &Path) -> Result<ExtractedText, Self::Error> {
        let bytes = fs::read(path).map_err(|e| {
            ExtractorError::UnreadablePdf(format!("{}: {}", path.display(), e))
        })?;

        let extracted = self.extract_from_bytes(&bytes)?;
        debug!(
            "Extracted {} chars from {} pages of {}",
            extracted.text.len(),
            extracted.page_count,
            path.display()
        );
        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bytes_rejected() {
        let result = PdfTextBackend::new().extract_from_bytes(&[]);
        assert!(matches!(result, Err(ExtractorError::UnreadablePdf(_))));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = PdfTextBackend::new().extract_from_bytes(b"this is not a pdf at all");
        assert!(matches!(result, Err(ExtractorError::UnreadablePdf(_))));
    }

    #[test]
    fn test_missing_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = PdfTextBackend::new().extract_text(&dir.path().join("absent.pdf"));
        assert!(matches!(result, Err(ExtractorError::UnreadablePdf(_))));
    }
}
