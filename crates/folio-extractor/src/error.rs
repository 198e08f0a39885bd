//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Schema file does not exist
    #[error("Extraction schema file not found: {0}")]
    SchemaNotFound(String),

    /// Schema file is not a valid extraction schema
    #[error("Invalid extraction schema: {0}")]
    InvalidSchema(String),

    /// Schema declares no fields
    #[error("No fields specified in the extraction schema")]
    EmptySchema,

    /// Input directory does not exist
    #[error("Input directory not found: {0}")]
    InputDirNotFound(String),

    /// Input directory holds no PDF files
    #[error("No PDF files found in: {0}")]
    NoDocuments(String),

    /// PDF could not be opened or parsed
    #[error("Unreadable PDF: {0}")]
    UnreadablePdf(String),

    /// PDF produced no extractable text
    #[error("No extractable text found (the PDF may be image-based or empty)")]
    EmptyDocument,

    /// File exceeds the upload limit
    #[error(
        "File size ({}) exceeds the {} upload limit",
        format_file_size(*.size),
        format_file_size(*.limit)
    )]
    FileTooLarge {
        /// Size of the file in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Staging the file with the LLM service failed
    #[error("File upload failed: {0}")]
    Upload(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Response contained no recoverable JSON
    #[error("No valid JSON found in LLM response: {excerpt}")]
    UnparseableResponse {
        /// Leading portion of the raw response
        excerpt: String,
    },

    /// Response JSON was not an object
    #[error("LLM returned an invalid data type: expected object, got {0}")]
    UnexpectedType(String),

    /// Results could not be written
    #[error("Failed to write results to {path}: {reason}")]
    Persistence {
        /// Output path
        path: String,
        /// Underlying failure
        reason: String,
    },
}

/// Broad category of an [`ExtractorError`]
///
/// Configuration errors abort a run before any document is processed,
/// document errors skip one document, persistence errors fail the run
/// after processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal, raised before processing starts
    Configuration,
    /// Scoped to a single document
    Document,
    /// Fatal, raised while writing results
    Persistence,
}

impl ExtractorError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractorError::SchemaNotFound(_)
            | ExtractorError::InvalidSchema(_)
            | ExtractorError::EmptySchema
            | ExtractorError::InputDirNotFound(_)
            | ExtractorError::NoDocuments(_) => ErrorKind::Configuration,
            ExtractorError::UnreadablePdf(_)
            | ExtractorError::EmptyDocument
            | ExtractorError::FileTooLarge { .. }
            | ExtractorError::Upload(_)
            | ExtractorError::Llm(_)
            | ExtractorError::UnparseableResponse { .. }
            | ExtractorError::UnexpectedType(_) => ErrorKind::Document,
            ExtractorError::Persistence { .. } => ErrorKind::Persistence,
        }
    }
}

/// Render a byte count with binary units, e.g. `1.5 MB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(50 * 1024 * 1024), "50.0 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_file_too_large_message() {
        let error = ExtractorError::FileTooLarge {
            size: 60 * 1024 * 1024,
            limit: 50 * 1024 * 1024,
        };
        assert_eq!(
            error.to_string(),
            "File size (60.0 MB) exceeds the 50.0 MB upload limit"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ExtractorError::EmptySchema.kind(), ErrorKind::Configuration);
        assert_eq!(
            ExtractorError::NoDocuments("docs".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(ExtractorError::EmptyDocument.kind(), ErrorKind::Document);
        assert_eq!(
            ExtractorError::Llm("boom".into()).kind(),
            ErrorKind::Document
        );
        assert_eq!(
            ExtractorError::Persistence {
                path: "out.json".into(),
                reason: "denied".into(),
            }
            .kind(),
            ErrorKind::Persistence
        );
    }
}
