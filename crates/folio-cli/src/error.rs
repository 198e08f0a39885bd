//! Error types for the CLI application.

use folio_extractor::ErrorKind;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction pipeline error
    #[error("{0}")]
    Extractor(#[from] folio_extractor::ExtractorError),

    /// LLM provider setup error
    #[error("{0}")]
    Llm(#[from] folio_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Category of this error; everything outside the extractor is a setup problem
    pub fn kind(&self) -> ErrorKind {
        match self {
            CliError::Extractor(e) => e.kind(),
            CliError::Config(_)
            | CliError::Llm(_)
            | CliError::Io(_)
            | CliError::Toml(_)
            | CliError::InvalidInput(_) => ErrorKind::Configuration,
        }
    }

    /// Follow-up line printed after the error message
    pub fn hint(&self) -> Option<&'static str> {
        match self.kind() {
            ErrorKind::Configuration => {
                Some("No documents were processed. Run `folio --help` for usage.")
            }
            ErrorKind::Persistence => {
                Some("Documents were processed but the results could not be saved.")
            }
            ErrorKind::Document => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_extractor::ExtractorError;

    #[test]
    fn test_setup_errors_are_configuration() {
        assert_eq!(
            CliError::Config("missing key".into()).kind(),
            ErrorKind::Configuration
        );
        let schema: CliError = ExtractorError::SchemaNotFound("schema.json".into()).into();
        assert_eq!(schema.kind(), ErrorKind::Configuration);
        assert!(schema.hint().unwrap().contains("folio --help"));
    }

    #[test]
    fn test_write_errors_are_persistence() {
        let error: CliError = ExtractorError::Persistence {
            path: "out.json".into(),
            reason: "denied".into(),
        }
        .into();
        assert_eq!(error.kind(), ErrorKind::Persistence);
        assert_eq!(
            error.hint(),
            Some("Documents were processed but the results could not be saved.")
        );
    }

    #[test]
    fn test_document_errors_have_no_hint() {
        let error: CliError = ExtractorError::EmptyDocument.into();
        assert_eq!(error.kind(), ErrorKind::Document);
        assert!(error.hint().is_none());
    }
}
