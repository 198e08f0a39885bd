//! Folio LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `folio-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Gemini REST API (generation and file staging)
//!
//! # Examples
//!
//! ```
//! use folio_llm::MockProvider;
//! use folio_domain::LlmProvider;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let provider = MockProvider::new("{\"title\": \"On Memory\"}");
//! let result = runtime.block_on(provider.generate("test prompt")).unwrap();
//! assert_eq!(result, "{\"title\": \"On Memory\"}");
//! ```

#![warn(missing_docs)]

pub mod gemini;

use folio_domain::{LlmProvider, StagedFile};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// API key rejected or missing permissions
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Uploads hand out synthetic staged-file handles and every call is counted.
///
/// # Examples
///
/// ```
/// use folio_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
    upload_count: Arc<Mutex<usize>>,
    delete_count: Arc<Mutex<usize>>,
    fail_uploads: bool,
    fail_deletes: bool,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            upload_count: Arc::new(Mutex::new(0)),
            delete_count: Arc::new(Mutex::new(0)),
            fail_uploads: false,
            fail_deletes: false,
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), "ERROR".to_string());
    }

    /// Make every upload fail with a communication error
    pub fn with_failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    /// Make every staged-file deletion fail
    pub fn with_failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    /// Get the number of times a generate method was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Get the number of upload attempts
    pub fn upload_count(&self) -> usize {
        *self.upload_count.lock().unwrap()
    }

    /// Get the number of deletion attempts
    pub fn delete_count(&self) -> usize {
        *self.delete_count.lock().unwrap()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn respond(&self, prompt: &str) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        // Check if we have a specific response for this prompt
        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(prompt) {
            if response == "ERROR" {
                return Err(LlmError::Other("Mock error".to_string()));
            }
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.respond(prompt)
    }

    async fn generate_with_file(
        &self,
        prompt: &str,
        _file: &StagedFile,
    ) -> Result<String, Self::Error> {
        self.respond(prompt)
    }

    async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<StagedFile, Self::Error> {
        let id = {
            let mut count = self.upload_count.lock().unwrap();
            *count += 1;
            *count
        };

        if self.fail_uploads {
            return Err(LlmError::Communication("Mock upload failure".to_string()));
        }
        if !path.exists() {
            return Err(LlmError::Other(format!("No such file: {}", path.display())));
        }

        Ok(StagedFile {
            name: format!("files/mock-{}", id),
            uri: format!("mock://files/mock-{}", id),
            mime_type: mime_type.to_string(),
        })
    }

    async fn delete_file(&self, _file: &StagedFile) -> Result<(), Self::Error> {
        *self.delete_count.lock().unwrap() += 1;

        if self.fail_deletes {
            return Err(LlmError::Communication("Mock delete failure".to_string()));
        }
        Ok(())
    }
}
