//! Gemini Provider Implementation
//!
//! Provides integration with Google's Gemini REST API (`v1beta`).
//!
//! # Features
//!
//! - Text generation with a fixed generation config (temperature, one candidate)
//! - Optional system instruction sent with every request
//! - File staging through the resumable upload protocol, and deletion
//! - Exactly one attempt per call; failures are reported, never retried
//!
//! # Examples
//!
//! ```no_run
//! use folio_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::from_api_key("gemini-2.5-flash", "my-api-key")
//!     .unwrap()
//!     .with_temperature(0.0);
//! ```

use crate::LlmError;
use folio_domain::{LlmProvider, StagedFile};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite-preview-06-17";

/// Default timeout for a single request (5 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    temperature: f32,
    system_instruction: Option<String>,
    timeout: Duration,
}

/// Request body for the generateContent API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    File {
        #[serde(rename = "fileData")]
        file_data: FileData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    mime_type: &'a str,
    file_uri: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    candidate_count: u32,
}

/// Response from the generateContent API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Metadata sent when opening an upload session
#[derive(Serialize)]
struct UploadStartRequest<'a> {
    file: UploadFileMeta<'a>,
}

#[derive(Serialize)]
struct UploadFileMeta<'a> {
    display_name: &'a str,
}

/// Response to the finalizing upload request
#[derive(Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedFile {
    name: String,
    uri: String,
    mime_type: Option<String>,
}

impl GenerateResponse {
    /// Concatenate the text parts of the first candidate
    fn into_text(self) -> Result<String, LlmError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "unspecified".to_string());
            return Err(LlmError::InvalidResponse(format!(
                "No candidates returned (block reason: {})",
                reason
            )));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::InvalidResponse(format!(
                "Candidate contained no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unspecified")
            )));
        }

        Ok(text)
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://generativelanguage.googleapis.com")
    /// - `model`: Model to use (e.g., "gemini-2.5-flash")
    /// - `api_key`: Key sent in the `x-goog-api-key` header
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
            temperature: 0.0,
            system_instruction: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a new Gemini provider against the public endpoint
    pub fn from_api_key(
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model, api_key)
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the system instruction sent with every request
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Call generateContent with the given user parts
    async fn generate_content(&self, parts: Vec<Part<'_>>) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        );

        let request_body = GenerateRequest {
            system_instruction: self.system_instruction.as_deref().map(|text| Content {
                role: None,
                parts: vec![Part::Text { text }],
            }),
            contents: vec![Content {
                role: Some("user"),
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                candidate_count: 1,
            },
        };

        debug!("POST {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        let response = check_status(response).await?;

        let generate_response = response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        generate_response.into_text()
    }

    /// Stage a local file using the resumable upload protocol
    async fn upload(&self, path: &Path, mime_type: &str) -> Result<StagedFile, LlmError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| LlmError::Other(format!("Failed to read {}: {}", path.display(), e)))?;

        let display_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");

        debug!("Opening upload session for {} ({} bytes)", display_name, bytes.len());

        let start = self
            .client
            .post(format!("{}/upload/v1beta/files", self.endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .timeout(self.timeout)
            .json(&UploadStartRequest {
                file: UploadFileMeta { display_name },
            })
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Upload start failed: {}", e)))?;
        let start = check_status(start).await?;

        let upload_url = start
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                LlmError::InvalidResponse("Upload session URL missing from response".to_string())
            })?;

        let finalize = self
            .client
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .timeout(self.timeout)
            .body(bytes)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Upload failed: {}", e)))?;
        let finalize = check_status(finalize).await?;

        let uploaded = finalize
            .json::<UploadResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse upload response: {}", e)))?;

        Ok(StagedFile {
            name: uploaded.file.name,
            uri: uploaded.file.uri,
            mime_type: uploaded
                .file
                .mime_type
                .unwrap_or_else(|| mime_type.to_string()),
        })
    }

    /// Delete a staged file
    async fn delete(&self, file: &StagedFile) -> Result<(), LlmError> {
        let url = format!("{}/v1beta/{}", self.endpoint, file.name);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Delete failed: {}", e)))?;
        check_status(response).await?;
        Ok(())
    }
}

/// Map a non-success HTTP status to an error, passing successes through
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LlmError::Authentication(format!("HTTP {}: {}", status, error_text))
        }
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
    })
}

impl LlmProvider for GeminiProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.generate_content(vec![Part::Text { text: prompt }])
            .await
    }

    async fn generate_with_file(
        &self,
        prompt: &str,
        file: &StagedFile,
    ) -> Result<String, Self::Error> {
        self.generate_content(vec![
            Part::Text { text: prompt },
            Part::File {
                file_data: FileData {
                    mime_type: &file.mime_type,
                    file_uri: &file.uri,
                },
            },
        ])
        .await
    }

    async fn upload_file(&self, path: &Path, mime_type: &str) -> Result<StagedFile, Self::Error> {
        self.upload(path, mime_type).await
    }

    async fn delete_file(&self, file: &StagedFile) -> Result<(), Self::Error> {
        self.delete(file).await
    }
}
