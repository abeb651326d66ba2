//! Generation backend client.
//!
//! The hosted model backend is an opaque collaborator: it takes a prompt and
//! a mode, and returns generated content or an error. The ledger never
//! retries on its behalf.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use growth_points_core::GenerationMode;

/// Error type for generation backend calls.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned an error.
    #[error("backend error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the backend.
        message: String,
    },

    /// The backend returned a response with no content.
    #[error("backend returned empty content")]
    EmptyContent,
}

/// Content returned by the backend; text, or a URL/Base64 payload for media
/// modes. Opaque to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// The generated payload.
    pub content: String,
}

/// The generation backend seam.
///
/// The HTTP service holds a `dyn Generate`, so tests can substitute a stub
/// without a network.
#[async_trait::async_trait]
pub trait Generate: Send + Sync {
    /// Generate content for a prompt in the given mode.
    async fn generate(
        &self,
        prompt: &str,
        mode: GenerationMode,
    ) -> Result<GeneratedContent, GenerationError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    mode: GenerationMode,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    content: String,
}

#[derive(Debug, Deserialize)]
struct BackendErrorResponse {
    error: String,
}

/// Reqwest-backed client for the hosted generation API.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpGenerator {
    /// Create a new generation client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl Generate for HttpGenerator {
    async fn generate(
        &self,
        prompt: &str,
        mode: GenerationMode,
    ) -> Result<GeneratedContent, GenerationError> {
        let url = format!("{}/v1/generate", self.base_url);

        let mut request = self
            .client
            .post(&url)
            .json(&GenerateRequest { prompt, mode });
        if let Some(key) = &self.api_key {
            request = request.header("authorization", format!("Bearer {key}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<BackendErrorResponse>()
                .await
                .map_or_else(|_| format!("HTTP {status}"), |e| e.error);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        if body.content.trim().is_empty() {
            return Err(GenerationError::EmptyContent);
        }

        Ok(GeneratedContent {
            content: body.content,
        })
    }
}
