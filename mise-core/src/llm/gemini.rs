//! Gemini (Google Generative Language API) client.

use async_trait::async_trait;

use super::config::GeminiConfig;
use super::response::{parse_generate_response, GenerateContentRequest, GoogleErrorResponse};
use super::{GenerationClient, GenerationError, GenerationResult};
use crate::prompts::PromptDocument;

/// Gemini API client.
///
/// Built once at startup and shared by every request. Holds no per-request state.
#[derive(Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new GeminiClient from the given configuration.
    ///
    /// Only the connect timeout is set on the HTTP client; the overall bound
    /// on a call is applied by the caller.
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &PromptDocument) -> GenerationResult {
        let request = GenerateContentRequest::from_lines(prompt.lines());

        tracing::debug!(model = %self.config.model, "Calling Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(GenerationError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::RequestFailed(e.to_string()))?;

        if !(200..300).contains(&status) {
            // Try to parse error response
            if let Ok(error_response) = serde_json::from_str::<GoogleErrorResponse>(&body) {
                return Err(GenerationError::ApiError {
                    status,
                    message: error_response.error.message,
                });
            }
            return Err(GenerationError::ApiError {
                status,
                message: body,
            });
        }

        parse_generate_response(&body)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
