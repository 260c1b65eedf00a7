//! Generation client abstraction for recipe text.
//!
//! This module provides a trait-based seam over the external model so the
//! pipeline can run against Gemini in production and a deterministic fake in tests.

mod config;
mod fake;
mod gemini;
mod response;

pub use config::{
    ConfigError, GeminiConfig, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_GENERATION_TIMEOUT_SECS, DEFAULT_MODEL,
};
pub use fake::FakeClient;
pub use gemini::GeminiClient;
pub use response::parse_generate_response;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::prompts::PromptDocument;

/// Error type for generation calls.
///
/// `RequestFailed`, `ApiError` and `RateLimited` are service errors: the call
/// did not produce a reply we could use. `MalformedResponse` means the service
/// answered but the reply did not have the expected shape.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("{}", rate_limited_message(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String, payload: String },
}

fn rate_limited_message(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!("Rate limited by generation service, retry after {} seconds", secs),
        None => "Rate limited by generation service".to_string(),
    }
}

impl GenerationError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, GenerationError::MalformedResponse { .. })
    }
}

/// Text produced by one successful generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    /// All text fragments of the first candidate, joined by newlines.
    pub text: String,
    /// Upstream finish reason, if reported (e.g. "STOP", "MAX_TOKENS").
    pub finish_reason: Option<String>,
}

impl GeneratedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
        }
    }
}

pub type GenerationResult = Result<GeneratedText, GenerationError>;

/// Trait for generation clients.
///
/// Implementations hold read-only session state and are shared across
/// concurrent requests. Each `generate` call makes exactly one upstream
/// request: no retries, batching or caching.
#[async_trait]
pub trait GenerationClient: Send + Sync + fmt::Debug {
    /// Send the prompt to the model and return its text.
    async fn generate(&self, prompt: &PromptDocument) -> GenerationResult;

    /// Get the provider name (e.g., "gemini", "fake").
    fn provider_name(&self) -> &'static str;

    /// Get the model name (e.g., "gemini-1.5-flash-latest").
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message_is_readable() {
        let err = GenerationError::RateLimited {
            retry_after_secs: Some(7),
        };
        assert_eq!(
            err.to_string(),
            "Rate limited by generation service, retry after 7 seconds"
        );

        let err = GenerationError::RateLimited {
            retry_after_secs: None,
        };
        assert_eq!(err.to_string(), "Rate limited by generation service");
    }
}
