//! Request pipeline: validate, build prompt, generate, format.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::format::{format_recipe, RenderedRecipe};
use crate::llm::{GenerationClient, GenerationError, DEFAULT_GENERATION_TIMEOUT_SECS};
use crate::prompts::recipe::RECIPE_PROMPT_NAME;
use crate::prompts::PromptDocument;
use crate::request::{RecipeQuery, RecipeRequest, ValidationError};

/// Outward error for one pipeline run. Every internal failure maps to exactly one variant.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// The caller's input is invalid. Do not retry without correcting it.
    #[error("{0}")]
    BadRequest(String),

    /// The generation service could not be reached or refused the call.
    #[error("Recipe service unavailable: {message}")]
    UpstreamUnavailable {
        message: String,
        retry_after_secs: Option<u64>,
    },

    /// The generation service answered with something we cannot use.
    #[error("Failed to generate recipe")]
    UpstreamContractViolation,

    /// The generation service did not answer in time.
    #[error("Recipe generation timed out after {} seconds", .0.as_secs())]
    UpstreamTimeout(Duration),
}

impl PipelineError {
    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PipelineError::UpstreamUnavailable { .. } | PipelineError::UpstreamTimeout(_)
        )
    }
}

impl From<ValidationError> for PipelineError {
    fn from(e: ValidationError) -> Self {
        PipelineError::BadRequest(e.to_string())
    }
}

impl From<GenerationError> for PipelineError {
    fn from(e: GenerationError) -> Self {
        match &e {
            GenerationError::MalformedResponse { .. } => PipelineError::UpstreamContractViolation,
            GenerationError::RateLimited { retry_after_secs } => {
                PipelineError::UpstreamUnavailable {
                    message: e.to_string(),
                    retry_after_secs: *retry_after_secs,
                }
            }
            GenerationError::RequestFailed(_) | GenerationError::ApiError { .. } => {
                PipelineError::UpstreamUnavailable {
                    message: e.to_string(),
                    retry_after_secs: None,
                }
            }
        }
    }
}

/// Turns raw recipe constraints into rendered markup.
///
/// Holds only the shared generation client; safe to share across concurrent
/// requests. The external call runs inside the caller's future, so dropping
/// that future aborts the in-flight request.
#[derive(Debug, Clone)]
pub struct RecipePipeline {
    client: Arc<dyn GenerationClient>,
    timeout: Duration,
}

impl RecipePipeline {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
        }
    }

    /// Bound on the single generation call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn client(&self) -> &dyn GenerationClient {
        self.client.as_ref()
    }

    /// Run one request through the pipeline. All-or-nothing: stops at the first failure.
    pub async fn handle(&self, query: RecipeQuery) -> Result<RenderedRecipe, PipelineError> {
        let request = RecipeRequest::validate(query).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected recipe request");
        })?;

        let prompt = PromptDocument::build(&request);
        tracing::debug!(
            prompt_name = RECIPE_PROMPT_NAME,
            prompt = %prompt,
            "Built recipe prompt"
        );

        let generated =
            match tokio::time::timeout(self.timeout, self.client.generate(&prompt)).await {
                Ok(Ok(generated)) => generated,
                Ok(Err(e)) => {
                    if let GenerationError::MalformedResponse { reason, payload } = &e {
                        tracing::error!(
                            provider = self.client.provider_name(),
                            model = self.client.model_name(),
                            reason = %reason,
                            payload = %payload,
                            "Invalid response structure from generation service"
                        );
                    } else {
                        tracing::warn!(
                            provider = self.client.provider_name(),
                            model = self.client.model_name(),
                            error = %e,
                            "Generation service call failed"
                        );
                    }
                    return Err(e.into());
                }
                Err(_) => {
                    tracing::warn!(
                        provider = self.client.provider_name(),
                        timeout_secs = self.timeout.as_secs(),
                        "Generation service call timed out"
                    );
                    return Err(PipelineError::UpstreamTimeout(self.timeout));
                }
            };

        let rendered = format_recipe(&generated.text);

        tracing::info!(
            model = self.client.model_name(),
            finish_reason = generated.finish_reason.as_deref().unwrap_or("unknown"),
            text_len = generated.text.len(),
            html_len = rendered.html.len(),
            "Generated recipe"
        );

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{FakeClient, GeneratedText};

    fn scenario_query() -> RecipeQuery {
        RecipeQuery {
            ingredients: Some("tomato, basil, garlic".to_string()),
            meal_type: Some("dinner".to_string()),
            cuisine: Some("Italian".to_string()),
            cooking_time: Some("30 minutes".to_string()),
            complexity: Some("easy".to_string()),
        }
    }

    fn pipeline(client: Arc<FakeClient>) -> RecipePipeline {
        RecipePipeline::new(client)
    }

    #[tokio::test]
    async fn test_success_renders_markup() {
        let client = Arc::new(FakeClient::with_text("# Pasta al Pomodoro\n1. Boil water..."));
        let rendered = pipeline(client.clone())
            .handle(scenario_query())
            .await
            .unwrap();

        assert!(rendered.html.contains("<h1>Pasta al Pomodoro</h1>"));
        assert!(rendered.html.contains("<ol>"));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_prompt_reaches_client() {
        let client = Arc::new(
            FakeClient::with_text("wrong prompt")
                .with_response("[Cuisine Preference: Italian]", Ok(GeneratedText::new("# Ok"))),
        );
        let rendered = pipeline(client).handle(scenario_query()).await.unwrap();
        assert_eq!(rendered.title.as_deref(), Some("Ok"));
    }

    #[tokio::test]
    async fn test_blank_ingredients_never_call_client() {
        let client = Arc::new(FakeClient::with_text("# Never"));
        let query = RecipeQuery {
            ingredients: Some("  ".to_string()),
            ..scenario_query()
        };

        let err = pipeline(client.clone()).handle(query).await.unwrap_err();
        assert!(matches!(err, PipelineError::BadRequest(_)));
        assert!(!err.is_retryable());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_service_error_maps_to_unavailable() {
        let client = Arc::new(FakeClient::failing(GenerationError::RequestFailed(
            "connection refused".to_string(),
        )));
        let err = pipeline(client).handle(scenario_query()).await.unwrap_err();

        match &err {
            PipelineError::UpstreamUnavailable { message, .. } => {
                assert!(message.contains("connection refused"))
            }
            other => panic!("expected UpstreamUnavailable, got {:?}", other),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_rate_limit_keeps_retry_after() {
        let client = Arc::new(FakeClient::failing(GenerationError::RateLimited {
            retry_after_secs: Some(7),
        }));
        let err = pipeline(client).handle(scenario_query()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::UpstreamUnavailable {
                retry_after_secs: Some(7),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_malformed_maps_to_contract_violation() {
        let client = Arc::new(FakeClient::failing(GenerationError::MalformedResponse {
            reason: "no candidates".to_string(),
            payload: r#"{"secret":"internal"}"#.to_string(),
        }));
        let err = pipeline(client).handle(scenario_query()).await.unwrap_err();

        assert!(matches!(err, PipelineError::UpstreamContractViolation));
        assert!(!err.is_retryable());
        assert!(!err.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let client = Arc::new(
            FakeClient::with_text("# Too late").with_delay(Duration::from_millis(500)),
        );
        let err = pipeline(client)
            .with_timeout(Duration::from_millis(20))
            .handle(scenario_query())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::UpstreamTimeout(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_client() {
        let client = Arc::new(FakeClient::with_text("# Soup"));
        let pipeline = pipeline(client.clone());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pipeline = pipeline.clone();
                tokio::spawn(async move { pipeline.handle(scenario_query()).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(client.calls(), 8);
    }
}
