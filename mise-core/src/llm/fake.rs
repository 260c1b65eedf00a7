//! Fake generation client for testing.
//!
//! Returns deterministic results so the pipeline and HTTP layer can be tested
//! without network access or API costs.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{GeneratedText, GenerationClient, GenerationError, GenerationResult};
use crate::prompts::PromptDocument;

/// A fake generation client for testing.
///
/// Results are matched by checking if the prompt contains a registered substring.
/// If no match is found, the default result is returned.
#[derive(Debug)]
pub struct FakeClient {
    /// Prompt substring -> result, checked in insertion order
    responses: Vec<(String, GenerationResult)>,
    /// Result when no pattern matches
    default_result: GenerationResult,
    /// Artificial latency before answering
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl Default for FakeClient {
    fn default() -> Self {
        Self::with_result(Err(GenerationError::RequestFailed(
            "FakeClient: no response configured".to_string(),
        )))
    }
}

impl FakeClient {
    /// Create a FakeClient that always returns `result`.
    pub fn with_result(result: GenerationResult) -> Self {
        Self {
            responses: Vec::new(),
            default_result: result,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a FakeClient that always succeeds with `text`.
    pub fn with_text(text: &str) -> Self {
        Self::with_result(Ok(GeneratedText::new(text)))
    }

    /// Create a FakeClient that always fails with `error`.
    pub fn failing(error: GenerationError) -> Self {
        Self::with_result(Err(error))
    }

    /// Add a result for prompts containing a specific substring (case-insensitive).
    pub fn with_response(mut self, prompt_contains: &str, result: GenerationResult) -> Self {
        self.responses.push((prompt_contains.to_lowercase(), result));
        self
    }

    /// Wait this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationClient for FakeClient {
    async fn generate(&self, prompt: &PromptDocument) -> GenerationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let prompt_lower = prompt.to_text().to_lowercase();
        self.responses
            .iter()
            .find(|(pattern, _)| prompt_lower.contains(pattern))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| self.default_result.clone())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RecipeRequest;

    fn prompt(cuisine: &str) -> PromptDocument {
        PromptDocument::build(&RecipeRequest {
            ingredients: "rice".to_string(),
            meal_type: String::new(),
            cuisine: cuisine.to_string(),
            cooking_time: String::new(),
            complexity: String::new(),
        })
    }

    #[tokio::test]
    async fn test_fake_client_fixed_text() {
        let client = FakeClient::with_text("# Rice");
        let result = client.generate(&prompt("")).await.unwrap();
        assert_eq!(result.text, "# Rice");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_fake_client_matching_case_insensitive() {
        let client = FakeClient::with_text("default")
            .with_response("JAPANESE", Ok(GeneratedText::new("# Onigiri")));

        assert_eq!(
            client.generate(&prompt("Japanese")).await.unwrap().text,
            "# Onigiri"
        );
        assert_eq!(
            client.generate(&prompt("Mexican")).await.unwrap().text,
            "default"
        );
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_fake_client_default_fails() {
        let client = FakeClient::default();
        assert!(client.generate(&prompt("")).await.is_err());
    }
}
